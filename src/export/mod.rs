//! Read-only export of a bundle: lossless JSON and a lossy Markdown document.

pub mod document;
pub mod json;

use chrono::{DateTime, Utc};
use clap::ValueEnum;

use crate::model::WordBundle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Markdown document with YAML front matter
    #[default]
    Md,
    /// Full structured bundle
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Md => "md",
            ExportFormat::Json => "json",
        }
    }
}

pub fn render(
    bundle: &WordBundle,
    format: ExportFormat,
    exported_at: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Json => json::to_json(bundle),
        ExportFormat::Md => Ok(document::to_markdown(bundle, exported_at)),
    }
}
