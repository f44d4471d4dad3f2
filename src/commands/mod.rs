//! Command handlers behind the CLI. Each handler writes its result to the
//! writer it is given; `lookup --diagnostics` writes to a second one. Logs go
//! to stderr.

mod args;
mod errors;

use std::io::Write;
use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use tracing::{info, warn};

pub use args::{Cli, Command, LookupArgs, RenderArgs};
pub use errors::CommandError;

use crate::aggregate::Aggregator;
use crate::config::Config;
use crate::export::{self, json};
use crate::model::WordBundle;
use crate::seed;
use crate::synthesis::{GeminiClient, Summarizer, SynthesisError, cited_sources};
use errors::file_error;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_REDIRECTS: usize = 5;

/// Dispatch a parsed command line.
pub async fn run(
    cli: Cli,
    out: &mut impl Write,
    diag: &mut impl Write,
) -> Result<(), CommandError> {
    match cli.command {
        Command::WordOfTheDay => {
            writeln!(out, "{}", seed::word_of_the_day())?;
            Ok(())
        }
        Command::Render(args) => render(&args, out).await,
        Command::Lookup(args) => {
            let app = App::new(&load_config(cli.lang.as_deref(), cli.timeout.as_deref())?)?;
            app.lookup(&args, out, diag).await
        }
        Command::Summarize(args) => {
            let app = App::new(&load_config(cli.lang.as_deref(), cli.timeout.as_deref())?)?;
            app.summarize(&args.term, out).await
        }
    }
}

fn load_config(lang: Option<&str>, timeout: Option<&str>) -> Result<Config, CommandError> {
    let config = Config::from_env()?.with_overrides(lang, timeout)?;
    info!(lang = %config.lang, timeout = ?config.timeout, "configuration loaded");
    Ok(config)
}

/// Shared HTTP client for every provider and the synthesis service.
/// Per-request timeouts tighten the global one.
pub fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(HTTP_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .build()
}

/// Long-lived handles for the commands that talk to providers.
pub struct App {
    aggregator: Aggregator,
    gemini: Option<GeminiClient>,
}

impl App {
    pub fn new(config: &Config) -> Result<Self, CommandError> {
        let http = http_client()?;
        let gemini = GeminiClient::from_env(http.clone())
            .inspect_err(|e| warn!("Gemini client not available: {e}"))
            .ok();
        Ok(Self {
            aggregator: Aggregator::new(http, config),
            gemini,
        })
    }

    /// Build a bundle and export it to `args.output` or `out`. Provider
    /// reports go to `diag` when `args.diagnostics` is set.
    pub async fn lookup(
        &self,
        args: &LookupArgs,
        out: &mut impl Write,
        diag: &mut impl Write,
    ) -> Result<(), CommandError> {
        let term = match args.term.as_deref() {
            Some(term) => term,
            None => seed::word_of_the_day(),
        };
        let (bundle, reports) = self.aggregator.build_with_report(term).await?;

        if args.diagnostics {
            for report in &reports {
                writeln!(diag, "{report}")?;
            }
        }

        let bundle = require_data(bundle)?;
        let rendered = export::render(&bundle, args.format, Utc::now())?;

        match &args.output {
            Some(path) => {
                tokio::fs::write(path, rendered)
                    .await
                    .map_err(file_error(path))?;
                info!(path = %path.display(), format = args.format.extension(), "export written");
            }
            None => emit(out, &rendered)?,
        }
        Ok(())
    }

    /// Build a bundle and print the configured model's synthesis of it.
    pub async fn summarize(&self, term: &str, out: &mut impl Write) -> Result<(), CommandError> {
        let gemini = self.gemini.as_ref().ok_or(SynthesisError::ApiKeyNotSet)?;
        self.summarize_with(gemini, term, out).await
    }

    pub async fn summarize_with(
        &self,
        summarizer: &impl Summarizer,
        term: &str,
        out: &mut impl Write,
    ) -> Result<(), CommandError> {
        let bundle = require_data(self.aggregator.build_word_bundle(term).await?)?;
        let text = summarizer.summarize(&bundle).await?;
        emit(out, text.trim())?;

        let cited = cited_sources(&text);
        if !cited.is_empty() {
            let tags: Vec<_> = cited.iter().map(|t| t.as_str()).collect();
            writeln!(out, "\nSources: {}", tags.join(", "))?;
        }
        Ok(())
    }
}

/// Re-render a saved JSON export.
async fn render(args: &RenderArgs, out: &mut impl Write) -> Result<(), CommandError> {
    let raw = tokio::fs::read_to_string(&args.path)
        .await
        .map_err(file_error(&args.path))?;
    let bundle = json::from_json(&raw)?;
    emit(out, &export::render(&bundle, args.format, Utc::now())?)
}

fn require_data(bundle: WordBundle) -> Result<WordBundle, CommandError> {
    if bundle.has_no_data() {
        Err(CommandError::NoData(bundle.query))
    } else {
        Ok(bundle)
    }
}

fn emit(out: &mut impl Write, text: &str) -> Result<(), CommandError> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    Ok(())
}
