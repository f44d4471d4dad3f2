use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::http::{self, ProviderError};
use super::Contribution;
use crate::model::{SourceAttribution, SourceTag, WikiTocItem};

/// `action=parse&prop=sections` response. A missing page answers 200 with an
/// `error` object and no `parse`.
#[derive(Debug, Deserialize)]
struct ParsePayload {
    parse: Option<ParseBody>,
}

#[derive(Debug, Deserialize)]
struct ParseBody {
    title: Option<String>,
    #[serde(default)]
    sections: Vec<SectionPayload>,
}

#[derive(Debug, Deserialize)]
struct SectionPayload {
    /// Dotted position in the outline (`"1.1"`).
    number: Option<String>,
    /// Flat running index (`"2"`), used only when `number` is missing.
    index: Option<Numeric>,
    line: String,
    toclevel: Option<Numeric>,
    level: Option<Numeric>,
    anchor: Option<String>,
}

/// MediaWiki emits some numbers as strings (`"level": "2"`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(u32),
    Text(String),
}

impl Numeric {
    fn as_u32(&self) -> Option<u32> {
        match self {
            Numeric::Int(n) => Some(*n),
            Numeric::Text(s) => s.trim().parse().ok(),
        }
    }

    fn into_text(self) -> String {
        match self {
            Numeric::Int(n) => n.to_string(),
            Numeric::Text(s) => s,
        }
    }
}

/// Client for the MediaWiki parse API of one Wikipedia edition.
#[derive(Clone)]
pub struct WikipediaClient {
    http: Client,
    api_url: Url,
    timeout: Duration,
}

impl WikipediaClient {
    pub fn new(http: Client, api_url: Url, timeout: Duration) -> Self {
        Self {
            http,
            api_url,
            timeout,
        }
    }

    /// Table of contents of the article titled `title`.
    pub async fn toc(&self, title: &str) -> Contribution<Vec<WikiTocItem>> {
        Contribution::absorb(SourceTag::Wikipedia, self.fetch(title).await)
    }

    async fn fetch(&self, title: &str) -> Result<Option<Vec<WikiTocItem>>, ProviderError> {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("action", "parse")
            .append_pair("page", title)
            .append_pair("prop", "sections")
            .append_pair("format", "json")
            .append_pair("redirects", "1");

        let payload: Option<ParsePayload> = http::get_json(&self.http, url, self.timeout).await?;
        let Some(body) = payload.and_then(|p| p.parse) else {
            return Ok(None);
        };

        let resolved = body.title.as_deref().unwrap_or(title);
        let article = self.article_url(resolved);
        Ok(Some(normalize_sections(body.sections, article)))
    }

    /// `https://en.wikipedia.org/wiki/Some_title`, on the same host as the API.
    fn article_url(&self, title: &str) -> Option<String> {
        let page = title.replace(' ', "_");
        let mut url = self.api_url.clone();
        url.set_query(None);
        url.path_segments_mut().ok()?.clear().extend(["wiki", page.as_str()]);
        Some(url.to_string())
    }
}

fn normalize_sections(sections: Vec<SectionPayload>, article: Option<String>) -> Vec<WikiTocItem> {
    let fetched_at = Utc::now();
    sections
        .into_iter()
        .filter_map(|s| {
            let path = s
                .number
                .filter(|n| !n.trim().is_empty())
                .or_else(|| s.index.map(Numeric::into_text))?;
            // toclevel is already 1-based; heading level starts at 2 for top sections.
            let level = s
                .toclevel
                .as_ref()
                .and_then(Numeric::as_u32)
                .or_else(|| s.level.as_ref().and_then(Numeric::as_u32).map(|l| l.saturating_sub(1)))
                .unwrap_or(1)
                .max(1);
            Some(WikiTocItem {
                index: path,
                title: s.line,
                level,
                anchor: s.anchor.filter(|a| !a.is_empty()),
                attribution: SourceAttribution::new(
                    SourceTag::Wikipedia,
                    article.clone(),
                    fetched_at,
                ),
            })
        })
        .collect()
}
