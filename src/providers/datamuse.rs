use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::http::{self, ProviderError};
use super::Contribution;
use crate::model::{Association, RelationEdge, RelationType, SourceAttribution, SourceTag};

const SYNONYM_LIMIT: &str = "20";
const ASSOCIATION_LIMIT: &str = "30";

#[derive(Debug, Deserialize)]
struct WordPayload {
    word: String,
    score: Option<f64>,
}

/// Client for the Datamuse `/words` endpoint in its two query modes:
/// "means like" (`ml`) and "triggered by" (`rel_trg`).
#[derive(Clone)]
pub struct DatamuseClient {
    http: Client,
    base_url: Url,
    timeout: Duration,
}

impl DatamuseClient {
    pub fn new(http: Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            timeout,
        }
    }

    /// Words similar in meaning, as `synonym` edges weighted by Datamuse score.
    pub async fn synonyms(&self, term: &str) -> Contribution<Vec<RelationEdge>> {
        let result = self.words("ml", term, SYNONYM_LIMIT).await.map(|words| {
            words.map(|words| {
                let fetched_at = Utc::now();
                words
                    .into_iter()
                    .map(|w| RelationEdge {
                        rel: RelationType::Synonym,
                        target: w.word,
                        weight: w.score,
                        attribution: SourceAttribution::new(SourceTag::Datamuse, None, fetched_at),
                    })
                    .collect()
            })
        });
        Contribution::absorb(SourceTag::Datamuse, result)
    }

    /// Words associated with (triggered by) `term`.
    pub async fn associations(&self, term: &str) -> Contribution<Vec<Association>> {
        let result = self.words("rel_trg", term, ASSOCIATION_LIMIT).await.map(|words| {
            words.map(|words| {
                let fetched_at = Utc::now();
                words
                    .into_iter()
                    .map(|w| Association {
                        term: w.word,
                        score: w.score,
                        attribution: SourceAttribution::new(SourceTag::Datamuse, None, fetched_at),
                    })
                    .collect()
            })
        });
        Contribution::absorb(SourceTag::Datamuse, result)
    }

    async fn words(
        &self,
        mode: &str,
        term: &str,
        max: &str,
    ) -> Result<Option<Vec<WordPayload>>, ProviderError> {
        let mut url = http::endpoint(&self.base_url, &["words"])?;
        url.query_pairs_mut()
            .append_pair(mode, term)
            .append_pair("md", "f")
            .append_pair("max", max);
        http::get_json(&self.http, url, self.timeout).await
    }
}
