use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::http::{self, ProviderError};
use super::Contribution;
use crate::model::{Definition, Phonetic, SourceAttribution, SourceTag};

/// Dictionary slice of a bundle. `phonetics` is `None` when the dictionary
/// contributed nothing, `Some` (possibly empty) when it answered.
#[derive(Debug, Default)]
pub struct DictionaryData {
    pub definitions: Vec<Definition>,
    pub phonetics: Option<Vec<Phonetic>>,
    pub etymology: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryPayload {
    #[serde(default)]
    phonetics: Vec<PhoneticPayload>,
    #[serde(default)]
    meanings: Vec<MeaningPayload>,
    origin: Option<String>,
    #[serde(default)]
    source_urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PhoneticPayload {
    text: Option<String>,
    audio: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeaningPayload {
    part_of_speech: Option<String>,
    #[serde(default)]
    definitions: Vec<DefinitionPayload>,
}

#[derive(Debug, Deserialize)]
struct DefinitionPayload {
    definition: String,
    example: Option<String>,
}

/// Client for dictionaryapi.dev (`GET /entries/{lang}/{term}`).
#[derive(Clone)]
pub struct DictionaryClient {
    http: Client,
    base_url: Url,
    lang: String,
    timeout: Duration,
}

impl DictionaryClient {
    pub fn new(http: Client, base_url: Url, lang: &str, timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            lang: lang.to_string(),
            timeout,
        }
    }

    /// Definitions, phonetics and etymology for `term`. Never fails.
    pub async fn lookup(&self, term: &str) -> Contribution<DictionaryData> {
        Contribution::absorb(SourceTag::DictionaryApi, self.fetch(term).await)
    }

    async fn fetch(&self, term: &str) -> Result<Option<DictionaryData>, ProviderError> {
        let url = http::endpoint(&self.base_url, &["entries", self.lang.as_str(), term])?;
        let entries: Option<Vec<EntryPayload>> =
            http::get_json(&self.http, url, self.timeout).await?;
        Ok(entries
            .and_then(|e| e.into_iter().next())
            .map(normalize_entry))
    }
}

/// Only the first entry is used; its meanings are flattened in order.
fn normalize_entry(entry: EntryPayload) -> DictionaryData {
    let fetched_at = Utc::now();
    let source_url = entry.source_urls.into_iter().next();

    let definitions = entry
        .meanings
        .into_iter()
        .flat_map(|meaning| {
            let pos = meaning.part_of_speech;
            meaning.definitions.into_iter().map(move |def| (pos.clone(), def))
        })
        .map(|(part_of_speech, def)| Definition {
            text: def.definition,
            part_of_speech,
            examples: def.example.into_iter().collect(),
            attribution: SourceAttribution::new(
                SourceTag::DictionaryApi,
                source_url.clone(),
                fetched_at,
            ),
        })
        .collect();

    let phonetics = entry
        .phonetics
        .into_iter()
        .filter_map(|p| {
            let text = p.text.filter(|t| !t.is_empty())?;
            Some(Phonetic {
                text,
                audio: p.audio.filter(|a| !a.is_empty()),
            })
        })
        .collect();

    DictionaryData {
        definitions,
        phonetics: Some(phonetics),
        etymology: entry.origin.filter(|o| !o.trim().is_empty()),
    }
}
