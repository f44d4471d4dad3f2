use futures::future::join5;
use reqwest::Client;
use tracing::{debug, info};

use super::report::{ProviderCall, ProviderReport, settle};
use crate::config::Config;
use crate::model::{WikiSection, WordBundle};
use crate::providers::conceptnet::ConceptNetClient;
use crate::providers::datamuse::DatamuseClient;
use crate::providers::dictionary::DictionaryClient;
use crate::providers::wikipedia::WikipediaClient;

#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("search term cannot be empty")]
    InvalidInput,
}

/// Fans one search out to every provider and merges what comes back.
#[derive(Clone)]
pub struct Aggregator {
    dictionary: DictionaryClient,
    datamuse: DatamuseClient,
    conceptnet: ConceptNetClient,
    wikipedia: WikipediaClient,
}

impl Aggregator {
    pub fn new(http: Client, config: &Config) -> Self {
        let endpoints = &config.endpoints;
        Self {
            dictionary: DictionaryClient::new(
                http.clone(),
                endpoints.dictionary.clone(),
                &config.lang,
                config.timeout,
            ),
            datamuse: DatamuseClient::new(http.clone(), endpoints.datamuse.clone(), config.timeout),
            conceptnet: ConceptNetClient::new(
                http.clone(),
                endpoints.conceptnet.clone(),
                &config.lang,
                config.timeout,
            ),
            wikipedia: WikipediaClient::new(http, endpoints.wikipedia.clone(), config.timeout),
        }
    }

    /// Build a bundle for a raw user-entered term.
    ///
    /// Fails only when the term is empty after trimming. Provider failures of
    /// any kind show up as missing entries, never as an error.
    pub async fn build_word_bundle(&self, term: &str) -> Result<WordBundle, AggregateError> {
        self.build_with_report(term).await.map(|(bundle, _)| bundle)
    }

    /// Like [`build_word_bundle`](Self::build_word_bundle), also returning how
    /// each provider call settled.
    pub async fn build_with_report(
        &self,
        term: &str,
    ) -> Result<(WordBundle, Vec<ProviderReport>), AggregateError> {
        let normalized = normalize_term(term).ok_or(AggregateError::InvalidInput)?;
        info!(term = %normalized, "building word bundle");

        // Each call runs as its own task with its own timeout; a task that
        // outlives an abandoned search finishes harmlessly and is dropped.
        let dictionary = {
            let client = self.dictionary.clone();
            let term = normalized.clone();
            tokio::spawn(async move { client.lookup(&term).await })
        };
        let synonyms = {
            let client = self.datamuse.clone();
            let term = normalized.clone();
            tokio::spawn(async move { client.synonyms(&term).await })
        };
        let associations = {
            let client = self.datamuse.clone();
            let term = normalized.clone();
            tokio::spawn(async move { client.associations(&term).await })
        };
        let edges = {
            let client = self.conceptnet.clone();
            let term = normalized.clone();
            tokio::spawn(async move { client.edges(&term).await })
        };
        let toc = {
            let client = self.wikipedia.clone();
            let term = normalized;
            tokio::spawn(async move { client.toc(&term).await })
        };

        let (dictionary, synonyms, associations, edges, toc) =
            join5(dictionary, synonyms, associations, edges, toc).await;

        let (dictionary, dictionary_report) = settle(ProviderCall::Dictionary, dictionary);
        let (synonyms, synonyms_report) = settle(ProviderCall::DatamuseSynonyms, synonyms);
        let (associations, associations_report) =
            settle(ProviderCall::DatamuseAssociations, associations);
        let (edges, edges_report) = settle(ProviderCall::ConceptNet, edges);
        let (toc, toc_report) = settle(ProviderCall::Wikipedia, toc);

        let reports = vec![
            dictionary_report,
            synonyms_report,
            associations_report,
            edges_report,
            toc_report,
        ];
        for report in &reports {
            debug!(%report, "provider settled");
        }

        // Association-provider edges always precede semantic-graph edges.
        let mut relations = synonyms;
        relations.extend(edges);

        let bundle = WordBundle {
            query: term.trim().to_string(),
            phonetics: dictionary.phonetics,
            etymology: dictionary.etymology,
            definitions: dictionary.definitions,
            relations,
            associations,
            morphology: Vec::new(),
            wiki: WikiSection { summary: None, toc },
        };

        info!(
            definitions = bundle.definitions.len(),
            relations = bundle.relations.len(),
            associations = bundle.associations.len(),
            toc = bundle.wiki.toc.len(),
            empty_providers = reports.iter().filter(|r| r.outcome.contributed_nothing()).count(),
            "word bundle built"
        );
        Ok((bundle, reports))
    }
}

/// Trimmed, lowercased term used for every provider call; `None` when empty.
pub fn normalize_term(term: &str) -> Option<String> {
    let normalized = term.trim().to_lowercase();
    (!normalized.is_empty()).then_some(normalized)
}


#[cfg(test)]
mod http_tests {
    use super::*;
    use crate::aggregate::Outcome;
    use crate::model::{RelationType, SourceTag};
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn aggregator(server: &MockServer) -> Aggregator {
        Aggregator::new(Client::new(), &Config::for_mock(&server.uri()))
    }

    async fn mount_ephemeral(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/entries/en/ephemeral"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "word": "ephemeral",
                "phonetics": [{"text": "/ɪˈfɛm(ə)rəl/"}],
                "meanings": [{
                    "partOfSpeech": "adjective",
                    "definitions": [{"definition": "lasting for a very short time"}]
                }],
                "sourceUrls": ["https://en.wiktionary.org/wiki/ephemeral"]
            }])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/words"))
            .and(query_param("ml", "ephemeral"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"word": "fleeting", "score": 90}])),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/words"))
            .and(query_param("rel_trg", "ephemeral"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("node", "/c/en/ephemeral"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "edges": [
                    {
                        "@id": "/a/[/r/RelatedTo/,/c/en/ephemeral/,/c/en/transient/]",
                        "rel": {"@id": "/r/RelatedTo"},
                        "start": {"@id": "/c/en/ephemeral", "label": "ephemeral"},
                        "end": {"@id": "/c/en/transient", "label": "transient"},
                        "weight": 1.2
                    },
                    {
                        "@id": "/a/[/r/FormOf/,/c/en/ephemera/,/c/en/ephemeral/]",
                        "rel": {"@id": "/r/FormOf"},
                        "start": {"@id": "/c/en/ephemera", "label": "ephemera"},
                        "end": {"@id": "/c/en/ephemeral", "label": "ephemeral"},
                        "weight": 1.0
                    }
                ]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": {"code": "missingtitle"}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn ephemeral_scenario_merges_all_providers() {
        let server = MockServer::start().await;
        mount_ephemeral(&server).await;

        let bundle = aggregator(&server).build_word_bundle("ephemeral").await.unwrap();

        assert_eq!(bundle.definitions.len(), 1);
        assert_eq!(bundle.definitions[0].part_of_speech.as_deref(), Some("adjective"));
        assert_eq!(bundle.relations.len(), 2);
        assert_eq!(bundle.relations[0].rel, RelationType::Synonym);
        assert_eq!(bundle.relations[0].target, "fleeting");
        assert_eq!(bundle.relations[0].weight, Some(90.0));
        assert_eq!(bundle.relations[1].rel, RelationType::RelatedTo);
        assert_eq!(bundle.relations[1].target, "transient");
        assert!(bundle.wiki.toc.is_empty());
        assert!(bundle.associations.is_empty());
        assert!(bundle.morphology.is_empty());
    }

    #[tokio::test]
    async fn query_keeps_display_casing_while_providers_see_lowercase() {
        let server = MockServer::start().await;
        mount_ephemeral(&server).await;

        let bundle = aggregator(&server).build_word_bundle("  Ephemeral ").await.unwrap();

        assert_eq!(bundle.query, "Ephemeral");
        assert_eq!(bundle.definitions.len(), 1, "dictionary must be queried with lowercase");
    }

    #[tokio::test]
    async fn blank_term_is_invalid_and_makes_no_calls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        for term in ["", "   ", "\t\n"] {
            let result = aggregator(&server).build_word_bundle(term).await;
            assert!(matches!(result, Err(AggregateError::InvalidInput)));
        }
        server.verify().await;
    }

    #[tokio::test]
    async fn failing_providers_leave_others_intact() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/entries/en/drift"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/words"))
            .and(query_param("ml", "drift"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/words"))
            .and(query_param("rel_trg", "drift"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"word": "snow", "score": 700}])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"edges": []}))
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/w/api.php"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let (bundle, reports) = aggregator(&server).build_with_report("drift").await.unwrap();

        assert!(bundle.definitions.is_empty());
        assert!(bundle.phonetics.is_none());
        assert!(bundle.relations.is_empty());
        assert_eq!(bundle.associations.len(), 1);
        assert_eq!(bundle.associations[0].attribution.source, SourceTag::Datamuse);

        let outcomes: Vec<_> = reports.iter().map(|r| (r.call, r.outcome.clone())).collect();
        assert!(matches!(outcomes[0], (ProviderCall::Dictionary, Outcome::Failed(_))));
        assert!(matches!(outcomes[1], (ProviderCall::DatamuseSynonyms, Outcome::Failed(_))));
        assert_eq!(outcomes[2], (ProviderCall::DatamuseAssociations, Outcome::Fulfilled));
        match &outcomes[3] {
            (ProviderCall::ConceptNet, Outcome::Failed(reason)) => {
                assert!(reason.contains("timed out"), "got: {reason}")
            }
            other => panic!("expected conceptnet timeout, got: {other:?}"),
        }
        assert_eq!(outcomes[4], (ProviderCall::Wikipedia, Outcome::NotFound));
    }

    #[tokio::test]
    async fn relation_order_does_not_depend_on_completion_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/words"))
            .and(query_param("ml", "brisk"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{"word": "quick"}, {"word": "lively"}]))
                    .set_delay(Duration::from_millis(600)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "edges": [{
                    "rel": {"@id": "/r/RelatedTo"},
                    "start": {"@id": "/c/en/quick", "label": "quick"},
                    "end": {"@id": "/c/en/brisk", "label": "brisk"}
                }]
            })))
            .mount(&server)
            .await;

        let bundle = aggregator(&server).build_word_bundle("brisk").await.unwrap();

        let sources: Vec<_> = bundle.relations.iter().map(|r| r.attribution.source).collect();
        assert_eq!(
            sources,
            [SourceTag::Datamuse, SourceTag::Datamuse, SourceTag::ConceptNet]
        );
        assert_eq!(bundle.relations[2].target, "quick");
    }

    #[tokio::test]
    async fn same_target_from_two_providers_is_kept_twice() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/words"))
            .and(query_param("ml", "glad"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([{"word": "happy"}])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "edges": [{
                    "rel": {"@id": "/r/RelatedTo"},
                    "start": {"@id": "/c/en/glad", "label": "glad"},
                    "end": {"@id": "/c/en/happy", "label": "happy"}
                }]
            })))
            .mount(&server)
            .await;

        let bundle = aggregator(&server).build_word_bundle("glad").await.unwrap();

        let targets: Vec<_> = bundle
            .relations
            .iter()
            .map(|r| (r.target.as_str(), r.attribution.source))
            .collect();
        assert_eq!(
            targets,
            [("happy", SourceTag::Datamuse), ("happy", SourceTag::ConceptNet)]
        );
    }

    #[tokio::test]
    async fn every_provider_down_still_resolves() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let bundle = aggregator(&server).build_word_bundle("anything").await.unwrap();
        assert!(bundle.has_no_data());
        assert_eq!(bundle.query, "anything");
    }
}
