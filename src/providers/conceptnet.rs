use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::http::{self, ProviderError};
use super::Contribution;
use crate::model::{RelationEdge, RelationType, SourceAttribution, SourceTag};

const EDGE_LIMIT: &str = "50";

/// Relation kinds kept from the semantic graph. Everything else is dropped.
pub const ALLOWED_RELATIONS: [RelationType; 10] = [
    RelationType::RelatedTo,
    RelationType::IsA,
    RelationType::UsedFor,
    RelationType::Antonym,
    RelationType::HasSubevent,
    RelationType::HasContext,
    RelationType::MannerOf,
    RelationType::Causes,
    RelationType::DerivedFrom,
    RelationType::CapableOf,
];

/// Edges stay raw here and are decoded one by one, so a single odd edge
/// cannot sink the rest.
#[derive(Debug, Deserialize)]
struct QueryPayload {
    #[serde(default)]
    edges: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct EdgePayload {
    #[serde(rename = "@id")]
    id: Option<String>,
    rel: NodePayload,
    start: NodePayload,
    end: NodePayload,
    weight: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NodePayload {
    #[serde(rename = "@id")]
    id: String,
    label: Option<String>,
}

/// Client for the ConceptNet `/query` endpoint.
#[derive(Clone)]
pub struct ConceptNetClient {
    http: Client,
    base_url: Url,
    lang: String,
    timeout: Duration,
}

impl ConceptNetClient {
    pub fn new(http: Client, base_url: Url, lang: &str, timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            lang: lang.to_string(),
            timeout,
        }
    }

    /// Allowed semantic-graph edges touching `term`, oriented away from it.
    pub async fn edges(&self, term: &str) -> Contribution<Vec<RelationEdge>> {
        Contribution::absorb(SourceTag::ConceptNet, self.fetch(term).await)
    }

    async fn fetch(&self, term: &str) -> Result<Option<Vec<RelationEdge>>, ProviderError> {
        let node = concept_node(&self.lang, term);
        let mut url = http::endpoint(&self.base_url, &["query"])?;
        url.query_pairs_mut()
            .append_pair("node", &node)
            .append_pair("limit", EDGE_LIMIT);

        let payload: Option<QueryPayload> = http::get_json(&self.http, url, self.timeout).await?;
        Ok(payload.map(|p| normalize_edges(&node, decode_edges(p.edges))))
    }
}

/// ConceptNet node id for a term, e.g. `/c/en/ice_cream`.
pub fn concept_node(lang: &str, term: &str) -> String {
    format!("/c/{lang}/{}", term.replace(' ', "_"))
}

/// `/r/RelatedTo` -> `relatedto`.
fn relation_tag(rel_id: &str) -> String {
    rel_id
        .rsplit('/')
        .next()
        .unwrap_or(rel_id)
        .to_lowercase()
}

/// Node ids may carry a sense suffix (`/c/en/run/v`); the bare node still matches.
fn is_query_node(node: &str, candidate: &str) -> bool {
    candidate == node
        || candidate
            .strip_prefix(node)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn decode_edges(raw: Vec<serde_json::Value>) -> Vec<EdgePayload> {
    raw.into_iter()
        .filter_map(|value| {
            serde_json::from_value(value)
                .inspect_err(|e| debug!(error = %e, "skipping undecodable conceptnet edge"))
                .ok()
        })
        .collect()
}

fn normalize_edges(node: &str, edges: Vec<EdgePayload>) -> Vec<RelationEdge> {
    let fetched_at = Utc::now();
    let total = edges.len();

    let kept: Vec<RelationEdge> = edges
        .into_iter()
        .filter_map(|edge| {
            let rel = RelationType::from_tag(&relation_tag(&edge.rel.id))
                .filter(|rel| ALLOWED_RELATIONS.contains(rel))?;
            let target = if is_query_node(node, &edge.start.id) {
                edge.end
            } else {
                edge.start
            };
            let label = target.label.filter(|l| !l.trim().is_empty())?;
            Some(RelationEdge {
                rel,
                target: label,
                weight: edge.weight,
                attribution: SourceAttribution::new(SourceTag::ConceptNet, edge.id, fetched_at),
            })
        })
        .collect();

    debug!(node, total, kept = kept.len(), "conceptnet edges filtered");
    kept
}


#[cfg(test)]
mod http_tests {
    use super::*;
    use crate::providers::FetchStatus;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ConceptNetClient {
        ConceptNetClient::new(
            Client::new(),
            Url::parse(&server.uri()).unwrap(),
            "en",
            Duration::from_secs(2),
        )
    }

    #[tokio::test]
    async fn edges_query_by_node() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("node", "/c/en/ice_cream"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "edges": [{
                    "@id": "/a/[/r/UsedFor/,/c/en/ice_cream/,/c/en/dessert/]",
                    "rel": {"@id": "/r/UsedFor", "label": "UsedFor"},
                    "start": {"@id": "/c/en/ice_cream", "label": "ice cream"},
                    "end": {"@id": "/c/en/dessert", "label": "dessert"},
                    "weight": 1.0
                }]
            })))
            .mount(&server)
            .await;

        let result = client(&server).edges("ice cream").await;
        assert!(matches!(result.status, FetchStatus::Ok));
        assert_eq!(result.value.len(), 1);
        assert_eq!(result.value[0].rel, RelationType::UsedFor);
        assert_eq!(result.value[0].target, "dessert");
    }

    #[tokio::test]
    async fn one_malformed_edge_keeps_the_others() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "edges": [
                    {
                        "rel": {"@id": "/r/RelatedTo"},
                        "start": {"@id": "/c/en/tide", "label": "tide"},
                        "weight": "n/a"
                    },
                    {
                        "@id": "/a/[/r/RelatedTo/,/c/en/tide/,/c/en/moon/]",
                        "rel": {"@id": "/r/RelatedTo"},
                        "start": {"@id": "/c/en/tide", "label": "tide"},
                        "end": {"@id": "/c/en/moon", "label": "moon"},
                        "weight": 3.1
                    }
                ]
            })))
            .mount(&server)
            .await;

        let result = client(&server).edges("tide").await;
        assert!(matches!(result.status, FetchStatus::Ok));
        let targets: Vec<_> = result.value.iter().map(|e| e.target.as_str()).collect();
        assert_eq!(targets, ["moon"]);
    }

    #[tokio::test]
    async fn missing_edges_field_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"@id": "/query"})),
            )
            .mount(&server)
            .await;

        let result = client(&server).edges("nothing").await;
        assert!(result.value.is_empty());
        assert!(matches!(result.status, FetchStatus::Ok));
    }
}
