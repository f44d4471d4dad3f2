use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Why a provider call contributed nothing. Never surfaces past an adapter.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid endpoint: {0}")]
    Endpoint(String),
}

impl ProviderError {
    fn from_transport(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout(timeout)
        } else {
            ProviderError::Network(e)
        }
    }
}

/// Append path segments to `base`, percent-encoding each one.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ProviderError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ProviderError::Endpoint(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// GET `url` and decode a JSON body, bounded by `timeout`.
///
/// 404 is a valid "nothing here" answer and yields `Ok(None)`. Any other
/// non-2xx status, transport failure, or undecodable body is an error. The
/// request is aborted when the timeout fires.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: Url,
    timeout: Duration,
) -> Result<Option<T>, ProviderError> {
    let response = http
        .get(url.clone())
        .header("User-Agent", crate::USER_AGENT)
        .header("Accept", "application/json")
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| ProviderError::from_transport(e, timeout))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        debug!(url = %url, "provider returned 404");
        return Ok(None);
    }
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ProviderError::from_transport(e, timeout))?;
    let value = serde_json::from_slice(&body)?;
    debug!(url = %url, bytes = body.len(), "provider response decoded");
    Ok(Some(value))
}


#[cfg(test)]
mod http_tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn get(
        server: &MockServer,
        route: &str,
        timeout: Duration,
    ) -> Result<Option<serde_json::Value>, ProviderError> {
        let url = Url::parse(&format!("{}{route}", server.uri())).unwrap();
        get_json(&Client::new(), url, timeout).await
    }

    #[tokio::test]
    async fn success_decodes_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"a": 1})))
            .mount(&server)
            .await;

        let value = get(&server, "/ok", Duration::from_secs(2)).await.unwrap();
        assert_eq!(value, Some(serde_json::json!({"a": 1})));
    }

    #[tokio::test]
    async fn not_found_is_empty_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "title": "No Definitions Found"
            })))
            .mount(&server)
            .await;

        let value = get(&server, "/missing", Duration::from_secs(2)).await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn server_error_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/boom"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = get(&server, "/boom", Duration::from_secs(2)).await;
        assert!(matches!(result, Err(ProviderError::Status(503))));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = get(&server, "/html", Duration::from_secs(2)).await;
        assert!(matches!(result, Err(ProviderError::Decode(_))));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let result = get(&server, "/slow", Duration::from_millis(200)).await;
        match result {
            Err(ProviderError::Timeout(limit)) => assert_eq!(limit, Duration::from_millis(200)),
            other => panic!("expected timeout, got: {other:?}"),
        }
    }
}
