use super::normalize::{normalize_aggregated, normalize_listing};
use super::types::{FeedPayload, RawFeed};
use crate::util::validate_api_base;
use futures::StreamExt;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::redirect::Policy;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Base URL used when neither the CLI, the environment, nor the config file
/// provides one.
pub const DEFAULT_API_URL: &str = "https://agro-radar-360-3-0.onrender.com";

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "AGRO_RADAR_API_URL";

/// Hard limit for a whole request, headers and body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result count requested from the listing endpoint by default.
pub const DEFAULT_LIMIT: u32 = 10;

const MAX_BODY_SIZE: usize = 10 * 1024 * 1024; // 10MB

const ARTICLES_PATH: &str = "/api/articles";
const OUTPUT_PATH: &str = "/api/output";

/// Errors from a feed request. None of these is retried.
///
/// `Display` is the internal message that goes to the log;
/// [`FeedError::user_message`] is what the view shows.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Connection refused, DNS failure, TLS error, reset mid-body
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// The request did not finish within the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    /// Any status outside 200-299, whatever the body says
    #[error("Falha ao carregar artigos (status {0})")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid UTF-8 in response")]
    InvalidUtf8,
    /// Body is not JSON, or `articles` is missing or not an array of objects
    #[error("Invalid response body: {0}")]
    Parse(String),
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl FeedError {
    /// Localized, generic message for the error state.
    pub fn user_message(&self) -> &'static str {
        match self {
            FeedError::Network(_) | FeedError::Timeout(_) => {
                "Falha de conexão ao carregar artigos."
            }
            FeedError::HttpStatus(_) => "Erro ao carregar artigos.",
            FeedError::ResponseTooLarge(_) | FeedError::InvalidUtf8 | FeedError::Parse(_) => {
                "Resposta inválida do servidor."
            }
            FeedError::InvalidUrl(_) => "Endereço da API inválido.",
        }
    }
}

/// Which backend endpoint to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `/api/articles`, a flat list with an optional `limit` query parameter.
    Articles { limit: Option<u32> },
    /// `/api/output`, hero plus latest articles in one response.
    Output,
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint::Articles {
            limit: Some(DEFAULT_LIMIT),
        }
    }
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Articles { .. } => ARTICLES_PATH,
            Endpoint::Output => OUTPUT_PATH,
        }
    }
}

/// Create a redirect policy with loop detection and at most 3 hops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );
        attempt.follow()
    })
}

/// Build the HTTP client shared by every activation.
pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .redirect(create_redirect_policy())
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(30))
        .tcp_keepalive(Duration::from_secs(60))
        .user_agent(concat!("agro-radar/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Client for one configured endpoint of the news API.
///
/// Cheap to clone; the underlying `reqwest::Client` shares its pool.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    url: Url,
    endpoint: Endpoint,
    timeout: Duration,
}

impl FeedClient {
    /// Validate `base_url` and resolve the full request URL for `endpoint`.
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        endpoint: Endpoint,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let url = request_url(base_url, endpoint)?;
        Ok(Self {
            http,
            url,
            endpoint,
            timeout,
        })
    }

    /// The resolved `{base}{path}[?limit=N]` URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Perform one GET and normalize the response.
    ///
    /// The timeout covers the whole exchange, body included. Dropping the
    /// returned future cancels the request.
    pub async fn fetch(&self) -> Result<FeedPayload, FeedError> {
        tracing::info!(url = %self.url, "Fetching articles");
        let started = std::time::Instant::now();

        let body = tokio::time::timeout(self.timeout, self.fetch_body())
            .await
            .map_err(|_| FeedError::Timeout(self.timeout.as_secs()))??;

        let raw: RawFeed =
            serde_json::from_str(&body).map_err(|e| FeedError::Parse(e.to_string()))?;

        let payload = match self.endpoint {
            Endpoint::Articles { .. } => normalize_listing(raw),
            Endpoint::Output => normalize_aggregated(raw),
        };

        tracing::info!(
            articles = payload.len(),
            hero = payload.hero.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Articles loaded"
        );
        Ok(payload)
    }

    async fn fetch_body(&self) -> Result<String, FeedError> {
        let response = self
            .http
            .get(self.url.clone())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus(status.as_u16()));
        }

        read_limited_text(response, MAX_BODY_SIZE).await
    }
}

/// Join the base URL, the endpoint path and the optional `limit`.
///
/// A path prefix on the base URL is kept (`https://host/v2` →
/// `https://host/v2/api/articles`).
pub fn request_url(base_url: &str, endpoint: Endpoint) -> Result<Url, FeedError> {
    let base = validate_api_base(base_url).map_err(|e| FeedError::InvalidUrl(e.to_string()))?;

    let joined = format!("{}{}", base.as_str().trim_end_matches('/'), endpoint.path());
    let mut url = Url::parse(&joined).map_err(|e| FeedError::InvalidUrl(e.to_string()))?;

    if let Endpoint::Articles { limit: Some(n) } = endpoint {
        url.query_pairs_mut().append_pair("limit", &n.to_string());
    }

    Ok(url)
}

async fn read_limited_text(response: reqwest::Response, limit: usize) -> Result<String, FeedError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FeedError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FeedError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| FeedError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, endpoint: Endpoint) -> FeedClient {
        FeedClient::new(
            reqwest::Client::new(),
            &server.uri(),
            endpoint,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_request_url_listing_with_limit() {
        let url = request_url(DEFAULT_API_URL, Endpoint::default()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://agro-radar-360-3-0.onrender.com/api/articles?limit=10"
        );
    }

    #[test]
    fn test_request_url_listing_without_limit() {
        let url = request_url("https://api.example.com/", Endpoint::Articles { limit: None })
            .unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/articles");
    }

    #[test]
    fn test_request_url_output_keeps_base_path() {
        let url = request_url("https://api.example.com/v3", Endpoint::Output).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v3/api/output");
    }

    #[test]
    fn test_request_url_rejects_insecure_remote() {
        let err = request_url("http://api.example.com", Endpoint::Output).unwrap_err();
        assert!(matches!(err, FeedError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_fetch_listing_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .and(query_param("limit", "10"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"articles": [
                    {"id": "1", "title": "Soja em alta", "content": "Preços sobem", "category": "Mercado"},
                    {"id": "2", "title": "Chuvas no Sul"}
                ]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let payload = client_for(&server, Endpoint::default()).fetch().await.unwrap();
        assert!(payload.hero.is_none());
        assert_eq!(payload.latest.len(), 2);
        assert_eq!(payload.latest[0].title, "Soja em alta");
        assert_eq!(payload.latest[1].category, "Agronegócio");
    }

    #[tokio::test]
    async fn test_fetch_output_partitions_hero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/output"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"articles": [
                    {"id": "a", "position": "latest", "relevance_score": 3},
                    {"id": "h", "position": "hero", "urgency": "high"},
                    {"id": "b", "position": "latest", "relevance_score": 9}
                ]}"#,
            ))
            .mount(&server)
            .await;

        let payload = client_for(&server, Endpoint::Output).fetch().await.unwrap();
        let hero = payload.hero.unwrap();
        assert_eq!(hero.id, "h");
        assert!(hero.is_urgent());
        let ids: Vec<_> = payload.latest.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_fetch_empty_list_is_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"articles": []}"#))
            .mount(&server)
            .await;

        let payload = client_for(&server, Endpoint::default()).fetch().await.unwrap();
        assert!(payload.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_http_status_failure() {
        for status in [300u16, 404, 500, 503] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(
                    ResponseTemplate::new(status).set_body_string(r#"{"articles": []}"#),
                )
                .mount(&server)
                .await;

            let err = client_for(&server, Endpoint::default())
                .fetch()
                .await
                .unwrap_err();
            assert!(matches!(err, FeedError::HttpStatus(s) if s == status));
            assert!(err.to_string().contains(&status.to_string()));
            assert!(!err.user_message().is_empty());
        }
    }

    #[tokio::test]
    async fn test_fetch_malformed_json_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, Endpoint::default())
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
        assert_eq!(err.user_message(), "Resposta inválida do servidor.");
    }

    #[tokio::test]
    async fn test_fetch_missing_articles_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"items": []}"#))
            .mount(&server)
            .await;

        let err = client_for(&server, Endpoint::default())
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"articles": []}"#)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = FeedClient::new(
            reqwest::Client::new(),
            &server.uri(),
            Endpoint::default(),
            Duration::from_millis(50),
        )
        .unwrap();

        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::Timeout(_)));
        assert_eq!(err.user_message(), "Falha de conexão ao carregar artigos.");
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_network_error() {
        // Bind and drop a listener so the port is (very likely) closed.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = FeedClient::new(
            reqwest::Client::new(),
            &format!("http://127.0.0.1:{}", port),
            Endpoint::default(),
            Duration::from_secs(5),
        )
        .unwrap();

        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::Network(_) | FeedError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_fetch_not_cached_between_calls() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"articles": []}"#))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server, Endpoint::default());
        client.fetch().await.unwrap();
        client.fetch().await.unwrap();
    }
}
