//! Place details client routed through an indirection proxy
//!
//! Builds the provider's place-details URL, wraps it in the configured proxy
//! URL, and parses the proxied response body into reviews.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::Review;

/// Base URL for the place details endpoint
const PLACE_DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";

/// Default proxy prefix; the encoded target URL is appended to it
pub const DEFAULT_PROXY_URL: &str = "https://api.allorigins.win/raw?url=";

/// Fields requested from the provider
const REQUESTED_FIELDS: &str = "reviews,rating,user_ratings_total";

/// Errors that can occur when fetching place reviews
#[derive(Debug, Error)]
pub enum PlacesError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The proxy answered with a non-success status
    #[error("Proxy returned HTTP {0}")]
    HttpStatus(u16),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The provider reported an error status
    #[error("Provider returned status {status}: {message}")]
    Provider { status: String, message: String },

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),
}

/// Reviews and aggregate figures for one place
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceReviews {
    /// Reviews in provider order
    pub reviews: Vec<Review>,
    /// Aggregate star rating
    pub rating: Option<f64>,
    /// Total number of ratings
    pub total_ratings: Option<u64>,
}

/// A remote source of reviews for a place
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Fetches reviews for `source_id`, authenticating with `credential`
    async fn fetch_place_reviews(
        &self,
        source_id: &str,
        credential: &str,
    ) -> Result<PlaceReviews, PlacesError>;
}

/// Client for the place details endpoint
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: Client,
    proxy_url: String,
    details_url: String,
}

impl Default for PlacesClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacesClient {
    /// Create a new PlacesClient using the default proxy
    pub fn new() -> Self {
        Self::with_proxy(DEFAULT_PROXY_URL)
    }

    /// Create a new PlacesClient routed through the given proxy prefix
    pub fn with_proxy(proxy_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            proxy_url: proxy_url.into(),
            details_url: PLACE_DETAILS_URL.to_string(),
        }
    }

    /// Override the place details endpoint the proxy is asked to fetch
    pub fn with_details_url(mut self, details_url: impl Into<String>) -> Self {
        self.details_url = details_url.into();
        self
    }

    /// Create a new PlacesClient with a custom HTTP client
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// The URL the proxy should fetch on our behalf
    pub fn target_url(&self, source_id: &str, credential: &str) -> String {
        format!(
            "{}?place_id={}&fields={}&key={}",
            self.details_url,
            urlencoding::encode(source_id),
            REQUESTED_FIELDS,
            urlencoding::encode(credential)
        )
    }

    /// The URL actually requested: the proxy prefix plus the encoded target
    pub fn proxied_url(&self, source_id: &str, credential: &str) -> String {
        let target = self.target_url(source_id, credential);
        format!("{}{}", self.proxy_url, urlencoding::encode(&target))
    }
}

#[async_trait]
impl ReviewSource for PlacesClient {
    async fn fetch_place_reviews(
        &self,
        source_id: &str,
        credential: &str,
    ) -> Result<PlaceReviews, PlacesError> {
        let url = self.proxied_url(source_id, credential);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::HttpStatus(status.as_u16()));
        }
        let details: DetailsResponse = response.json().await?;

        into_place_reviews(details)
    }
}

/// Parse a place details body into reviews and aggregate figures
pub fn parse_details_response(body: &str) -> Result<PlaceReviews, PlacesError> {
    into_place_reviews(serde_json::from_str(body)?)
}

/// Check the provider status and pull out the review result
fn into_place_reviews(response: DetailsResponse) -> Result<PlaceReviews, PlacesError> {
    if let Some(status) = response.status {
        if status != "OK" {
            return Err(PlacesError::Provider {
                status,
                message: response.error_message.unwrap_or_default(),
            });
        }
    }

    let result = response
        .result
        .ok_or_else(|| PlacesError::MissingField("result".to_string()))?;

    Ok(PlaceReviews {
        reviews: result.reviews,
        rating: result.rating,
        total_ratings: result.user_ratings_total,
    })
}

/// Place details response structure
#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    result: Option<DetailsResult>,
}

/// The `result` object of a place details response
#[derive(Debug, Deserialize)]
struct DetailsResult {
    #[serde(default)]
    reviews: Vec<Review>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    user_ratings_total: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Sample valid place details response
    const VALID_RESPONSE: &str = r#"{
        "html_attributions": [],
        "result": {
            "rating": 4.8,
            "user_ratings_total": 57,
            "reviews": [
                {
                    "author_name": "Ana P.",
                    "rating": 5,
                    "relative_time_description": "2 weeks ago",
                    "text": "Lawn looks brand new.",
                    "time": 1700000000
                },
                {
                    "author_name": "Ben R.",
                    "rating": 4,
                    "text": "On time and tidy.",
                    "time": 1700000100
                }
            ]
        },
        "status": "OK"
    }"#;

    #[test]
    fn test_parse_valid_response() {
        let parsed = parse_details_response(VALID_RESPONSE).expect("Should parse");

        assert_eq!(parsed.reviews.len(), 2);
        assert_eq!(parsed.reviews[0], Review::new("Ana P.", 5, "Lawn looks brand new."));
        assert_eq!(parsed.reviews[1].author_name, "Ben R.");
        assert_eq!(parsed.rating, Some(4.8));
        assert_eq!(parsed.total_ratings, Some(57));
    }

    #[test]
    fn test_parse_result_without_reviews_is_empty() {
        let parsed = parse_details_response(r#"{"result": {"rating": 4.0}, "status": "OK"}"#)
            .expect("Should parse");

        assert!(parsed.reviews.is_empty());
    }

    #[test]
    fn test_parse_provider_error_status() {
        let body = r#"{
            "error_message": "The provided API key is invalid.",
            "html_attributions": [],
            "status": "REQUEST_DENIED"
        }"#;

        let err = parse_details_response(body).unwrap_err();

        match err {
            PlacesError::Provider { status, message } => {
                assert_eq!(status, "REQUEST_DENIED");
                assert!(message.contains("invalid"));
            }
            other => panic!("Expected Provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_missing_result() {
        let err = parse_details_response(r#"{"html_attributions": []}"#).unwrap_err();

        assert!(matches!(err, PlacesError::MissingField(ref f) if f == "result"));
    }

    #[test]
    fn test_parse_malformed_body() {
        let err = parse_details_response("<html>Bad Gateway</html>").unwrap_err();

        assert!(matches!(err, PlacesError::ParseError(_)));
    }

    #[test]
    fn test_target_url_encodes_parameters() {
        let client = PlacesClient::new();

        let url = client.target_url("ChIJ abc", "key&x=1");

        assert_eq!(
            url,
            "https://maps.googleapis.com/maps/api/place/details/json?place_id=ChIJ%20abc&fields=reviews,rating,user_ratings_total&key=key%26x%3D1"
        );
    }

    #[test]
    fn test_proxied_url_wraps_encoded_target() {
        let client = PlacesClient::with_proxy("https://proxy.example/raw?url=");

        let url = client.proxied_url("place", "key");

        assert!(url.starts_with("https://proxy.example/raw?url=https%3A%2F%2Fmaps.googleapis.com"));
        assert!(!url.contains("place_id=place"), "Target must be encoded: {}", url);
        assert!(url.contains("place_id%3Dplace"));
    }

    #[tokio::test]
    async fn test_fetch_goes_through_proxy() {
        let server = MockServer::start().await;
        let client = PlacesClient::with_proxy(format!("{}/raw?url=", server.uri()));
        let expected_target = client.target_url("place-1", "secret");

        Mock::given(method("GET"))
            .and(path("/raw"))
            .and(query_param("url", expected_target.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RESPONSE))
            .expect(1)
            .mount(&server)
            .await;

        let parsed = client
            .fetch_place_reviews("place-1", "secret")
            .await
            .expect("Fetch should succeed");

        assert_eq!(parsed.reviews.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_error() {
        let server = MockServer::start().await;
        let client = PlacesClient::with_proxy(format!("{}/raw?url=", server.uri()));

        Mock::given(method("GET"))
            .and(path("/raw"))
            .respond_with(ResponseTemplate::new(502).set_body_string(VALID_RESPONSE))
            .mount(&server)
            .await;

        let err = client.fetch_place_reviews("place-1", "secret").await.unwrap_err();

        assert!(matches!(err, PlacesError::HttpStatus(502)));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        let client = PlacesClient::with_proxy(format!("{}/raw?url=", server.uri()));

        Mock::given(method("GET"))
            .and(path("/raw"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = client.fetch_place_reviews("place-1", "secret").await.unwrap_err();

        match err {
            PlacesError::RequestFailed(e) => {
                assert!(e.is_decode(), "Expected decode error: {}", e)
            }
            other => panic!("Expected RequestFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_provider_denial_is_provider_error() {
        let server = MockServer::start().await;
        let client = PlacesClient::with_proxy(format!("{}/raw?url=", server.uri()));

        Mock::given(method("GET"))
            .and(path("/raw"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"error_message": "The provided API key is invalid.", "status": "REQUEST_DENIED"}"#,
            ))
            .mount(&server)
            .await;

        let err = client.fetch_place_reviews("place-1", "secret").await.unwrap_err();

        assert!(matches!(
            err,
            PlacesError::Provider { ref status, .. } if status == "REQUEST_DENIED"
        ));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_proxy_is_request_error() {
        let client = PlacesClient::with_proxy("http://127.0.0.1:9/raw?url=");

        let err = client.fetch_place_reviews("place-1", "secret").await.unwrap_err();

        assert!(matches!(err, PlacesError::RequestFailed(_)));
    }
}
