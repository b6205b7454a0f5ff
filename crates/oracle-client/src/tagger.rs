//! Client for the external taste-tagging service.
//!
//! One call per taste input: `GET {base}/search?query=<name>` with the
//! service credential in `X-Api-Key`. Only the `tags` array of the body is
//! used.

use std::time::Duration;

use async_trait::async_trait;
use catalog::TasteInput;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::endpoint::join_under;
use crate::error::TaggerError;

/// Header carrying the tagging service credential
const API_KEY_HEADER: &str = "X-Api-Key";

/// Anything that can turn one taste input into a list of tags.
///
/// Implemented by [`QlooTagger`] for production and by stubs in tests.
#[async_trait]
pub trait TasteTagger: Send + Sync {
    /// Returns the name of this tagger (for logging/debugging)
    fn name(&self) -> &str;

    /// Fetch tags for a single input.
    async fn tags_for(&self, input: &TasteInput) -> Result<Vec<String>, TaggerError>;
}

/// Settings for [`QlooTagger`].
#[derive(Debug, Clone)]
pub struct TaggerConfig {
    pub base_url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    /// Missing and `null` both mean no tags
    #[serde(default)]
    tags: Option<Vec<Value>>,
}

/// A tag may come back as a bare string or as an object with a name.
/// Anything else is skipped.
fn tag_label(tag: Value) -> Option<String> {
    match tag {
        Value::String(label) => Some(label),
        Value::Object(mut fields) => match fields.remove("name") {
            Some(Value::String(name)) => Some(name),
            _ => None,
        },
        _ => None,
    }
}

/// HTTP client for the tagging service.
#[derive(Debug, Clone)]
pub struct QlooTagger {
    client: Client,
    search_url: Url,
    api_key: String,
}

impl QlooTagger {
    pub fn new(config: TaggerConfig) -> Result<Self, TaggerError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;

        let search_url =
            join_under(&config.base_url, "search").map_err(TaggerError::InvalidUrl)?;

        Ok(Self {
            client,
            search_url,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl TasteTagger for QlooTagger {
    fn name(&self) -> &str {
        "qloo"
    }

    async fn tags_for(&self, input: &TasteInput) -> Result<Vec<String>, TaggerError> {
        debug!(name = %input.name, kind = %input.kind, "Requesting taste tags");

        let response = self
            .client
            .get(self.search_url.clone())
            .query(&[("query", input.name.as_str())])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(TaggerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response.json().await?;
        let tags: Vec<String> = parsed
            .tags
            .unwrap_or_default()
            .into_iter()
            .filter_map(tag_label)
            .collect();
        debug!(name = %input.name, count = tags.len(), "Received taste tags");
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> TaggerConfig {
        TaggerConfig {
            base_url,
            api_key: "test-key".to_string(),
            connect_timeout: Duration::from_secs(1),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_tags_for_sends_query_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("query", "Spirited Away"))
            .and(header("X-Api-Key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tags": ["whimsical", {"name": "studio ghibli"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tagger = QlooTagger::new(test_config(server.uri())).expect("tagger should build");
        let tags = tagger
            .tags_for(&TasteInput::new("Spirited Away", "movie"))
            .await
            .expect("tags should load");

        assert_eq!(tags, vec!["whimsical", "studio ghibli"]);
    }

    #[tokio::test]
    async fn test_tags_for_defaults_missing_tags_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": []
            })))
            .mount(&server)
            .await;

        let tagger = QlooTagger::new(test_config(server.uri())).unwrap();
        let tags = tagger.tags_for(&TasteInput::new("Dune", "book")).await.unwrap();

        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn test_tags_for_rejects_non_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let tagger = QlooTagger::new(test_config(server.uri())).unwrap();
        let err = tagger
            .tags_for(&TasteInput::new("Dune", "book"))
            .await
            .unwrap_err();

        assert!(matches!(err, TaggerError::Status { status: 403, .. }));
    }

    #[test]
    fn test_new_rejects_bad_base_url() {
        let err = QlooTagger::new(test_config("not a url".to_string())).unwrap_err();
        assert!(matches!(err, TaggerError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_tags_for_treats_null_tags_as_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tags": null
            })))
            .mount(&server)
            .await;

        let tagger = QlooTagger::new(test_config(server.uri())).unwrap();
        let tags = tagger.tags_for(&TasteInput::new("Dune", "book")).await.unwrap();

        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn test_tags_for_skips_unrecognised_tags() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tags": ["retro", {"id": "x"}, 42, {"name": "arcade"}, {"name": 7}]
            })))
            .mount(&server)
            .await;

        let tagger = QlooTagger::new(test_config(server.uri())).unwrap();
        let tags = tagger
            .tags_for(&TasteInput::new("Street Fighter II", "game"))
            .await
            .unwrap();

        assert_eq!(tags, vec!["retro", "arcade"]);
    }

    #[tokio::test]
    async fn test_tags_for_keeps_base_path_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/qloo/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tags": ["noir"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tagger = QlooTagger::new(test_config(format!("{}/qloo", server.uri()))).unwrap();
        let tags = tagger
            .tags_for(&TasteInput::new("Chinatown", "movie"))
            .await
            .unwrap();

        assert_eq!(tags, vec!["noir"]);
    }
}
