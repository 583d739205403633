//! Marvel public API source
//!
//! Issues signed GET requests against two endpoints:
//!
//! - `/characters` for prefix searches (`nameStartsWith`, `limit`, `offset`,
//!   `orderBy=name`)
//! - `/characters/{id}` for single records
//!
//! Transport failures and non-success statuses are returned as errors. A body
//! that is not valid JSON, or JSON without the expected envelope, is not an
//! error and degrades to an empty result.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::signer::AuthParams;
use super::traits::CharacterSource;
use crate::config::ApiConfig;
use crate::errors::{AppError, AppResult, SourceError};
use crate::models::{Character, SearchQuery, SearchResult, to_character};
use crate::utils::url::UrlUtils;

pub struct MarvelApiSource {
    client: Client,
    base_url: String,
    public_key: String,
    private_key: String,
}

impl MarvelApiSource {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let timeout = config
            .timeout_duration()
            .map_err(|e| AppError::configuration(e.to_string()))?;
        UrlUtils::join_path(&config.base_url, "characters").map_err(|e| {
            AppError::configuration(format!("Invalid API base URL '{}': {e}", config.base_url))
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        info!(
            "Marvel API source configured for {}",
            UrlUtils::extract_domain(&config.base_url).unwrap_or_else(|| config.base_url.clone())
        );

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            public_key: config.public_key.clone(),
            private_key: config.private_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        UrlUtils::join_path(&self.base_url, path)
            .map_err(|e| AppError::internal(format!("Failed to build URL for {path}: {e}")))
    }

    fn sign(&self, url: &mut Url, auth: &AuthParams) {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in auth.query_pairs() {
            pairs.append_pair(key, value);
        }
    }

    /// Search URL; `nameStartsWith` is only sent for a non-blank query
    pub fn search_url(&self, query: &SearchQuery, auth: &AuthParams) -> AppResult<Url> {
        let mut url = self.endpoint("characters")?;
        self.sign(&mut url, auth);
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("limit", &query.limit.to_string())
                .append_pair("offset", &query.offset.to_string())
                .append_pair("orderBy", "name");
            if let Some(prefix) = query.name_starts_with() {
                pairs.append_pair("nameStartsWith", prefix);
            }
        }
        Ok(url)
    }

    pub fn character_url(&self, id: i64, auth: &AuthParams) -> AppResult<Url> {
        let mut url = self.endpoint(&format!("characters/{id}"))?;
        self.sign(&mut url, auth);
        Ok(url)
    }

    fn auth(&self) -> AuthParams {
        AuthParams::now(&self.private_key, &self.public_key)
    }

    /// GET and decode JSON, mapping an undecodable body to `Value::Null`
    async fn fetch_payload(&self, url: Url) -> AppResult<Value> {
        let safe_url = UrlUtils::obfuscate_credentials(url.as_str());
        debug!("Fetching {}", safe_url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout {
                    url: safe_url.clone(),
                }
            } else {
                SourceError::transport(UrlUtils::obfuscate_credentials(&e.to_string()))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::http(
                status.as_u16(),
                format!(
                    "{} - URL: {}",
                    status.canonical_reason().unwrap_or("Unknown"),
                    safe_url
                ),
            )
            .into());
        }

        let bytes = response.bytes().await.map_err(|e| SourceError::ParseError {
            message: format!("Failed to read response: {}", UrlUtils::obfuscate_credentials(&e.to_string())),
        })?;
        debug!("Fetched {} bytes from {}", bytes.len(), safe_url);

        Ok(decode_payload(&bytes, &safe_url))
    }
}

#[async_trait]
impl CharacterSource for MarvelApiSource {
    fn source_name(&self) -> &str {
        "marvel"
    }

    async fn search(&self, query: &SearchQuery) -> AppResult<SearchResult> {
        let url = self.search_url(query, &self.auth())?;
        let payload = self.fetch_payload(url).await?;
        let result = SearchResult::from_payload(&payload);
        debug!(
            "Search '{}' offset {} limit {}: {} of {} results",
            query.query, query.offset, query.limit, result.count, result.total
        );
        Ok(result)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Character>> {
        let url = self.character_url(id, &self.auth())?;
        let payload = self.fetch_payload(url).await?;
        Ok(first_record(&payload))
    }
}

/// Decoded JSON body, `Value::Null` when the bytes are not JSON
fn decode_payload(bytes: &[u8], safe_url: &str) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|e| {
        warn!("Discarding malformed payload from {}: {}", safe_url, e);
        Value::Null
    })
}

/// First record of `data.results`, normalized
fn first_record(payload: &Value) -> Option<Character> {
    payload
        .get("data")?
        .get("results")?
        .as_array()?
        .first()
        .map(to_character)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn source() -> MarvelApiSource {
        let config = ApiConfig {
            base_url: "https://gateway.example.com/v1/public".to_string(),
            public_key: "1234".to_string(),
            private_key: "abcd".to_string(),
            ..ApiConfig::default()
        };
        MarvelApiSource::new(&config).unwrap()
    }

    fn params(url: &Url) -> HashMap<String, String> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_search_url_with_prefix() {
        let auth = AuthParams::sign("1", "abcd", "1234");
        let url = source()
            .search_url(&SearchQuery::new("  spider ", 40, 40), &auth)
            .unwrap();

        assert_eq!(url.path(), "/v1/public/characters");
        let params = params(&url);
        assert_eq!(params["nameStartsWith"], "spider");
        assert_eq!(params["limit"], "40");
        assert_eq!(params["offset"], "40");
        assert_eq!(params["orderBy"], "name");
        assert_eq!(params["ts"], "1");
        assert_eq!(params["apikey"], "1234");
        assert_eq!(params["hash"], "ffd275c5130566a2916217b101f26150");
    }

    #[test]
    fn test_search_url_omits_blank_prefix() {
        let auth = AuthParams::sign("1", "abcd", "1234");
        let url = source().search_url(&SearchQuery::new("   ", 0, 20), &auth).unwrap();
        assert!(!params(&url).contains_key("nameStartsWith"));
    }

    #[test]
    fn test_character_url_carries_only_auth() {
        let auth = AuthParams::sign("1", "abcd", "1234");
        let url = source().character_url(1009368, &auth).unwrap();
        assert_eq!(url.path(), "/v1/public/characters/1009368");
        assert_eq!(params(&url).len(), 3);
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let config = ApiConfig {
            base_url: "::not a url::".to_string(),
            ..ApiConfig::default()
        };
        assert!(MarvelApiSource::new(&config).is_err());
    }

    #[test]
    fn test_malformed_body_degrades_to_empty() {
        let payload = decode_payload(b"<html>502 Bad Gateway</html>", "https://gateway");
        assert_eq!(payload, Value::Null);
        assert!(SearchResult::from_payload(&payload).is_empty());
        assert_eq!(first_record(&payload), None);

        let body = br#"{"data": {"total": 1, "results": [{"id": 5, "name": "Thor"}]}}"#;
        let payload = decode_payload(body, "https://gateway");
        assert_eq!(SearchResult::from_payload(&payload).results[0].name, "Thor");
    }

    #[test]
    fn test_first_record() {
        let payload = json!({"data": {"results": [{"id": 7, "name": "Hulk"}, {"id": 8}]}});
        assert_eq!(first_record(&payload).map(|c| c.id), Some(7));
        assert_eq!(first_record(&json!({"data": {"results": []}})), None);
        assert_eq!(first_record(&Value::Null), None);
    }
}
