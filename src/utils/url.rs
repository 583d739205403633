//! URL utilities for consistent URL handling
//!
//! Request URLs for the character API carry the signing parameters in the
//! query string, so anything that ends up in a log goes through
//! [`UrlUtils::obfuscate_credentials`] first.

use regex::Regex;
use url::Url;

/// Query parameters that must never be logged in clear text
const SENSITIVE_PARAMS: [&str; 5] = ["apikey", "hash", "ts", "password", "username"];

/// URL utilities for consistent URL handling
pub struct UrlUtils;

impl UrlUtils {
    /// Join a base URL and a relative endpoint path
    ///
    /// Unlike [`Url::join`], the last segment of `base` is kept, so
    /// `https://host/v1/public` joined with `characters/1` yields
    /// `https://host/v1/public/characters/1`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use marvel_gallery::utils::url::UrlUtils;
    ///
    /// let url = UrlUtils::join_path("https://example.com/v1/public/", "/characters").unwrap();
    /// assert_eq!(url.as_str(), "https://example.com/v1/public/characters");
    /// ```
    pub fn join_path(base: &str, path: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }

    /// Extract the domain from a URL
    pub fn extract_domain(url: &str) -> Option<String> {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
    }

    /// Obfuscate sensitive information in URLs for safe logging
    ///
    /// Masks URL user info and the signing parameters (`apikey`, `hash`,
    /// `ts`) in the query string. Also applied to error messages, which
    /// often embed the failing URL.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use marvel_gallery::utils::url::UrlUtils;
    ///
    /// let url = "https://example.com/characters?ts=1&apikey=abc&hash=def&limit=20";
    /// assert_eq!(
    ///     UrlUtils::obfuscate_credentials(url),
    ///     "https://example.com/characters?ts=****&apikey=****&hash=****&limit=20"
    /// );
    /// ```
    pub fn obfuscate_credentials(url: &str) -> String {
        let mut obfuscated = url.to_string();

        if let Ok(parsed) = Url::parse(url)
            && (!parsed.username().is_empty() || parsed.password().is_some())
        {
            let mut new_url = parsed.clone();
            let _ = new_url.set_username("****");
            let _ = new_url.set_password(Some("****"));
            obfuscated = new_url.to_string();
        }

        for param in &SENSITIVE_PARAMS {
            let pattern = format!(r"(?i)([?&]{}=)[^&\s]*", regex::escape(param));
            if let Ok(re) = Regex::new(&pattern) {
                obfuscated = re.replace_all(&obfuscated, "${1}****").to_string();
            }
        }

        obfuscated
    }
}
