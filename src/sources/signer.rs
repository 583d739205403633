//! Request signing for the public API
//!
//! Every request carries `ts`, `apikey` and `hash = md5(ts + private + public)`.
//! The signature depends on the timestamp, so it is built per request.

use chrono::Utc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthParams {
    pub ts: String,
    pub apikey: String,
    pub hash: String,
}

impl AuthParams {
    /// Sign with an explicit timestamp
    pub fn sign(ts: &str, private_key: &str, public_key: &str) -> Self {
        let digest = md5::compute(format!("{ts}{private_key}{public_key}").as_bytes());
        Self {
            ts: ts.to_string(),
            apikey: public_key.to_string(),
            hash: format!("{digest:x}"),
        }
    }

    /// Sign with the current time in epoch milliseconds
    pub fn now(private_key: &str, public_key: &str) -> Self {
        let ts = Utc::now().timestamp_millis().to_string();
        Self::sign(&ts, private_key, public_key)
    }

    pub fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("ts", self.ts.as_str()),
            ("apikey", self.apikey.as_str()),
            ("hash", self.hash.as_str()),
        ]
    }
}
