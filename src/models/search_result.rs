use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::character::{Character, to_character};

/// One page of a name search
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matches across all pages
    pub total: u64,
    /// Records in this page
    pub count: u64,
    pub results: Vec<Character>,
}

impl SearchResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Slice a locally held list the way the remote pages its results
    pub fn from_page(list: Vec<Character>, offset: u32, limit: u32) -> Self {
        let total = list.len() as u64;
        let results: Vec<Character> = list
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Self {
            total,
            count: results.len() as u64,
            results,
        }
    }

    /// Normalize a decoded `{ data: { total, count, results } }` envelope
    ///
    /// Anything missing or malformed degrades to an empty result. `total` and
    /// `count` fall back to the number of records, and `total` is never
    /// reported below `count`.
    pub fn from_payload(payload: &Value) -> Self {
        let data = payload.get("data");
        let results: Vec<Character> = data
            .and_then(|d| d.get("results"))
            .and_then(Value::as_array)
            .map(|records| records.iter().map(to_character).collect())
            .unwrap_or_default();

        let len = results.len() as u64;
        let count = data.and_then(|d| coerce_count(d.get("count"))).unwrap_or(len);
        let total = data
            .and_then(|d| coerce_count(d.get("total")))
            .unwrap_or(len)
            .max(count);

        Self {
            total,
            count,
            results,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

fn coerce_count(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parameters of one prefix search
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    pub query: String,
    pub offset: u32,
    pub limit: u32,
}

impl SearchQuery {
    pub fn new<Q: Into<String>>(query: Q, offset: u32, limit: u32) -> Self {
        Self {
            query: query.into(),
            offset,
            limit,
        }
    }

    /// `search:<lowercased query>|<offset>|<limit>`
    pub fn cache_key(&self) -> String {
        format!(
            "search:{}|{}|{}",
            self.query.to_lowercase(),
            self.offset,
            self.limit
        )
    }

    /// Trimmed query, `None` when nothing is left to match on
    pub fn name_starts_with(&self) -> Option<&str> {
        let trimmed = self.query.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
