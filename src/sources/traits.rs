//! Source trait definitions

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::{Character, SearchQuery, SearchResult};

/// Where character data comes from
#[async_trait]
pub trait CharacterSource: Send + Sync {
    /// Short name used in logs
    fn source_name(&self) -> &str;

    /// Whether results may be memoized in the response cache
    fn is_cacheable(&self) -> bool {
        true
    }

    /// One page of characters whose name starts with (or, for fixtures,
    /// contains) the query
    async fn search(&self, query: &SearchQuery) -> AppResult<SearchResult>;

    /// A single character, `None` when the id is unknown
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Character>>;
}
