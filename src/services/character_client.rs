//! Character Client
//!
//! Entry point for the views and the gallery. Wraps a [`CharacterSource`]
//! and, for cacheable sources, routes searches through the injected
//! [`ResponseCache`].

use std::sync::Arc;
use tracing::debug;

use crate::cache::{ResponseCache, SessionStore};
use crate::config::ApiConfig;
use crate::config::defaults::DEFAULT_SEARCH_LIMIT;
use crate::errors::AppResult;
use crate::models::{Character, SearchQuery, SearchResult, Thumbnail, character};
use crate::sources::{CharacterSource, SourceFactory};

pub struct CharacterClient {
    source: Arc<dyn CharacterSource>,
    cache: Option<Arc<ResponseCache<SearchResult>>>,
}

impl CharacterClient {
    /// Client over `source`, caching only when the source allows it
    pub fn new(source: Arc<dyn CharacterSource>, cache: Arc<ResponseCache<SearchResult>>) -> Self {
        let cache = source.is_cacheable().then_some(cache);
        Self { source, cache }
    }

    /// Client that always goes to the source
    pub fn uncached(source: Arc<dyn CharacterSource>) -> Self {
        Self {
            source,
            cache: None,
        }
    }

    pub fn from_config(config: &ApiConfig, store: Arc<dyn SessionStore>) -> AppResult<Self> {
        let source = SourceFactory::create_source(config)?;
        Ok(Self::new(source, Arc::new(ResponseCache::new(store))))
    }

    /// True when serving fixtures instead of the live API
    pub fn is_mock(&self) -> bool {
        !self.source.is_cacheable()
    }

    pub fn source_name(&self) -> &str {
        self.source.source_name()
    }

    pub async fn search_characters(
        &self,
        query: &str,
        offset: u32,
        limit: u32,
    ) -> AppResult<SearchResult> {
        let request = SearchQuery::new(query, offset, limit);
        match &self.cache {
            Some(cache) => {
                cache
                    .get_or_compute(&request.cache_key(), || self.source.search(&request))
                    .await
            }
            None => self.source.search(&request).await,
        }
    }

    /// First page with the default page size
    pub async fn search(&self, query: &str) -> AppResult<SearchResult> {
        self.search_characters(query, 0, DEFAULT_SEARCH_LIMIT).await
    }

    pub async fn get_character_by_id(&self, id: i64) -> AppResult<Option<Character>> {
        let character = self.source.get_by_id(id).await?;
        debug!(
            "Lookup of character {} via {}: {}",
            id,
            self.source.source_name(),
            if character.is_some() { "found" } else { "not found" }
        );
        Ok(character)
    }

    pub fn image_url(thumbnail: Option<&Thumbnail>, variant: &str) -> Option<String> {
        character::image_url(thumbnail, variant)
    }

    /// Drop every cached search
    pub async fn clear_cache(&self) -> AppResult<()> {
        match &self.cache {
            Some(cache) => cache.clear().await,
            None => Ok(()),
        }
    }
}
