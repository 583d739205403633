//! Built-in character fixtures
//!
//! Served when no API keys are configured or mocking is requested, so the
//! views stay usable offline.

use async_trait::async_trait;
use tracing::debug;

use super::traits::CharacterSource;
use crate::errors::AppResult;
use crate::models::{Character, SearchQuery, SearchResult, Thumbnail};

pub const IRON_MAN_ID: i64 = 1009368;
pub const SPIDER_MAN_ID: i64 = 1009610;

/// The default fixture set
pub fn default_fixtures() -> Vec<Character> {
    vec![
        Character {
            id: IRON_MAN_ID,
            name: "Iron Man".to_string(),
            description: "Genius, billionaire, playboy, philanthropist.".to_string(),
            thumbnail: Some(Thumbnail::new(
                "https://i.annihil.us/u/prod/marvel/i/mg/9/c0/527bb7b37ff55",
                "jpg",
            )),
            urls: None,
        },
        Character {
            id: SPIDER_MAN_ID,
            name: "Spider-Man".to_string(),
            description: "Friendly neighborhood wall-crawler.".to_string(),
            thumbnail: Some(Thumbnail::new(
                "https://i.annihil.us/u/prod/marvel/i/mg/3/20/5232158de5b16",
                "jpg",
            )),
            urls: None,
        },
    ]
}

pub struct FixtureSource {
    characters: Vec<Character>,
}

impl Default for FixtureSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::with_characters(default_fixtures())
    }

    pub fn with_characters(characters: Vec<Character>) -> Self {
        Self { characters }
    }
}

#[async_trait]
impl CharacterSource for FixtureSource {
    fn source_name(&self) -> &str {
        "fixtures"
    }

    fn is_cacheable(&self) -> bool {
        false
    }

    /// Case-insensitive substring match on the name, paged locally
    async fn search(&self, query: &SearchQuery) -> AppResult<SearchResult> {
        let needle = query.query.to_lowercase();
        let matches: Vec<Character> = self
            .characters
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        debug!(
            "Fixture search '{}' matched {} of {} characters",
            query.query,
            matches.len(),
            self.characters.len()
        );
        Ok(SearchResult::from_page(matches, query.offset, query.limit))
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<Character>> {
        Ok(self.characters.iter().find(|c| c.id == id).cloned())
    }
}
