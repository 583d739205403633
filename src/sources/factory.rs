//! Source selection from configuration

use std::sync::Arc;
use tracing::info;

use super::fixtures::FixtureSource;
use super::marvel::MarvelApiSource;
use super::traits::CharacterSource;
use crate::config::ApiConfig;
use crate::errors::AppResult;

pub struct SourceFactory;

impl SourceFactory {
    /// Fixtures in mock mode, the live API otherwise
    pub fn create_source(config: &ApiConfig) -> AppResult<Arc<dyn CharacterSource>> {
        if config.mock_mode() {
            if config.use_mock {
                info!("Mock mode enabled, serving built-in fixtures");
            } else {
                info!("API keys not configured, serving built-in fixtures");
            }
            return Ok(Arc::new(FixtureSource::new()));
        }
        Ok(Arc::new(MarvelApiSource::new(config)?))
    }
}
