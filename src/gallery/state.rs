//! Gallery state and its persistence

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

use super::groups::{LetterGroup, active_letters};
use crate::cache::SessionStore;
use crate::errors::AppResult;
use crate::models::Character;

/// Session key of the serialized gallery
pub const GALLERY_STATE_KEY: &str = "gallery_state_v2";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryState {
    /// Loaded characters keyed by id
    #[serde(default)]
    pub items: BTreeMap<i64, Character>,
    /// Active letter groups in activation order
    #[serde(default)]
    pub groups: Vec<LetterGroup>,
    #[serde(default, alias = "needDesc")]
    pub need_description: bool,
    /// Next offset to request per letter
    #[serde(default)]
    pub offsets: HashMap<String, u32>,
}

impl GalleryState {
    pub fn active_letters(&self) -> Vec<&'static str> {
        active_letters(&self.groups)
    }

    pub fn offset_for(&self, letter: &str) -> u32 {
        self.offsets.get(letter).copied().unwrap_or(0)
    }

    /// Add `group` when absent, remove it when present
    pub fn toggle_group(&mut self, group: LetterGroup) {
        if let Some(pos) = self.groups.iter().position(|g| *g == group) {
            self.groups.remove(pos);
        } else {
            self.groups.push(group);
        }
    }

    /// Replace the active groups, dropping duplicates but keeping order
    pub fn set_groups(&mut self, groups: &[LetterGroup]) {
        self.groups.clear();
        for group in groups {
            if !self.groups.contains(group) {
                self.groups.push(*group);
            }
        }
    }

    /// Union `characters` into `items`; a later record replaces an earlier one
    pub fn merge<I: IntoIterator<Item = Character>>(&mut self, characters: I) {
        for character in characters {
            self.items.insert(character.id, character);
        }
    }
}

/// Where gallery state is kept between runs
#[async_trait]
pub trait GalleryStateStore: Send + Sync {
    /// Saved state, `None` when nothing usable is stored
    async fn load(&self) -> Option<GalleryState>;
    async fn save(&self, state: &GalleryState) -> AppResult<()>;
}

/// Gallery state as one JSON document in a [`SessionStore`]
pub struct SessionGalleryStore {
    store: Arc<dyn SessionStore>,
}

impl SessionGalleryStore {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl GalleryStateStore for SessionGalleryStore {
    async fn load(&self) -> Option<GalleryState> {
        let raw = match self.store.get(GALLERY_STATE_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read gallery state: {}", e);
                return None;
            }
        };
        match serde_json::from_str::<GalleryState>(&raw) {
            Ok(state) => {
                debug!(
                    "Restored gallery state: {} items, groups {:?}",
                    state.items.len(),
                    state.groups
                );
                Some(state)
            }
            Err(e) => {
                warn!("Ignoring corrupt gallery state: {}", e);
                None
            }
        }
    }

    async fn save(&self, state: &GalleryState) -> AppResult<()> {
        let json = serde_json::to_string(state)?;
        self.store.set(GALLERY_STATE_KEY, &json).await
    }
}
