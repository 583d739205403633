//! Gallery Aggregator
//!
//! Loads the gallery as a set of per-letter partitions. Each pass fans out
//! one prefix search per letter, waits for every partition to settle, and
//! merges the successful pages by character id. A failed partition only
//! loses its own contribution.
//!
//! Three triggers drive it:
//!
//! - [`GalleryAggregator::cold_start`]: seed letters, when nothing is loaded
//! - [`GalleryAggregator::toggle_group`] / [`GalleryAggregator::set_groups`]:
//!   refetch page zero of every active letter and replace the items
//! - [`GalleryAggregator::load_more`]: next page of every active letter,
//!   merged into the existing items
//!
//! Every pass takes a generation number. A pass that resolves after a newer
//! one has started is discarded instead of merged.

use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::filter;
use super::groups::LetterGroup;
use super::state::{GalleryState, GalleryStateStore};
use crate::config::GalleryConfig;
use crate::errors::AppResult;
use crate::models::{Character, SearchResult};
use crate::services::CharacterClient;

/// Outcome of one partition of a pass
pub type Settled = (String, u32, AppResult<SearchResult>);

/// What a completed pass did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    pub generation: u64,
    pub partitions: usize,
    pub failed: Vec<String>,
    /// Characters received, before deduplication
    pub received: usize,
    /// Size of `items` after the merge
    pub total_items: usize,
}

pub struct GalleryAggregator {
    client: Arc<CharacterClient>,
    store: Arc<dyn GalleryStateStore>,
    state: RwLock<GalleryState>,
    page_size: u32,
    seed_letters: Vec<String>,
    generation: AtomicU64,
    in_flight: AtomicUsize,
}

/// Decrements the in-flight counter when a pass ends, however it ends
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl GalleryAggregator {
    pub fn new(
        client: Arc<CharacterClient>,
        store: Arc<dyn GalleryStateStore>,
        config: &GalleryConfig,
        state: GalleryState,
    ) -> Self {
        Self {
            client,
            store,
            state: RwLock::new(state),
            page_size: config.page_size,
            seed_letters: config.seed_letters.clone(),
            generation: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Aggregator rehydrated from `store`, empty when nothing was saved
    pub async fn restore(
        client: Arc<CharacterClient>,
        store: Arc<dyn GalleryStateStore>,
        config: &GalleryConfig,
    ) -> Self {
        let state = store.load().await.unwrap_or_default();
        Self::new(client, store, config, state)
    }

    pub async fn snapshot(&self) -> GalleryState {
        self.state.read().await.clone()
    }

    pub async fn groups(&self) -> Vec<LetterGroup> {
        self.state.read().await.groups.clone()
    }

    pub async fn active_letters(&self) -> Vec<&'static str> {
        self.state.read().await.active_letters()
    }

    pub async fn offsets(&self) -> BTreeMap<String, u32> {
        self.state
            .read()
            .await
            .offsets
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Visible characters, see [`filter::displayed`]
    pub async fn displayed(&self) -> Vec<Character> {
        let state = self.state.read().await;
        filter::displayed(&state).into_iter().cloned().collect()
    }

    /// Detail navigation order, derived from the visible characters
    pub async fn ids(&self) -> Vec<i64> {
        filter::displayed_ids(&*self.state.read().await)
    }

    pub async fn set_need_description(&self, need_description: bool) {
        let mut state = self.state.write().await;
        state.need_description = need_description;
        self.persist(&state).await;
    }

    /// Fetch the seed letters when nothing is loaded and no group is active
    ///
    /// Each seed's offset moves to one page whether or not its fetch
    /// succeeded, so a failing letter is not refetched from zero on every
    /// start.
    pub async fn cold_start(&self) -> Option<PassSummary> {
        {
            let state = self.state.read().await;
            if !state.items.is_empty() || !state.groups.is_empty() {
                debug!("Skipping cold start: gallery already populated");
                return None;
            }
        }

        let _in_flight = self.enter_pass();
        let generation = self.next_generation();
        let requests: Vec<(String, u32)> =
            self.seed_letters.iter().map(|l| (l.clone(), 0)).collect();
        let settled = self.fetch_partitions(requests).await;

        let mut state = self.state.write().await;
        if self.is_stale(generation) {
            debug!("Discarding stale cold start pass {}", generation);
            return None;
        }

        let mut fresh = GalleryState::default();
        let summary = self.merge_settled(&mut fresh, &settled, generation);
        state.items = fresh.items;
        for letter in &self.seed_letters {
            state.offsets.insert(letter.clone(), self.page_size);
        }
        let summary = PassSummary {
            total_items: state.items.len(),
            ..summary
        };
        self.persist(&state).await;

        info!(
            "Cold start loaded {} characters from {} seed letters ({} failed)",
            summary.total_items,
            summary.partitions,
            summary.failed.len()
        );
        Some(summary)
    }

    /// Add or remove one group, then refetch when any group remains active
    pub async fn toggle_group(&self, group: LetterGroup) -> Option<PassSummary> {
        let groups = {
            let mut state = self.state.write().await;
            state.toggle_group(group);
            self.persist(&state).await;
            state.groups.clone()
        };
        self.refetch_groups(groups).await
    }

    /// Replace the active groups, then refetch when any group is active
    pub async fn set_groups(&self, groups: &[LetterGroup]) -> Option<PassSummary> {
        let groups = {
            let mut state = self.state.write().await;
            state.set_groups(groups);
            self.persist(&state).await;
            state.groups.clone()
        };
        self.refetch_groups(groups).await
    }

    /// First page of every active letter; replaces `items` wholesale
    ///
    /// Without active groups nothing is fetched and `items` is left as is;
    /// the display filter is what stops hiding characters.
    async fn refetch_groups(&self, groups: Vec<LetterGroup>) -> Option<PassSummary> {
        if groups.is_empty() {
            return None;
        }
        let letters = super::groups::active_letters(&groups);

        let _in_flight = self.enter_pass();
        let generation = self.next_generation();
        {
            let mut state = self.state.write().await;
            for letter in &letters {
                state.offsets.insert(letter.to_string(), 0);
            }
        }

        let requests: Vec<(String, u32)> = letters.iter().map(|l| (l.to_string(), 0)).collect();
        let settled = self.fetch_partitions(requests).await;

        let mut state = self.state.write().await;
        if self.is_stale(generation) {
            debug!("Discarding stale group pass {}", generation);
            return None;
        }

        let mut fresh = GalleryState::default();
        let summary = self.merge_settled(&mut fresh, &settled, generation);
        state.items = fresh.items;
        for letter in &letters {
            state.offsets.insert(letter.to_string(), self.page_size);
        }
        let summary = PassSummary {
            total_items: state.items.len(),
            ..summary
        };
        self.persist(&state).await;

        info!(
            "Loaded {} characters for groups {:?} ({} letters failed)",
            summary.total_items,
            groups,
            summary.failed.len()
        );
        Some(summary)
    }

    /// Next page of every active letter, merged into the current items
    ///
    /// Returns `None` without fetching when no group is active or another
    /// pass is in flight. A letter's offset advances by one page only when
    /// its fetch succeeded with at least one record.
    pub async fn load_more(&self) -> Option<PassSummary> {
        let requests: Vec<(String, u32)> = {
            let state = self.state.read().await;
            state
                .active_letters()
                .into_iter()
                .map(|l| (l.to_string(), state.offset_for(l)))
                .collect()
        };
        if requests.is_empty() {
            return None;
        }
        if self
            .in_flight
            .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Load more ignored: a pass is already in flight");
            return None;
        }
        let _in_flight = InFlight(&self.in_flight);

        let generation = self.next_generation();
        let settled = self.fetch_partitions(requests).await;

        let mut state = self.state.write().await;
        if self.is_stale(generation) {
            debug!("Discarding stale load more pass {}", generation);
            return None;
        }

        let summary = self.merge_settled(&mut state, &settled, generation);
        for (letter, offset, result) in &settled {
            if let Ok(page) = result
                && !page.results.is_empty()
            {
                state
                    .offsets
                    .insert(letter.clone(), offset + self.page_size);
            }
        }
        let summary = PassSummary {
            total_items: state.items.len(),
            ..summary
        };
        self.persist(&state).await;

        info!(
            "Load more received {} characters, {} loaded in total",
            summary.received, summary.total_items
        );
        Some(summary)
    }

    /// One search per `(letter, offset)`, all polled concurrently
    ///
    /// Resolves once every partition has succeeded or failed; a failure never
    /// cancels its siblings.
    async fn fetch_partitions(&self, requests: Vec<(String, u32)>) -> Vec<Settled> {
        let page_size = self.page_size;
        let tasks = requests.into_iter().map(|(letter, offset)| {
            let client = Arc::clone(&self.client);
            async move {
                let result = client.search_characters(&letter, offset, page_size).await;
                (letter, offset, result)
            }
        });
        join_all(tasks).await
    }

    fn merge_settled(
        &self,
        target: &mut GalleryState,
        settled: &[Settled],
        generation: u64,
    ) -> PassSummary {
        let mut failed = Vec::new();
        let mut received = 0;
        for (letter, offset, result) in settled {
            match result {
                Ok(page) => {
                    received += page.results.len();
                    target.merge(page.results.iter().cloned());
                }
                Err(e) => {
                    warn!("Partition '{}' at offset {} failed: {}", letter, offset, e);
                    failed.push(letter.clone());
                }
            }
        }
        PassSummary {
            generation,
            partitions: settled.len(),
            failed,
            received,
            total_items: target.items.len(),
        }
    }

    fn enter_pass(&self) -> InFlight<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlight(&self.in_flight)
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }

    async fn persist(&self, state: &GalleryState) {
        if let Err(e) = self.store.save(state).await {
            warn!("Failed to persist gallery state: {}", e);
        }
    }
}
