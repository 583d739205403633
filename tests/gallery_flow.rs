//! Gallery loading against a fake catalog, persisted in a file-backed session

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use marvel_gallery::cache::{FileSessionStore, SessionStore};
use marvel_gallery::config::GalleryConfig;
use marvel_gallery::errors::{AppResult, SourceError};
use marvel_gallery::gallery::{
    GalleryAggregator, GalleryRequest, LetterGroup, SessionGalleryStore,
};
use marvel_gallery::models::{Character, SearchQuery, SearchResult, Thumbnail};
use marvel_gallery::services::CharacterClient;
use marvel_gallery::sources::CharacterSource;

const PAGE_SIZE: u32 = 3;
const PER_LETTER: u32 = 5;

/// Five characters per letter; letters in `failing` return a 500
struct Catalog {
    calls: AtomicUsize,
    failing: Vec<String>,
}

impl Catalog {
    fn new(failing: &[&str]) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failing: failing.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn character(letter: char, n: u32) -> Character {
        Character {
            id: (letter as i64) * 100 + n as i64,
            name: format!("{}hero {}", letter.to_ascii_uppercase(), n),
            description: if n % 2 == 0 {
                format!("Hero number {n}")
            } else {
                String::new()
            },
            thumbnail: Some(Thumbnail::new(format!("http://img/{letter}{n}"), "jpg")),
            urls: None,
        }
    }
}

#[async_trait]
impl CharacterSource for Catalog {
    fn source_name(&self) -> &str {
        "catalog"
    }

    async fn search(&self, query: &SearchQuery) -> AppResult<SearchResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let letter = query.name_starts_with().unwrap_or("a");
        if self.failing.iter().any(|f| f == letter) {
            return Err(SourceError::http(500, "upstream failure").into());
        }
        let first = letter.chars().next().unwrap_or('a');
        let list: Vec<Character> = (0..PER_LETTER).map(|n| Self::character(first, n)).collect();
        Ok(SearchResult::from_page(list, query.offset, query.limit))
    }

    async fn get_by_id(&self, _id: i64) -> AppResult<Option<Character>> {
        Ok(None)
    }
}

fn gallery_config() -> GalleryConfig {
    GalleryConfig {
        page_size: PAGE_SIZE,
        ..GalleryConfig::default()
    }
}

async fn aggregator(
    catalog: Arc<Catalog>,
    store: Arc<dyn SessionStore>,
) -> GalleryAggregator {
    let client = Arc::new(CharacterClient::new(
        catalog,
        Arc::new(marvel_gallery::cache::ResponseCache::new(store.clone())),
    ));
    let state_store = Arc::new(SessionGalleryStore::new(store));
    GalleryAggregator::restore(client, state_store, &gallery_config()).await
}

#[tokio::test]
async fn test_cold_start_survives_failures_and_restores() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open(dir.path()).await.unwrap());
    let catalog = Arc::new(Catalog::new(&["x"]));

    let gallery = aggregator(catalog.clone(), store.clone()).await;
    let summary = gallery.cold_start().await.unwrap();
    assert_eq!(summary.partitions, 10);
    assert_eq!(summary.failed, vec!["x".to_string()]);
    assert_eq!(summary.total_items, 9 * PAGE_SIZE as usize);

    let ids = gallery.ids().await;
    let unique: HashSet<i64> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());

    let offsets = gallery.offsets().await;
    assert_eq!(offsets.get("x"), Some(&PAGE_SIZE));
    assert_eq!(offsets.get("a"), Some(&PAGE_SIZE));

    // A second aggregator over the same session sees the saved state and
    // does not cold start again.
    let restored = aggregator(catalog.clone(), store).await;
    assert_eq!(restored.ids().await, ids);
    assert!(restored.cold_start().await.is_none());
}

#[tokio::test]
async fn test_group_paging_and_description_filter() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open(dir.path()).await.unwrap());
    let gallery = aggregator(Arc::new(Catalog::new(&[])), store).await;

    gallery.toggle_group(LetterGroup::AF).await.unwrap();
    assert_eq!(gallery.active_letters().await, ["a", "b", "c", "d", "e", "f"]);
    assert_eq!(gallery.displayed().await.len(), 6 * PAGE_SIZE as usize);

    let more = gallery.load_more().await.unwrap();
    assert_eq!(more.received, 6 * (PER_LETTER - PAGE_SIZE) as usize);
    assert_eq!(gallery.offsets().await.get("a"), Some(&(2 * PAGE_SIZE)));

    // Past the end: empty pages leave the offsets where they are
    gallery.load_more().await.unwrap();
    assert_eq!(gallery.offsets().await.get("a"), Some(&(2 * PAGE_SIZE)));
    assert_eq!(gallery.displayed().await.len(), 6 * PER_LETTER as usize);

    gallery.set_need_description(true).await;
    let described = gallery.displayed().await;
    assert!(described.iter().all(|c| c.has_description()));
    assert_eq!(described.len(), 6 * 3);

    gallery.toggle_group(LetterGroup::AF).await;
    assert!(gallery.active_letters().await.is_empty());
    assert!(gallery.load_more().await.is_none());
}

#[tokio::test]
async fn test_session_cache_serves_new_clients() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open(dir.path()).await.unwrap());
    let catalog = Arc::new(Catalog::new(&[]));

    let first = aggregator(catalog.clone(), store.clone()).await;
    first.set_groups(&[LetterGroup::SZ]).await.unwrap();
    let calls = catalog.calls.load(Ordering::SeqCst);
    assert_eq!(calls, 8);

    // Fresh memory layer, same session files: no further remote calls
    let client = CharacterClient::new(
        catalog.clone(),
        Arc::new(marvel_gallery::cache::ResponseCache::new(store)),
    );
    let page = client.search_characters("s", 0, PAGE_SIZE).await.unwrap();
    assert_eq!(page.count, PAGE_SIZE as u64);
    assert_eq!(catalog.calls.load(Ordering::SeqCst), calls);
}

#[tokio::test]
async fn test_requests_keep_session_settings_unless_given() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open(dir.path()).await.unwrap());
    let catalog = Arc::new(Catalog::new(&[]));

    let first = aggregator(catalog.clone(), store.clone()).await;
    first
        .apply(&GalleryRequest {
            groups: vec![LetterGroup::AF],
            need_description: Some(true),
            ..GalleryRequest::default()
        })
        .await;

    // A bare request on a later run keeps the saved toggle and groups
    let second = aggregator(catalog.clone(), store.clone()).await;
    let passes = second.apply(&GalleryRequest::default()).await;
    assert!(passes.is_empty());
    let state = second.snapshot().await;
    assert!(state.need_description);
    assert_eq!(state.groups, vec![LetterGroup::AF]);

    // Toggling the group off and clearing the flag are both persisted
    let third = aggregator(catalog.clone(), store.clone()).await;
    third
        .apply(&GalleryRequest {
            toggles: vec![LetterGroup::AF],
            need_description: Some(false),
            ..GalleryRequest::default()
        })
        .await;

    let fourth = aggregator(catalog, store).await;
    let state = fourth.snapshot().await;
    assert!(!state.need_description);
    assert!(state.groups.is_empty());
    assert_eq!(fourth.displayed().await.len(), 6 * PAGE_SIZE as usize);
}

#[tokio::test]
async fn test_request_load_more_stops_without_groups() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open(dir.path()).await.unwrap());
    let gallery = aggregator(Arc::new(Catalog::new(&[])), store).await;

    let passes = gallery
        .apply(&GalleryRequest {
            load_more: 3,
            ..GalleryRequest::default()
        })
        .await;
    // Cold start only; load more needs an active group
    assert_eq!(passes.len(), 1);
    assert_eq!(passes[0].partitions, 10);
}
