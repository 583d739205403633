//! One gallery interaction: filter changes followed by load-more passes

use tracing::debug;

use super::aggregator::{GalleryAggregator, PassSummary};
use super::groups::LetterGroup;

/// Changes to apply on top of the restored gallery
///
/// Fields left empty keep what was restored, so a bare request only
/// cold-starts an empty gallery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryRequest {
    /// Replaces the active groups when non-empty
    pub groups: Vec<LetterGroup>,
    /// Groups switched on or off, in order, after `groups`
    pub toggles: Vec<LetterGroup>,
    pub need_description: Option<bool>,
    pub load_more: u32,
}

impl GalleryRequest {
    fn changes_groups(&self) -> bool {
        !self.groups.is_empty() || !self.toggles.is_empty()
    }
}

impl GalleryAggregator {
    /// Apply `request`, returning the summary of every pass that ran
    pub async fn apply(&self, request: &GalleryRequest) -> Vec<PassSummary> {
        let mut passes = Vec::new();

        if let Some(need_description) = request.need_description {
            self.set_need_description(need_description).await;
        }

        if !request.groups.is_empty() {
            passes.extend(self.set_groups(&request.groups).await);
        }
        for group in &request.toggles {
            passes.extend(self.toggle_group(*group).await);
        }
        if !request.changes_groups() {
            passes.extend(self.cold_start().await);
        }

        for _ in 0..request.load_more {
            match self.load_more().await {
                Some(summary) => passes.push(summary),
                None => {
                    debug!("Load more skipped: no active group or a pass in flight");
                    break;
                }
            }
        }
        passes
    }
}
