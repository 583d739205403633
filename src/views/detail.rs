//! Character detail with prev/next navigation
//!
//! The caller hands over the order it displayed (`ids`) and the position of
//! the current character. Navigation never recomputes that order; it wraps
//! around at either end.

use std::fmt::Write as _;

use crate::models::Character;
use crate::models::character::DEFAULT_IMAGE_VARIANT;
use crate::services::CharacterClient;

pub const NO_DESCRIPTION: &str = "No description.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailNavigator {
    ids: Vec<i64>,
    index: Option<usize>,
}

impl DetailNavigator {
    pub fn new(ids: Vec<i64>, index: usize) -> Self {
        Self {
            ids,
            index: Some(index),
        }
    }

    /// Navigator for a detail page opened without an order
    pub fn unordered() -> Self {
        Self::default()
    }

    /// Navigator positioned on `id` within `ids`, unordered when absent
    pub fn at_id(ids: Vec<i64>, id: i64) -> Self {
        match ids.iter().position(|x| *x == id) {
            Some(index) => Self::new(ids, index),
            None => Self::unordered(),
        }
    }

    /// True with a non-empty order and a position; the position may lie past
    /// the end, stepping wraps it back into range
    pub fn has_order(&self) -> bool {
        !self.ids.is_empty() && self.index.is_some()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn current_id(&self) -> Option<i64> {
        self.index.and_then(|i| self.ids.get(i).copied())
    }

    /// Move `delta` positions, wrapping modulo the list length
    ///
    /// `None` when there is no order to move through.
    pub fn step(&self, delta: i64) -> Option<Self> {
        if !self.has_order() {
            return None;
        }
        let len = self.ids.len() as i64;
        let index = self.index? as i64;
        let next = (index + delta).rem_euclid(len) as usize;
        Some(Self {
            ids: self.ids.clone(),
            index: Some(next),
        })
    }

    pub fn next(&self) -> Option<Self> {
        self.step(1)
    }

    pub fn prev(&self) -> Option<Self> {
        self.step(-1)
    }
}

pub fn description_text(character: &Character) -> &str {
    if character.description.is_empty() {
        NO_DESCRIPTION
    } else {
        &character.description
    }
}

pub fn render_detail(character: &Character, navigator: &DetailNavigator) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (id: {})", character.name, character.id);
    let _ = writeln!(out, "{}", description_text(character));
    if let Some(url) =
        CharacterClient::image_url(character.thumbnail.as_ref(), DEFAULT_IMAGE_VARIANT)
    {
        let _ = writeln!(out, "Portrait: {url}");
    }
    if let Some(url) = character.detail_url() {
        let _ = writeln!(out, "View on Marvel.com: {url}");
    }
    if let (Some(index), Some(_)) = (navigator.index(), navigator.current_id()) {
        let _ = writeln!(out, "[{} of {}]", index + 1, navigator.ids().len());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CharacterUrl, Thumbnail};

    #[test]
    fn test_wraps_both_ways() {
        let nav = DetailNavigator::new(vec![10, 20, 30], 0);
        assert_eq!(nav.prev().unwrap().current_id(), Some(30));
        assert_eq!(nav.next().unwrap().current_id(), Some(20));

        let last = DetailNavigator::new(vec![10, 20, 30], 2);
        assert_eq!(last.next().unwrap().current_id(), Some(10));
        assert_eq!(last.step(-7).unwrap().index(), Some(0));
    }

    #[test]
    fn test_position_past_end_wraps_on_step() {
        let nav = DetailNavigator::new(vec![1, 2], 2);
        assert!(nav.has_order());
        assert_eq!(nav.current_id(), None);
        assert_eq!(nav.next().unwrap().current_id(), Some(2));
        assert_eq!(nav.prev().unwrap().current_id(), Some(2));
        assert_eq!(nav.step(-2).unwrap().current_id(), Some(1));

        let rendered = render_detail(
            &Character {
                id: 1,
                name: "Hulk".to_string(),
                description: String::new(),
                thumbnail: None,
                urls: None,
            },
            &nav,
        );
        assert!(!rendered.contains(" of "));
    }

    #[test]
    fn test_without_order_navigation_is_noop() {
        assert!(DetailNavigator::unordered().next().is_none());
        assert!(DetailNavigator::new(Vec::new(), 0).prev().is_none());
        assert!(DetailNavigator::at_id(vec![1, 2], 3).next().is_none());
        assert_eq!(DetailNavigator::at_id(vec![1, 2], 2).index(), Some(1));
    }

    #[test]
    fn test_render_detail() {
        let mut character = Character {
            id: 1009610,
            name: "Spider-Man".to_string(),
            description: String::new(),
            thumbnail: None,
            urls: Some(vec![
                CharacterUrl {
                    url_type: "wiki".to_string(),
                    url: "http://marvel.com/wiki".to_string(),
                },
                CharacterUrl {
                    url_type: "detail".to_string(),
                    url: "http://marvel.com/detail".to_string(),
                },
            ]),
        };

        let rendered = render_detail(&character, &DetailNavigator::new(vec![1, 1009610], 1));
        assert!(rendered.contains(NO_DESCRIPTION));
        assert!(rendered.contains("View on Marvel.com: http://marvel.com/detail"));
        assert!(rendered.contains("[2 of 2]"));
        assert!(!rendered.contains("Portrait:"));

        character.description = "Friendly neighborhood wall-crawler.".to_string();
        character.thumbnail = Some(Thumbnail::new("http://i.annihil.us/mg/3/20/5232", "jpg"));
        let rendered = render_detail(&character, &DetailNavigator::unordered());
        assert!(rendered.contains("Portrait: http://i.annihil.us/mg/3/20/5232/portrait_xlarge.jpg"));
        assert!(!rendered.contains(NO_DESCRIPTION));
        assert!(!rendered.contains(" of "));
    }
}
