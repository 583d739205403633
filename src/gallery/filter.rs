//! Display filter for the gallery grid
//!
//! Pure functions of [`GalleryState`]; nothing here is persisted.

use super::state::GalleryState;
use crate::models::Character;
use crate::models::character::DEFAULT_IMAGE_VARIANT;

/// Whether `character` belongs in the grid for the given state
pub fn is_displayed(character: &Character, state: &GalleryState, letters: &[&str]) -> bool {
    let Some(thumbnail) = character.thumbnail.as_ref() else {
        return false;
    };
    if thumbnail.url(DEFAULT_IMAGE_VARIANT).is_none() || thumbnail.is_placeholder() {
        return false;
    }
    if !state.groups.is_empty() {
        let mut buf = [0u8; 4];
        let initial: &str = character.initial().encode_utf8(&mut buf);
        if !letters.contains(&initial) {
            return false;
        }
    }
    if state.need_description && !character.has_description() {
        return false;
    }
    true
}

/// Visible characters in id order
pub fn displayed(state: &GalleryState) -> Vec<&Character> {
    let letters = state.active_letters();
    state
        .items
        .values()
        .filter(|c| is_displayed(c, state, &letters))
        .collect()
}

/// Navigation order for the detail view, taken from the visible sequence
pub fn displayed_ids(state: &GalleryState) -> Vec<i64> {
    displayed(state).into_iter().map(|c| c.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::groups::LetterGroup;
    use crate::models::Thumbnail;

    fn character(id: i64, name: &str, description: &str, path: &str) -> Character {
        Character {
            id,
            name: name.to_string(),
            description: description.to_string(),
            thumbnail: (!path.is_empty()).then(|| Thumbnail::new(path, "jpg")),
            urls: None,
        }
    }

    fn state() -> GalleryState {
        let mut state = GalleryState::default();
        state.merge(vec![
            character(1, "Angel", "Winged mutant", "http://img/angel"),
            character(2, "Beast", "", "http://img/beast"),
            character(3, "Thor", "God of thunder", "http://img/thor"),
            character(4, "Nobody", "No picture", ""),
            character(5, "Ant-Man", "Small", "http://i.annihil.us/mg/b/40/image_not_available"),
            character(6, "", "Nameless", "http://img/nameless"),
        ]);
        state
    }

    #[test]
    fn test_requires_real_thumbnail() {
        assert_eq!(displayed_ids(&state()), vec![1, 2, 3, 6]);
    }

    #[test]
    fn test_letter_groups_filter_by_initial() {
        let mut state = state();
        state.toggle_group(LetterGroup::AF);
        assert_eq!(displayed_ids(&state), vec![1, 2]);

        // An empty name sorts under z
        state.toggle_group(LetterGroup::SZ);
        assert_eq!(displayed_ids(&state), vec![1, 2, 3, 6]);

        state.toggle_group(LetterGroup::AF);
        state.toggle_group(LetterGroup::SZ);
        assert!(state.groups.is_empty());
        assert_eq!(displayed_ids(&state), vec![1, 2, 3, 6]);
    }

    #[test]
    fn test_description_toggle() {
        let mut state = state();
        state.need_description = true;
        assert_eq!(displayed_ids(&state), vec![1, 3, 6]);
    }

    #[test]
    fn test_ids_follow_filtered_sequence() {
        let mut state = state();
        state.toggle_group(LetterGroup::SZ);
        state.need_description = true;
        let shown: Vec<&str> = displayed(&state).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(shown, ["Thor", ""]);
        assert_eq!(displayed_ids(&state), vec![3, 6]);
    }
}
