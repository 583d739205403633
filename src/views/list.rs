//! Character list: search results sorted by name or id

use std::cmp::Ordering;
use std::fmt::Write as _;
use strum::{Display, EnumString};

use crate::models::Character;
use crate::models::character::DEFAULT_IMAGE_VARIANT;
use crate::services::CharacterClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortKey {
    #[default]
    Name,
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

fn compare(a: &Character, b: &Character, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Id => a.id.cmp(&b.id),
    }
}

/// Stable sort; equal keys keep their incoming order in both directions
pub fn sort_characters(characters: &mut [Character], key: SortKey, order: SortOrder) {
    characters.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

pub fn sorted(mut characters: Vec<Character>, key: SortKey, order: SortOrder) -> Vec<Character> {
    sort_characters(&mut characters, key, order);
    characters
}

/// One line per character, `Name (id: 123)`, prefixed with its position and
/// followed by the portrait URL when there is one
pub fn render_list(characters: &[Character]) -> String {
    let mut out = String::new();
    for (index, character) in characters.iter().enumerate() {
        let _ = write!(out, "{:>3}. {} (id: {})", index, character.name, character.id);
        if let Some(url) =
            CharacterClient::image_url(character.thumbnail.as_ref(), DEFAULT_IMAGE_VARIANT)
        {
            let _ = write!(out, " {url}");
        }
        out.push('\n');
    }
    out
}
