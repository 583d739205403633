//! Domain models for the character catalog
//!
//! [`Character`] and [`SearchResult`] are the shapes handed to callers and
//! written to the session store. Remote payloads are untyped JSON and go
//! through the lenient normalizers in [`character`] and [`search_result`]
//! rather than a strict `Deserialize`.

pub mod character;
pub mod search_result;

pub use character::{Character, CharacterUrl, Thumbnail, to_character};
pub use search_result::{SearchQuery, SearchResult};
