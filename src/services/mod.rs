//! Service layer
//!
//! Business logic sitting between the sources and the views.

pub mod character_client;

pub use character_client::CharacterClient;
