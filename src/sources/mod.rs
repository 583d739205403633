//! Character sources
//!
//! A [`CharacterSource`] answers prefix searches and id lookups. Two
//! implementations exist:
//!
//! - [`MarvelApiSource`]: signed requests against the public REST API
//! - [`FixtureSource`]: a small built-in character list, used when keys are
//!   missing or mocking is switched on
//!
//! [`SourceFactory`] picks one from the API configuration.

pub mod factory;
pub mod fixtures;
pub mod marvel;
pub mod signer;
pub mod traits;

pub use factory::SourceFactory;
pub use fixtures::FixtureSource;
pub use marvel::MarvelApiSource;
pub use signer::AuthParams;
pub use traits::*;
