/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// API defaults
pub const DEFAULT_BASE_URL: &str = "https://gateway.marvel.com/v1/public";
pub const DEFAULT_REQUEST_TIMEOUT: &str = "20s";
pub const DEFAULT_USE_MOCK: bool = false;

// Gallery defaults
pub const DEFAULT_PAGE_SIZE: u32 = 40;
pub const DEFAULT_SEED_LETTERS: [&str; 10] = ["a", "b", "c", "d", "m", "n", "s", "t", "w", "x"];

// List defaults
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;
pub const DEFAULT_DEBOUNCE: &str = "300ms";

// Environment
pub const ENV_PREFIX: &str = "MARVEL_GALLERY_";
pub const LEGACY_PUBLIC_KEY_VAR: &str = "REACT_APP_MARVEL_PUBLIC_KEY";
pub const LEGACY_PRIVATE_KEY_VAR: &str = "REACT_APP_MARVEL_PRIVATE_KEY";
pub const LEGACY_USE_MOCK_VAR: &str = "REACT_APP_USE_MOCK";
