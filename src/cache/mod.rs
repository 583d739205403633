//! Response caching
//!
//! Two layers: an in-memory map for repeat lookups inside one process, and a
//! [`SessionStore`] that survives across runs when file-backed. Entries
//! never expire and are never invalidated.

pub mod response_cache;
pub mod session_store;

pub use response_cache::ResponseCache;
pub use session_store::{FileSessionStore, MemorySessionStore, SessionStore, open_session_store};
