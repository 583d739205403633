//! Gallery
//!
//! A thumbnail grid of characters loaded letter by letter. State lives in a
//! [`GalleryState`] that is persisted after every change, and loading is
//! driven by the [`GalleryAggregator`].

pub mod aggregator;
pub mod filter;
pub mod groups;
pub mod request;
pub mod state;

pub use aggregator::{GalleryAggregator, PassSummary};
pub use groups::LetterGroup;
pub use request::GalleryRequest;
pub use state::{GALLERY_STATE_KEY, GalleryState, GalleryStateStore, SessionGalleryStore};
