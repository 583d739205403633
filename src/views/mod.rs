//! Presentation contracts for the list, detail and routing surfaces

pub mod debounce;
pub mod detail;
pub mod list;
pub mod route;

pub use debounce::Debouncer;
pub use detail::{DetailNavigator, NO_DESCRIPTION, description_text, render_detail};
pub use list::{SortKey, SortOrder, render_list, sort_characters, sorted};
pub use route::Route;
