//! Path routing: `/`, `/gallery`, `/detail/:id`, everything else back to `/`

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    List,
    Gallery,
    Detail(i64),
}

impl Route {
    /// Resolve a path; unknown paths and non-numeric ids redirect to the list
    ///
    /// Segment names match case-insensitively.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [name] if name.eq_ignore_ascii_case("gallery") => Route::Gallery,
            [name, id] if name.eq_ignore_ascii_case("detail") => {
                id.parse().map(Route::Detail).unwrap_or(Route::List)
            }
            _ => Route::List,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::List => write!(f, "/"),
            Route::Gallery => write!(f, "/gallery"),
            Route::Detail(id) => write!(f, "/detail/{id}"),
        }
    }
}
