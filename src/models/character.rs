use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Path marker the remote uses for its placeholder artwork
pub const IMAGE_NOT_AVAILABLE_MARKER: &str = "image_not_available";

/// Default image variant, a 150x225 portrait
pub const DEFAULT_IMAGE_VARIANT: &str = "portrait_xlarge";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<CharacterUrl>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub path: String,
    pub extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterUrl {
    #[serde(rename = "type")]
    pub url_type: String,
    pub url: String,
}

impl Thumbnail {
    pub fn new<P: Into<String>, E: Into<String>>(path: P, extension: E) -> Self {
        Self {
            path: path.into(),
            extension: extension.into(),
        }
    }

    /// `path/variant.extension`, or `None` when either component is empty
    pub fn url(&self, variant: &str) -> Option<String> {
        if self.path.is_empty() || self.extension.is_empty() {
            return None;
        }
        Some(format!("{}/{}.{}", self.path, variant, self.extension))
    }

    pub fn is_placeholder(&self) -> bool {
        self.path.contains(IMAGE_NOT_AVAILABLE_MARKER)
    }
}

/// Compose an image URL for an optional thumbnail
///
/// # Examples
///
/// ```rust
/// use marvel_gallery::models::{Thumbnail, character::image_url};
///
/// let thumb = Thumbnail::new("http://i.annihil.us/u/prod/marvel/i/mg/9/c0/527bb7b37ff55", "jpg");
/// assert_eq!(
///     image_url(Some(&thumb), "portrait_xlarge").as_deref(),
///     Some("http://i.annihil.us/u/prod/marvel/i/mg/9/c0/527bb7b37ff55/portrait_xlarge.jpg")
/// );
/// assert_eq!(image_url(None, "portrait_xlarge"), None);
/// ```
pub fn image_url(thumbnail: Option<&Thumbnail>, variant: &str) -> Option<String> {
    thumbnail.and_then(|t| t.url(variant))
}

impl Character {
    /// Url of the `detail` kind, the character's page on the publisher's site
    pub fn detail_url(&self) -> Option<&str> {
        self.urls
            .as_deref()?
            .iter()
            .find(|u| u.url_type == "detail")
            .map(|u| u.url.as_str())
    }

    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// Lowercased first character of the name, `z` when the name is empty
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_lowercase().next().unwrap_or(c))
            .unwrap_or('z')
    }
}

/// Normalize one untyped record from the remote into a [`Character`]
///
/// Never fails. Unusable ids become `0`, scalar names and descriptions are
/// stringified, and thumbnails or url lists that are not structurally valid
/// are dropped.
pub fn to_character(value: &Value) -> Character {
    Character {
        id: coerce_id(value.get("id")),
        name: coerce_string(value.get("name")),
        description: coerce_string(value.get("description")).trim().to_string(),
        thumbnail: value.get("thumbnail").and_then(coerce_thumbnail),
        urls: value.get("urls").and_then(coerce_urls),
    }
}

fn coerce_id(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn coerce_thumbnail(value: &Value) -> Option<Thumbnail> {
    let path = value.get("path")?.as_str()?;
    let extension = value.get("extension")?.as_str()?;
    Some(Thumbnail::new(path, extension))
}

fn coerce_urls(value: &Value) -> Option<Vec<CharacterUrl>> {
    let entries = value.as_array()?;
    Some(
        entries
            .iter()
            .filter_map(|entry| {
                Some(CharacterUrl {
                    url_type: entry.get("type")?.as_str()?.to_string(),
                    url: entry.get("url")?.as_str()?.to_string(),
                })
            })
            .collect(),
    )
}
