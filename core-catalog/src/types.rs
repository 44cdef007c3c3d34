use serde::{Deserialize, Serialize};
use std::fmt;

/// A single catalog entry.
///
/// `locator` is treated opaquely by everything downstream — it may be a
/// filesystem path relative to the media root (server side) or a streaming
/// endpoint (client side). A track with no locator, or one flagged
/// `unreleased`, is a visible placeholder that can never be played.
///
/// # Examples
///
/// ```
/// use core_catalog::Track;
///
/// let track = Track::new("First Light", "first-light", Some("tracks/mp3/first-light.mp3"));
/// assert!(track.playable());
///
/// let placeholder = Track::placeholder("Untitled");
/// assert!(!placeholder.playable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Display title.
    pub title: String,
    /// External-facing identifier used in URLs.
    pub slug: String,
    /// Internal asset locator; `None` for placeholder entries.
    #[serde(default)]
    pub locator: Option<String>,
    /// Explicitly marked not-yet-released; listed but never playable.
    #[serde(default)]
    pub unreleased: bool,
}

impl Track {
    /// Create a released track.
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        locator: Option<impl Into<String>>,
    ) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            locator: locator.map(Into::into),
            unreleased: false,
        }
    }

    /// Create a placeholder entry with no locator.
    pub fn placeholder(title: impl Into<String>) -> Self {
        let title = title.into();
        let slug = title
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        Self {
            title,
            slug,
            locator: None,
            unreleased: true,
        }
    }

    /// Mark this track unreleased.
    pub fn unreleased(mut self) -> Self {
        self.unreleased = true;
        self
    }

    /// A track is playable when it has a real locator and is not flagged
    /// unreleased.
    pub fn playable(&self) -> bool {
        self.locator.is_some() && !self.unreleased
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.slug)
    }
}
