//! The slug lookup table and playability walks shared by server and player.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::types::Track;

/// Ordered, immutable track list with slug lookup.
///
/// Built once at startup. `resolve` is the sole mapping from external names
/// to tracks; any slug outside the configured set misses, including
/// path-like input such as `../../etc/passwd`.
#[derive(Debug, Clone)]
pub struct TrackCatalog {
    tracks: Vec<Track>,
    by_slug: HashMap<String, usize>,
}

impl TrackCatalog {
    /// Build a catalog from an ordered track list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateSlug`] when two entries share a slug.
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        let mut by_slug = HashMap::with_capacity(tracks.len());
        for (index, track) in tracks.iter().enumerate() {
            if by_slug.insert(track.slug.clone(), index).is_some() {
                return Err(CatalogError::DuplicateSlug(track.slug.clone()));
            }
        }
        debug!(tracks = tracks.len(), "catalog built");
        Ok(Self { tracks, by_slug })
    }

    /// Parse a catalog from its JSON config representation: an ordered array
    /// of track objects.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let tracks: Vec<Track> = serde_json::from_slice(bytes)?;
        Self::new(tracks)
    }

    /// Resolve an external slug to its track. Unknown slug → `None`.
    pub fn resolve(&self, slug: &str) -> Option<&Track> {
        self.by_slug.get(slug).map(|&index| &self.tracks[index])
    }

    /// Track at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Iterate tracks in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Whether the track at `index` exists and is playable.
    pub fn is_playable(&self, index: usize) -> bool {
        self.get(index).is_some_and(Track::playable)
    }

    /// Walk outward from `from` in `step` direction (±1) to the nearest
    /// playable index. Does not wrap; returns `None` when the walk leaves the
    /// sequence without a hit.
    pub fn next_playable_from(&self, from: isize, step: isize) -> Option<usize> {
        debug_assert!(step == 1 || step == -1);
        let mut i = from;
        loop {
            i += step;
            if i < 0 || i as usize >= self.tracks.len() {
                return None;
            }
            if self.tracks[i as usize].playable() {
                return Some(i as usize);
            }
        }
    }

    /// First playable track, scanning forward from before the start.
    pub fn first_playable(&self) -> Option<usize> {
        self.next_playable_from(-1, 1)
    }

    /// A small built-in catalog for demos and tests.
    pub fn demo() -> Self {
        Self::new(vec![
            Track::new("First Light", "first-light", Some("tracks/mp3/first-light.mp3")),
            Track::new("Undertow", "undertow", Some("tracks/mp3/undertow.mp3")),
            Track::new("Glass Harbor", "glass-harbor", Some("tracks/mp3/glass-harbor.mp3")),
            Track::new("Meridian", "meridian", Some("tracks/mp3/meridian.mp3")).unreleased(),
            Track::new("Afterglow", "afterglow", Some("tracks/mp3/afterglow.mp3")),
        ])
        .expect("demo slugs are unique")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TrackCatalog {
        TrackCatalog::demo()
    }

    #[test]
    fn resolve_known_slug() {
        let catalog = catalog();
        let track = catalog.resolve("undertow").expect("known slug");
        assert_eq!(track.title, "Undertow");
        assert!(track.playable());
    }

    #[test]
    fn resolve_unknown_and_path_like_slugs() {
        let catalog = catalog();
        assert!(catalog.resolve("nope").is_none());
        assert!(catalog.resolve("../../etc/passwd").is_none());
        assert!(catalog.resolve("tracks/mp3/undertow.mp3").is_none());
        assert!(catalog.resolve("undertow/..").is_none());
        assert!(catalog.resolve("").is_none());
    }

    #[test]
    fn duplicate_slug_rejected() {
        let result = TrackCatalog::new(vec![
            Track::new("A", "same", Some("a.mp3")),
            Track::new("B", "same", Some("b.mp3")),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateSlug(s)) if s == "same"));
    }

    #[test]
    fn first_playable_skips_leading_placeholders() {
        let catalog = TrackCatalog::new(vec![
            Track::placeholder("One"),
            Track::new("Two", "two", Some("two.mp3")).unreleased(),
            Track::new("Three", "three", Some("three.mp3")),
        ])
        .unwrap();
        assert_eq!(catalog.first_playable(), Some(2));
    }

    #[test]
    fn no_playable_track_yields_none() {
        let catalog = TrackCatalog::new(vec![
            Track::placeholder("One"),
            Track::placeholder("Two"),
        ])
        .unwrap();
        assert_eq!(catalog.first_playable(), None);
        assert_eq!(catalog.next_playable_from(0, 1), None);
        assert_eq!(catalog.next_playable_from(1, -1), None);
    }

    #[test]
    fn walks_do_not_wrap() {
        let catalog = catalog();
        // Forward walk off the end of the list.
        assert_eq!(catalog.next_playable_from(4, 1), None);
        // Backward walk off the front.
        assert_eq!(catalog.next_playable_from(0, -1), None);
        // Unreleased index 3 is skipped in both directions.
        assert_eq!(catalog.next_playable_from(2, 1), Some(4));
        assert_eq!(catalog.next_playable_from(4, -1), Some(2));
    }

    #[test]
    fn json_config_roundtrip() {
        let json = r#"[
            {"title": "A", "slug": "a", "locator": "tracks/a.mp3"},
            {"title": "B", "slug": "b", "unreleased": true},
            {"title": "C", "slug": "c", "locator": "tracks/c.mp3", "unreleased": true}
        ]"#;
        let catalog = TrackCatalog::from_json_slice(json.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.is_playable(0));
        assert!(!catalog.is_playable(1));
        assert!(!catalog.is_playable(2));
        assert_eq!(catalog.first_playable(), Some(0));
    }
}
