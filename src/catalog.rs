use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while building or reading the story catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Story index {index} out of range (catalog has {len} stories)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Story catalog must contain at least one story")]
    Empty,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid story manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// What kind of surface a slide is rendered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryKind {
    Image,
    Video,
    #[serde(alias = "lottie")]
    Animation,
    /// Kinds the renderer does not know. The slide shows nothing but is still timed.
    #[serde(other)]
    Unknown,
}

/// Opaque handle to an external asset (path, URL, bundle key)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaRef(String);

impl MediaRef {
    pub fn new(value: impl Into<String>) -> Self {
        MediaRef(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MediaRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single slide of the reel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryItem {
    /// Ordinal position in the catalog
    pub id: usize,
    pub kind: StoryKind,
    pub media: MediaRef,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    kind: StoryKind,
    media: MediaRef,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    stories: Vec<ManifestEntry>,
}

/// Immutable, ordered sequence of stories.
///
/// Cloning is cheap; all clones share the same items.
#[derive(Debug, Clone)]
pub struct StoryCatalog {
    items: Arc<[StoryItem]>,
}

impl StoryCatalog {
    /// Build a catalog from `(kind, media)` pairs, assigning ids by position
    pub fn from_entries<I, M>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (StoryKind, M)>,
        M: Into<String>,
    {
        let items: Vec<StoryItem> = entries
            .into_iter()
            .enumerate()
            .map(|(id, (kind, media))| StoryItem {
                id,
                kind,
                media: MediaRef::new(media),
            })
            .collect();

        if items.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(StoryCatalog {
            items: items.into(),
        })
    }

    /// Parse a JSON manifest of the form `{ "stories": [{ "kind": ..., "media": ... }] }`
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let manifest: Manifest = serde_json::from_str(json)?;
        Self::from_entries(
            manifest
                .stories
                .into_iter()
                .map(|entry| (entry.kind, entry.media.0)),
        )
    }

    /// Load a manifest from disk
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        info!(
            "Loaded {} stories from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// The default reel shipped with the viewer
    pub fn builtin() -> Self {
        let items: Vec<StoryItem> = [
            (StoryKind::Image, "assets/asia.png"),
            (StoryKind::Image, "assets/coding.png"),
            (StoryKind::Image, "assets/deer.png"),
            (StoryKind::Image, "assets/mountain.png"),
            (StoryKind::Video, "assets/stock.mp4"),
            (StoryKind::Video, "assets/sea.mp4"),
            (StoryKind::Video, "assets/fast.mp4"),
            (StoryKind::Animation, "assets/loading.json"),
        ]
        .into_iter()
        .enumerate()
        .map(|(id, (kind, media))| StoryItem {
            id,
            kind,
            media: MediaRef::new(media),
        })
        .collect();

        StoryCatalog {
            items: items.into(),
        }
    }

    pub fn get(&self, index: usize) -> Result<&StoryItem, CatalogError> {
        self.items.get(index).ok_or(CatalogError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a constructed catalog
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.items.len() - 1
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoryItem> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_reel_has_eight_ordered_stories() {
        let catalog = StoryCatalog::builtin();
        assert_eq!(catalog.len(), 8);
        for (position, item) in catalog.iter().enumerate() {
            assert_eq!(item.id, position);
        }
        assert_eq!(catalog.get(4).unwrap().kind, StoryKind::Video);
        assert_eq!(catalog.get(7).unwrap().kind, StoryKind::Animation);
    }

    #[test]
    fn get_rejects_out_of_range_index() {
        let catalog = StoryCatalog::from_entries([(StoryKind::Image, "a.png")]).unwrap();
        assert!(catalog.get(0).is_ok());
        match catalog.get(1) {
            Err(CatalogError::IndexOutOfRange { index, len }) => {
                assert_eq!(index, 1);
                assert_eq!(len, 1);
            }
            other => panic!("expected IndexOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let entries: Vec<(StoryKind, String)> = Vec::new();
        assert!(matches!(
            StoryCatalog::from_entries(entries),
            Err(CatalogError::Empty)
        ));
        assert!(matches!(
            StoryCatalog::from_json(r#"{"stories": []}"#),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn manifest_accepts_lottie_alias_and_unknown_kinds() {
        let catalog = StoryCatalog::from_json(
            r#"{"stories": [
                {"kind": "image", "media": "one.png"},
                {"kind": "lottie", "media": "spin.json"},
                {"kind": "hologram", "media": "future.bin"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(1).unwrap().kind, StoryKind::Animation);
        assert_eq!(catalog.get(2).unwrap().kind, StoryKind::Unknown);
        assert_eq!(catalog.get(2).unwrap().media.as_str(), "future.bin");
    }

    #[test]
    fn malformed_manifest_reports_parse_error() {
        assert!(matches!(
            StoryCatalog::from_json("{ not json"),
            Err(CatalogError::Manifest(_))
        ));
    }

    #[test]
    fn clones_share_items() {
        let catalog = StoryCatalog::builtin();
        let clone = catalog.clone();
        assert!(Arc::ptr_eq(&catalog.items, &clone.items));
    }
}
