//! Clip records and the resolvable clip library.

use reelcut_core::RationalTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// An uploaded clip with probed metadata. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: Uuid,
    /// Human-readable name (displayed in UI)
    pub name: String,
    /// Natural duration of the source media
    pub duration: RationalTime,
    /// Byte-addressable media source supplied by the uploader
    pub source: PathBuf,
}

impl Clip {
    /// Create a new clip record with a fresh id.
    pub fn new(name: impl Into<String>, duration: RationalTime, source: impl Into<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            duration,
            source: source.into(),
        }
    }

    /// The media source path.
    pub fn source_path(&self) -> &Path {
        &self.source
    }
}

/// The `clip id -> Clip` map the planner's timeline resolves against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClipLibrary {
    clips: HashMap<Uuid, Clip>,
}

impl ClipLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clip, returning its id.
    pub fn insert(&mut self, clip: Clip) -> Uuid {
        let id = clip.id;
        self.clips.insert(id, clip);
        id
    }

    /// Resolve a clip id.
    pub fn get(&self, id: Uuid) -> Option<&Clip> {
        self.clips.get(&id)
    }

    /// Number of clips in the library.
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Whether the library is empty.
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl FromIterator<Clip> for ClipLibrary {
    fn from_iter<I: IntoIterator<Item = Clip>>(iter: I) -> Self {
        let mut library = Self::new();
        for clip in iter {
            library.insert(clip);
        }
        library
    }
}
