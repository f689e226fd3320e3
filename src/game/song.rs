use std::path::PathBuf;
use std::sync::Arc;

use crate::game::parsing::LoadError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongEntry {
    /// 1-based position in the catalog; also selects `<id> - notes.csv`.
    pub id: usize,
    pub title: String,
    pub poster_path: Option<PathBuf>,
}

/// The ordered list of songs offered on the selection screen.
#[derive(Clone, Debug, Default)]
pub struct SongCatalog {
    songs: Vec<Arc<SongEntry>>,
}

impl SongCatalog {
    pub fn new(songs: Vec<SongEntry>) -> Self {
        Self {
            songs: songs.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Resolves a "song N selected" signal (1-based, as shown on screen).
    pub fn get(&self, number: usize) -> Result<Arc<SongEntry>, LoadError> {
        number
            .checked_sub(1)
            .and_then(|i| self.songs.get(i))
            .cloned()
            .ok_or(LoadError::NoSuchSong {
                index: number,
                count: self.songs.len(),
            })
    }
}
