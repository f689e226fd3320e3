use std::path::PathBuf;

use thiserror::Error;

pub mod notes;
pub mod songs;

/// Anything that stops a chart or the song list from loading. A load either
/// produces complete data or one of these; nothing is defaulted.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed chart data: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: time {value:?} is not a finite, non-negative number of seconds")]
    InvalidTime { row: usize, value: String },

    #[error("row {row}: unknown lane {value:?} (expected 1..={count})")]
    UnknownLane { row: usize, value: String, count: u8 },

    #[error("row {row}: unknown note type {value:?} (expected tap or hold)")]
    UnknownKind { row: usize, value: String },

    #[error("row {row}: hold note has no duration")]
    MissingDuration { row: usize },

    #[error("row {row}: hold duration {value:?} is not a positive number of seconds")]
    InvalidDuration { row: usize, value: String },

    #[error("song list line {line}: {text:?} is not of the form \"<number> - <name>\"")]
    MalformedCatalogLine { line: usize, text: String },

    #[error("song {index} does not exist (catalog has {count} songs)")]
    NoSuchSong { index: usize, count: usize },
}

/// Leading number of a `"<n> - <rest>"` name, used to order songs and posters.
pub(crate) fn numeric_prefix(name: &str) -> Option<u32> {
    let (prefix, _) = name.split_once(" - ")?;
    prefix.trim().parse::<u32>().ok()
}
