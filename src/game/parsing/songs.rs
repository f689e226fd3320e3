use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::game::parsing::{LoadError, numeric_prefix};
use crate::game::song::{SongCatalog, SongEntry};

/// Builds the catalog from the song list file and the posters directory.
/// Songs and posters are each ordered by their numeric prefix and paired by
/// position.
pub fn load_catalog(songs_file: &Path, posters_dir: &Path) -> Result<SongCatalog, LoadError> {
    let text = fs::read_to_string(songs_file).map_err(|source| LoadError::Io {
        path: songs_file.to_path_buf(),
        source,
    })?;
    let titles = parse_song_list(&text)?;
    let mut posters = scan_posters(posters_dir).into_iter();

    let songs: Vec<SongEntry> = titles
        .into_iter()
        .enumerate()
        .map(|(i, title)| {
            let poster_path = posters.next();
            if poster_path.is_none() {
                warn!("No poster found for song {} ('{}').", i + 1, title);
            }
            SongEntry {
                id: i + 1,
                title,
                poster_path,
            }
        })
        .collect();

    let catalog = SongCatalog::new(songs);
    if catalog.is_empty() {
        warn!("Song list '{}' is empty.", songs_file.display());
    }
    info!("Loaded {} songs from '{}'.", catalog.len(), songs_file.display());
    Ok(catalog)
}

/// Parses `"<n> - <title>"` lines, ordered by `n`. Blank lines are skipped.
pub fn parse_song_list(text: &str) -> Result<Vec<String>, LoadError> {
    let mut entries = Vec::new();
    for (i, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let (number, title) = numeric_prefix(line)
            .zip(line.split_once(" - ").map(|(_, rest)| rest.trim()))
            .ok_or_else(|| LoadError::MalformedCatalogLine {
                line: i + 1,
                text: line.to_string(),
            })?;
        entries.push((number, title.to_string()));
    }
    entries.sort_by_key(|(number, _)| *number);
    Ok(entries.into_iter().map(|(_, title)| title).collect())
}

/// Lists `"<n> - ....png"` posters ordered by `n`. Posters are cosmetic, so
/// an unreadable directory or an unnumbered file only warns.
fn scan_posters(dir: &Path) -> Vec<PathBuf> {
    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            warn!("Could not read posters directory '{}': {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut posters = Vec::new();
    for item in read_dir.flatten() {
        let path = item.path();
        let is_png = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if !path.is_file() || !is_png {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        match numeric_prefix(name) {
            Some(number) => posters.push((number, path)),
            None => warn!("Skipping unnumbered poster '{}'.", path.display()),
        }
    }
    posters.sort_by_key(|(number, _)| *number);
    posters.into_iter().map(|(_, path)| path).collect()
}
