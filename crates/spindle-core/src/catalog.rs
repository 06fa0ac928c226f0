//! The record: an immutable list of tracks split into two sides.
//!
//! The built-in catalog is the 12-track "Neon Drift" LP.  A user catalog can
//! replace it through `[catalog] path = "..."` in the config; it is validated
//! once at startup and never mutated afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of tracks on each face of the record.
pub const SIDE_LEN: usize = 6;

const VIDEO_POOL: [&str; 6] = [
    "https://storage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
    "https://storage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4",
    "https://storage.googleapis.com/gtv-videos-bucket/sample/ForBiggerBlazes.mp4",
    "https://storage.googleapis.com/gtv-videos-bucket/sample/ForBiggerEscapes.mp4",
    "https://storage.googleapis.com/gtv-videos-bucket/sample/ForBiggerFun.mp4",
    "https://storage.googleapis.com/gtv-videos-bucket/sample/ForBiggerJoyrides.mp4",
];

const BUILTIN: [(&str, &str); 12] = [
    // SIDE A
    ("Midnight Velocity", "3:42"),
    ("Chrome Heart", "4:01"),
    ("Analog Dreams", "3:15"),
    ("Static Noise", "2:58"),
    ("Ghost in the Shell", "4:20"),
    ("Retrograde", "3:33"),
    // SIDE B
    ("Solar Flare", "3:10"),
    ("Lunar Tides", "4:12"),
    ("Deep Space", "3:45"),
    ("Event Horizon", "5:01"),
    ("Nebula", "2:45"),
    ("Stardust", "3:55"),
];

const BUILTIN_ARTIST: &str = "Neon Drift";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no tracks")]
    Empty,
    #[error("catalog has {len} tracks, a record holds exactly {}", 2 * SIDE_LEN)]
    WrongLength { len: usize },
    #[error("track {id}: invalid duration {value:?} (expected m:ss)")]
    InvalidDuration { id: u32, value: String },
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::A => "SIDE A",
            Side::B => "SIDE B",
        }
    }

    /// Single-letter form for narrow columns.
    pub fn letter(self) -> char {
        match self {
            Side::A => 'A',
            Side::B => 'B',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: u32,
    pub title: String,
    pub artist: String,
    /// Cover image reference (URL or path); opaque to the player.
    #[serde(default)]
    pub cover: String,
    /// Background video reference; the backdrop cross-fades whenever it changes.
    #[serde(default)]
    pub video: String,
    /// Display duration, `m:ss`.
    pub duration: String,
}

/// Parse `m:ss` (or `h:mm:ss`) into seconds.
pub fn parse_duration(s: &str) -> Option<u32> {
    let mut total: u32 = 0;
    let parts: Vec<&str> = s.trim().split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let v: u32 = part.parse().ok()?;
        // every field after the first is a base-60 digit
        if i > 0 && (v >= 60 || part.len() != 2) {
            return None;
        }
        total = total.checked_mul(60)?.checked_add(v)?;
    }
    Some(total)
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Validate and wrap a track list.
    pub fn new(tracks: Vec<Track>) -> Result<Self, CatalogError> {
        if tracks.is_empty() {
            return Err(CatalogError::Empty);
        }
        // both sides must be full for the side split and tonearm travel
        if tracks.len() != 2 * SIDE_LEN {
            return Err(CatalogError::WrongLength { len: tracks.len() });
        }
        for t in &tracks {
            if parse_duration(&t.duration).is_none() {
                return Err(CatalogError::InvalidDuration {
                    id: t.id,
                    value: t.duration.clone(),
                });
            }
        }
        Ok(Self { tracks })
    }

    /// The built-in 12-track record.
    pub fn builtin() -> Self {
        let tracks = BUILTIN
            .iter()
            .enumerate()
            .map(|(i, (title, duration))| Track {
                id: i as u32 + 1,
                title: (*title).to_string(),
                artist: BUILTIN_ARTIST.to_string(),
                cover: format!("https://picsum.photos/id/{}/400/400", 10 + i),
                video: VIDEO_POOL[i % VIDEO_POOL.len()].to_string(),
                duration: (*duration).to_string(),
            })
            .collect();
        Self { tracks }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.tracks)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `path` if given, falling back to the built-in record on any error.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };
        match Self::load(path) {
            Ok(catalog) => {
                tracing::info!(
                    "catalog: loaded {} tracks from {}",
                    catalog.len(),
                    path.display()
                );
                catalog
            }
            Err(e) => {
                tracing::warn!("catalog: {}, using built-in record", e);
                Self::builtin()
            }
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Track at `index`, clamped into the catalog.
    pub fn track(&self, index: usize) -> &Track {
        &self.tracks[index.min(self.tracks.len() - 1)]
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Tracks on one side, paired with their catalog index.
    pub fn side(&self, side: Side) -> impl Iterator<Item = (usize, &Track)> {
        self.tracks
            .iter()
            .enumerate()
            .filter(move |(i, _)| crate::mapper::side_of(*i) == side)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_record() {
        let c = Catalog::builtin();
        assert_eq!(c.len(), 12);
        assert_eq!(c.side(Side::A).count(), SIDE_LEN);
        assert_eq!(c.side(Side::B).count(), SIDE_LEN);
        assert_eq!(c.track(0).title, "Midnight Velocity");
        assert_eq!(c.track(6).title, "Solar Flare");
        assert_eq!(c.track(6).video, c.track(0).video);
        assert_eq!(c.track(11).id, 12);
        // out-of-range lookups clamp to the last track
        assert_eq!(c.track(99).title, "Stardust");
        assert!(c.tracks().iter().all(|t| parse_duration(&t.duration).is_some()));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("3:42"), Some(222));
        assert_eq!(parse_duration("5:01"), Some(301));
        assert_eq!(parse_duration("1:02:03"), Some(3723));
        assert_eq!(parse_duration("3:7"), None);
        assert_eq!(parse_duration("3:75"), None);
        assert_eq!(parse_duration("342"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("a:bc"), None);
    }

    /// `n` `[[tracks]]` entries; track 2 carries a video.
    fn toml_tracks(n: usize, duration: &str) -> String {
        (1..=n)
            .map(|id| {
                let video = if id == 2 { "video = \"two.mp4\"\n" } else { "" };
                format!(
                    "[[tracks]]\nid = {id}\ntitle = \"Track {id}\"\nartist = \"Someone\"\n{video}duration = \"{duration}\"\n\n"
                )
            })
            .collect()
    }

    #[test]
    fn test_toml_catalog() {
        let c = Catalog::from_toml_str(&toml_tracks(12, "3:30")).unwrap();
        assert_eq!(c.len(), 12);
        assert_eq!(c.track(1).video, "two.mp4");
        assert_eq!(c.track(0).cover, "");
        assert_eq!(c.side(Side::B).count(), SIDE_LEN);
    }

    #[test]
    fn test_invalid_catalogs() {
        assert!(matches!(
            Catalog::from_toml_str(""),
            Err(CatalogError::Empty)
        ));
        assert!(matches!(
            Catalog::from_toml_str(&toml_tracks(12, "long")),
            Err(CatalogError::InvalidDuration { id: 1, .. })
        ));
        // a record is two full sides
        assert!(matches!(
            Catalog::from_toml_str(&toml_tracks(20, "3:30")),
            Err(CatalogError::WrongLength { len: 20 })
        ));
        assert!(matches!(
            Catalog::from_toml_str(&toml_tracks(2, "3:30")),
            Err(CatalogError::WrongLength { len: 2 })
        ));
        assert!(matches!(
            Catalog::from_toml_str("tracks = 3"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join("spindle-no-such-catalog.toml");
        assert!(matches!(
            Catalog::load(&path),
            Err(CatalogError::Read { .. })
        ));
        assert_eq!(Catalog::load_or_builtin(Some(&path)), Catalog::builtin());
    }

    #[test]
    fn test_wrong_length_file_falls_back() {
        let path = std::env::temp_dir().join(format!(
            "spindle-catalog-20-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, toml_tracks(20, "3:30")).unwrap();
        let catalog = Catalog::load_or_builtin(Some(&path));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(catalog, Catalog::builtin());
        assert_eq!(catalog.side(Side::B).count(), SIDE_LEN);
    }
}
