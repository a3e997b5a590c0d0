//! Season/episode classification from video titles.
//!
//! The default pattern recognizes the naming conventions of several
//! languages:
//!
//! - Season: "Season" (English), "Staffel" (German), "Saison" (French),
//!   "Temporada" (Spanish), or a bare "S".
//! - Episode: "Episode" (English), "Folge" (German), "Épisode" (French),
//!   "Episodio" / "Capítulo" (Spanish, accent variants), or a bare "E".
//!
//! Matching is case-insensitive and tolerates flexible separators
//! (spaces, hyphens, colons) between the season and episode parts.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The default multilingual season/episode pattern.
pub const DEFAULT_SEASON_EPISODE_PATTERN: &str = r"(?i)\b(?:S|Season|Staffel|Saison|Temporada)\s*(?P<season>\d{1,2})[\s\-:]*\b(?:E|Episode|Folge|Épisode|Episodio|Cap[ií]tulo)\s*(?P<episode>\d{1,3})";

static DEFAULT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEFAULT_SEASON_EPISODE_PATTERN)
        .expect("DEFAULT_SEASON_EPISODE_PATTERN is a valid regex pattern")
});

/// Classification result for one title.
///
/// Unparseable titles yield both fields absent; that is a result, not an
/// error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeInfo {
    /// Season number, when the title carried one.
    pub season: Option<u32>,
    /// Episode number, when the title carried one.
    pub episode: Option<u32>,
}

impl EpisodeInfo {
    /// Whether both season and episode were recognized.
    pub fn is_classified(&self) -> bool {
        self.season.is_some() && self.episode.is_some()
    }
}

impl std::fmt::Display for EpisodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.season, self.episode) {
            (Some(season), Some(episode)) => write!(f, "S{season:02}E{episode:02}"),
            _ => write!(f, "unclassified"),
        }
    }
}

/// Extracts season and episode numbers from titles via a regex with
/// named `season` and `episode` groups.
#[derive(Debug, Clone)]
pub struct EpisodeExtractor {
    regex: Regex,
}

impl EpisodeExtractor {
    /// An extractor using the default multilingual pattern.
    pub fn new() -> Self {
        Self {
            regex: DEFAULT_REGEX.clone(),
        }
    }

    /// An extractor using a caller-supplied pattern.
    ///
    /// The pattern must carry `season` and `episode` named groups; a
    /// group the pattern lacks simply never classifies.
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Classifies one title. Never fails.
    pub fn extract(&self, title: &str) -> EpisodeInfo {
        let Some(captures) = self.regex.captures(title) else {
            return EpisodeInfo::default();
        };
        let group = |name: &str| {
            captures
                .name(name)
                .and_then(|m| m.as_str().parse::<u32>().ok())
        };
        EpisodeInfo {
            season: group("season"),
            episode: group("episode"),
        }
    }
}

impl Default for EpisodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}
