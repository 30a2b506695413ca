use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{stats, tokens};
use crate::Result;

/// One lyrics entry in the local library.
///
/// A Song is created either from a remote provider hit or as a bare
/// test fixture (title and artist only). Lyrics are immutable once
/// stored: there is no update path, a record is inserted once and
/// reused as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Local rowid, assigned on insert.
    pub id: Option<i64>,

    /// Identifier assigned by the remote provider; unique when present.
    /// Absent on locally created records.
    pub external_id: Option<i64>,

    pub title: String,
    pub artist: String,

    /// Release year, when the provider supplied one.
    pub released: Option<i32>,

    /// Raw lyrics string as returned by the provider, including the
    /// leading metadata line and embedded annotations.
    pub lyrics: String,

    pub created_at: DateTime<Utc>,
}

impl Song {
    #[must_use]
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: None,
            external_id: None,
            title: title.into(),
            artist: artist.into(),
            released: None,
            lyrics: String::new(),
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_external_id(mut self, id: i64) -> Self {
        self.external_id = Some(id);
        self
    }

    #[must_use]
    pub fn with_released(mut self, year: i32) -> Self {
        self.released = Some(year);
        self
    }

    #[must_use]
    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = lyrics.into();
        self
    }

    /// Normalized word tokens of the lyrics, ready for length analysis.
    #[must_use]
    pub fn word_list(&self) -> Vec<String> {
        tokens::tokenize(&self.lyrics)
    }

    /// Total number of words, empty tokens included.
    #[must_use]
    pub fn num_words(&self) -> usize {
        self.word_list().len()
    }

    /// Number of unique word values (case-sensitive).
    #[must_use]
    pub fn num_distinct_words(&self) -> usize {
        stats::num_distinct_words(&self.word_list())
    }

    /// Average word length in characters, rounded to 2 decimals.
    pub fn avg_word_length(&self) -> Result<f64> {
        stats::avg_word_length(&self.word_list())
    }
}

impl std::fmt::Display for Song {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.released {
            Some(year) => write!(f, "{} by {} released in {}", self.title, self.artist, year),
            None => write!(f, "{} by {}", self.title, self.artist),
        }
    }
}
