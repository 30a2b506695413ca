//! Descriptive word statistics over a normalized token sequence.

use std::collections::HashSet;

use crate::{Error, Result};

/// Round to 2 decimal places using round-half-to-even.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Total number of words, empty tokens included.
#[must_use]
pub fn num_words(words: &[String]) -> usize {
    words.len()
}

/// Number of unique word values. Comparison is case-sensitive and the
/// empty string counts as one distinct value when present.
#[must_use]
pub fn num_distinct_words(words: &[String]) -> usize {
    words.iter().collect::<HashSet<_>>().len()
}

/// Average word length in characters, rounded to 2 decimals.
///
/// Returns [`Error::EmptyLyrics`] for a zero-token input. The
/// normalizer never produces one (an empty string still splits into a
/// single empty token), so this only fires for slices built by hand.
pub fn avg_word_length(words: &[String]) -> Result<f64> {
    if words.is_empty() {
        return Err(Error::EmptyLyrics);
    }
    let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
    Ok(round2(total_chars as f64 / words.len() as f64))
}
