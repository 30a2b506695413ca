//! Frequency aggregation: the word-length percentage distribution for
//! one song, and average word length grouped by release year across
//! the library.

use std::collections::BTreeMap;

use crate::analysis::stats::round2;
use crate::model::Song;
use crate::{Error, Result};

/// Longest word length the distribution accounts for. Longer words are
/// outside the contract and panic on bucket indexing.
const MAX_WORD_LENGTH: usize = 44;

/// Build the length -> percentage distribution for one token sequence.
///
/// Every token adds `100 / total` to the bucket matching its character
/// length. Buckets are rounded to 2 decimals after all additions, then
/// trailing zero buckets are pruned scanning down from length 44;
/// interior zeros below the last populated length are retained.
pub fn word_length_frequency(words: &[String]) -> Result<BTreeMap<usize, f64>> {
    if words.is_empty() {
        return Err(Error::EmptyLyrics);
    }

    let share = 100.0 / words.len() as f64;
    let mut buckets = [0.0_f64; MAX_WORD_LENGTH + 1];
    for word in words {
        buckets[word.chars().count()] += share;
    }

    // Round after accumulation, then prune on the rounded values so a
    // bucket that rounds down to zero still counts as trailing.
    for pct in &mut buckets {
        *pct = round2(*pct);
    }
    let last_populated = buckets.iter().rposition(|&pct| pct != 0.0).unwrap_or(0);

    Ok(buckets[..=last_populated]
        .iter()
        .enumerate()
        .map(|(length, &pct)| (length, pct))
        .collect())
}

/// Average word length per release year across the supplied songs.
///
/// Songs are grouped by `released`; per group the token counts and the
/// summed character counts of all tokens are accumulated
/// independently, and the group value is chars / words rounded to 2
/// decimals. `None` (no release year) sorts first, matching the NULL
/// placement of `ORDER BY released` in SQLite.
pub fn avg_word_length_by_year(songs: &[Song]) -> Result<BTreeMap<Option<i32>, f64>> {
    let mut totals: BTreeMap<Option<i32>, (usize, usize)> = BTreeMap::new();

    for song in songs {
        let words = song.word_list();
        let chars: usize = words.iter().map(|w| w.chars().count()).sum();
        let entry = totals.entry(song.released).or_insert((0, 0));
        entry.0 += words.len();
        entry.1 += chars;
    }

    totals
        .into_iter()
        .map(|(year, (words, chars))| {
            if words == 0 {
                return Err(Error::EmptyLyrics);
            }
            Ok((year, round2(chars as f64 / words as f64)))
        })
        .collect()
}
