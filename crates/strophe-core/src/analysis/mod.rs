//! Lyrics analysis: normalization, word statistics, and frequency
//! aggregation.

pub mod frequency;
pub mod stats;
pub mod tokens;

pub use frequency::{avg_word_length_by_year, word_length_frequency};
pub use stats::{avg_word_length, num_distinct_words, num_words};
pub use tokens::tokenize;
