//! Lyrics normalization.
//!
//! Turns the raw provider string into an ordered sequence of
//! punctuation-free word tokens. The passes run in a fixed order; each
//! pass feeds the next, so reordering them changes the output.

use once_cell::sync::Lazy;
use regex::Regex;

// Literal patterns; Regex::new cannot fail on them.

/// Bracketed section markers like "[Chorus]" or "[Verse 1]".
#[allow(clippy::unwrap_used)]
static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

/// Embed-widget artifact the provider appends, e.g. "78Embed".
#[allow(clippy::unwrap_used)]
static EMBED_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+Embed").unwrap());

/// Any non-word character (anything other than letters, digits, underscore).
#[allow(clippy::unwrap_used)]
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").unwrap());

#[allow(clippy::unwrap_used)]
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());

#[allow(clippy::unwrap_used)]
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Normalize a raw lyrics string into word tokens.
///
/// Passes, in order:
/// 1. drop everything up to and including the first line break (the
///    provider prepends a "Title Lyrics" metadata line); if there is no
///    line break the whole string is kept;
/// 2. remove bracketed annotations;
/// 3. remove trailing embed artifacts (digits followed by "Embed");
/// 4. remove apostrophes, so contractions concatenate ("wit's" -> "wits");
/// 5. replace every remaining non-word character with a space;
/// 6. remove every digit;
/// 7. collapse runs of spaces, trim, and split on single spaces.
///
/// An empty post-normalization string still splits into one
/// empty-string token; callers count it as a word of length 0.
#[must_use]
pub fn tokenize(raw: &str) -> Vec<String> {
    let body = match raw.split_once('\n') {
        Some((_header, rest)) => rest,
        None => raw,
    };

    let cleaned = BRACKETED.replace_all(body, "");
    let cleaned = EMBED_SUFFIX.replace_all(&cleaned, "");
    let cleaned = cleaned.replace('\'', "");
    let cleaned = NON_WORD.replace_all(&cleaned, " ");
    let cleaned = DIGIT.replace_all(&cleaned, "");
    let cleaned = MULTI_SPACE.replace_all(&cleaned, " ");

    cleaned.trim().split(' ').map(String::from).collect()
}
