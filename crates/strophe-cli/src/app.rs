//! The analysis run: resolve a song, print its word statistics, and
//! chart the word-length distribution plus the library-wide average
//! word length by release year.

use std::io::{self, Write};

use anyhow::Result;

use strophe_core::analysis::{avg_word_length, avg_word_length_by_year, num_distinct_words, word_length_frequency};
use strophe_core::model::Song;
use strophe_core::schema::Database;
use strophe_fetch::{resolve, Config, GeniusClient, LyricsProvider};

use crate::chart::{ChartSink, LineChart, TerminalCharts};

/// Full CLI run: load config, open the library, and analyze.
pub async fn run(title: Option<String>, artist: Option<String>) -> Result<()> {
    let config = Config::load()?;

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let db = Database::open(&config.database_path)?;

    let (title, artist) = query_from(title, artist)?;

    let token = config.genius_token.clone().unwrap_or_default();
    if token.is_empty() {
        log::warn!("no genius_token configured; remote lookups will be rejected");
    }
    let provider = GeniusClient::new(token)?;
    let mut charts = TerminalCharts;

    run_with(&db, &provider, &mut charts, &title, artist.as_deref()).await
}

/// Resolve the query, report on the song when found, and always finish
/// with the by-year aggregation. Provider timeouts and transport
/// failures are reported and swallowed so the aggregation still runs;
/// an invalid query (empty title) is fatal.
pub(crate) async fn run_with<P, S>(
    db: &Database,
    provider: &P,
    charts: &mut S,
    title: &str,
    artist: Option<&str>,
) -> Result<()>
where
    P: LyricsProvider + ?Sized,
    S: ChartSink,
{
    match resolve(db, provider, title, artist).await {
        Ok(Some(song)) => analyze(&song, charts)?,
        Ok(None) => println!("No match found for {title:?}."),
        Err(err) if err.is_timeout() => {
            println!("The lyrics provider timed out. Please try your search again.");
        }
        Err(err) if err.is_transient() => println!("{err}"),
        Err(err) if err.is_invalid_input() => {
            println!("Title is required.");
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    }

    chart_library_averages(db, charts)
}

/// Print the per-song report and chart its word-length distribution.
fn analyze<S: ChartSink>(song: &Song, charts: &mut S) -> Result<()> {
    let words = song.word_list();

    println!("\nLyrics analysis of {song}");
    println!("---------------------------------------");
    println!("Total number of words: {}", words.len());
    println!("Number of distinct words: {}", num_distinct_words(&words));
    println!("Average word length: {}", avg_word_length(&words)?);

    let frequency = word_length_frequency(&words)?;
    let points: Vec<(f64, f64)> = frequency
        .iter()
        .map(|(&length, &pct)| (length as f64, pct))
        .collect();

    charts.render(&LineChart::new(
        format!("Lyrics Analyzer for {song}"),
        "word length",
        "percent",
        points,
    ))
}

/// Chart average word length by release year across the whole library.
fn chart_library_averages<S: ChartSink>(db: &Database, charts: &mut S) -> Result<()> {
    let songs = db.list_songs()?;
    if songs.is_empty() {
        println!("\nThe library is empty; nothing to aggregate by year.");
        return Ok(());
    }

    let by_year = avg_word_length_by_year(&songs)?;

    if let Some(avg) = by_year.get(&None) {
        println!("\nAverage word length of songs without a release year: {avg}");
    }

    // Undated songs have no x position on the year axis.
    let points: Vec<(f64, f64)> = by_year
        .iter()
        .filter_map(|(year, &avg)| year.map(|y| (f64::from(y), avg)))
        .collect();

    if points.is_empty() {
        println!("No songs with a release year; skipping the by-year chart.");
        return Ok(());
    }

    charts.render(&LineChart::new(
        "Average Word Length by Year",
        "year",
        "average word length",
        points,
    ))
}

/// Take the query from the flags, or prompt for both when neither flag
/// was given. An empty title flows through resolve and fails there as
/// invalid input.
fn query_from(title: Option<String>, artist: Option<String>) -> Result<(String, Option<String>)> {
    if title.is_none() && artist.is_none() {
        let title = prompt("Song title: ")?;
        let artist = prompt("Artist name: ")?;
        let artist = (!artist.is_empty()).then_some(artist);
        return Ok((title, artist));
    }

    Ok((title.unwrap_or_default(), artist.filter(|a| !a.is_empty())))
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
