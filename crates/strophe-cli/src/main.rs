use anyhow::Result;
use clap::Parser;

mod app;
mod chart;

/// Searches for song lyrics, then analyzes the frequency of words with
/// different character lengths.
///
/// The song title is required, whether given as a flag or typed at the
/// interactive prompt. Adding the artist narrows the search when two
/// songs share a title.
#[derive(Debug, Parser)]
#[command(name = "strophe", version, about)]
struct Cli {
    /// Song title (required; prompted for when no flags are given)
    #[arg(long, short = 't')]
    title: Option<String>,

    /// Song's artist
    #[arg(long, short = 'a')]
    artist: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    app::run(cli.title, cli.artist).await
}
