//! Genius API client.
//!
//! The search and song endpoints come from the public API; lyrics
//! bodies are not served by the API, so they are pulled from the song
//! page HTML the same way the common client libraries do.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{FetchError, FetchResult};

const API_BASE: &str = "https://api.genius.com";

/// A song as returned by the remote provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSong {
    /// Identifier assigned by the provider, used for de-duplication.
    pub external_id: i64,
    pub title: String,
    pub artist: String,
    /// Raw lyrics string, including the leading metadata line and
    /// embedded annotations the normalizer strips later.
    pub lyrics: String,
    /// Release year, when the provider supplies one.
    pub released: Option<i32>,
}

/// Seam for the external lyrics provider, so the resolution flow can
/// be exercised against a stub.
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    /// Search for a song by title and, optionally, artist.
    ///
    /// Returns `Ok(None)` when the provider has no match.
    async fn search(&self, title: &str, artist: Option<&str>)
        -> FetchResult<Option<ProviderSong>>;
}

// Wire DTOs. Release year lives in a nested optional structure that is
// validated here at the boundary instead of trusted as a raw map.

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchBody,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    result: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: i64,
    title: String,
    url: String,
    primary_artist: PrimaryArtist,
}

#[derive(Debug, Deserialize)]
struct PrimaryArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SongResponse {
    response: SongBody,
}

#[derive(Debug, Deserialize)]
struct SongBody {
    song: SongDetails,
}

#[derive(Debug, Deserialize)]
struct SongDetails {
    #[serde(default)]
    release_date_components: Option<ReleaseDateComponents>,
}

#[derive(Debug, Deserialize)]
struct ReleaseDateComponents {
    #[serde(default)]
    year: Option<i32>,
}

// Literal patterns; Regex::new cannot fail on them.

#[allow(clippy::unwrap_used)]
static LYRICS_CONTAINER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<div[^>]*data-lyrics-container="true"[^>]*>(.*?)</div>"#).unwrap()
});

#[allow(clippy::unwrap_used)]
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"<br\s*/?>").unwrap());

#[allow(clippy::unwrap_used)]
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Genius API client.
#[derive(Debug, Clone)]
pub struct GeniusClient {
    http: Client,
    token: String,
}

impl GeniusClient {
    /// Create a new Genius client with the given API token.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(token: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("strophe/0.1.0 (https://github.com/oxur/strophe)")
            .build()?;

        Ok(Self {
            http,
            token: token.into(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> FetchResult<T> {
        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        response.json::<T>().await.map_err(|e| FetchError::Parse {
            message: e.to_string(),
        })
    }

    /// Pick the hit to use: the first whose primary artist matches the
    /// requested one (case-insensitive), or the first hit overall when
    /// no artist was given.
    fn select_hit(hits: Vec<SearchHit>, artist: Option<&str>) -> Option<SearchResult> {
        let mut results = hits.into_iter().map(|h| h.result);
        match artist.filter(|a| !a.is_empty()) {
            Some(artist) => {
                results.find(|r| r.primary_artist.name.eq_ignore_ascii_case(artist))
            }
            None => results.next(),
        }
    }

    /// Fetch the release year from the song details endpoint.
    async fn release_year(&self, song_id: i64) -> FetchResult<Option<i32>> {
        let url = format!("{API_BASE}/songs/{song_id}");
        let details: SongResponse = self
            .get_json(&url, &[("text_format", "plain")])
            .await?;
        Ok(details
            .response
            .song
            .release_date_components
            .and_then(|c| c.year))
    }

    /// Fetch and extract the lyrics text from the song page.
    async fn fetch_lyrics(&self, page_url: &str) -> FetchResult<String> {
        let response = self.http.get(page_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                message: format!("fetching lyrics page {page_url}"),
            });
        }
        let html = response.text().await?;
        extract_lyrics(&html).ok_or_else(|| FetchError::Parse {
            message: format!("no lyrics container in {page_url}"),
        })
    }
}

/// Pull the lyrics text out of a song page.
fn extract_lyrics(html: &str) -> Option<String> {
    let mut blocks = Vec::new();
    for capture in LYRICS_CONTAINER.captures_iter(html) {
        let block = LINE_BREAK.replace_all(&capture[1], "\n");
        let block = HTML_TAG.replace_all(&block, "");
        blocks.push(unescape(&block));
    }
    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n"))
    }
}

fn unescape(text: &str) -> String {
    // &amp; last, so "&amp;lt;" stays "&lt;" instead of unescaping twice.
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[async_trait]
impl LyricsProvider for GeniusClient {
    async fn search(
        &self,
        title: &str,
        artist: Option<&str>,
    ) -> FetchResult<Option<ProviderSong>> {
        let query = match artist.filter(|a| !a.is_empty()) {
            Some(artist) => format!("{title} {artist}"),
            None => title.to_string(),
        };

        log::debug!("searching provider for {query:?}");
        let search: SearchResponse = self
            .get_json(&format!("{API_BASE}/search"), &[("q", query.as_str())])
            .await?;

        let Some(hit) = Self::select_hit(search.response.hits, artist) else {
            return Ok(None);
        };

        let released = self.release_year(hit.id).await?;
        let lyrics = self.fetch_lyrics(&hit.url).await?;

        Ok(Some(ProviderSong {
            external_id: hit.id,
            title: hit.title,
            artist: hit.primary_artist.name,
            lyrics,
            released,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genius_client_creation() {
        let client = GeniusClient::new("test-token");
        assert!(client.is_ok());
    }

    #[test]
    fn test_extract_lyrics_from_containers() {
        let html = concat!(
            "<html><body>",
            r#"<div data-lyrics-container="true">Waterloo Lyrics[Verse 1]<br/>My, my<br>at Waterloo</div>"#,
            r#"<div class="other">ignored</div>"#,
            r##"<div data-lyrics-container="true"><a href="#">Napoleon</a> did surrender</div>"##,
            "</body></html>",
        );

        let lyrics = extract_lyrics(html).unwrap();
        assert_eq!(
            lyrics,
            "Waterloo Lyrics[Verse 1]\nMy, my\nat Waterloo\nNapoleon did surrender"
        );
    }

    #[test]
    fn test_extract_lyrics_missing_container() {
        assert!(extract_lyrics("<html><body>nothing here</body></html>").is_none());
    }

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape("wit&#x27;s end &amp; more"), "wit's end & more");
    }

    #[test]
    fn test_select_hit_prefers_matching_artist() {
        let hits = vec![
            SearchHit {
                result: SearchResult {
                    id: 1,
                    title: "Waterloo".to_string(),
                    url: "https://example.com/1".to_string(),
                    primary_artist: PrimaryArtist {
                        name: "Covers Inc".to_string(),
                    },
                },
            },
            SearchHit {
                result: SearchResult {
                    id: 2,
                    title: "Waterloo".to_string(),
                    url: "https://example.com/2".to_string(),
                    primary_artist: PrimaryArtist {
                        name: "ABBA".to_string(),
                    },
                },
            },
        ];

        let hit = GeniusClient::select_hit(hits, Some("abba")).unwrap();
        assert_eq!(hit.id, 2);
    }

    #[test]
    fn test_select_hit_takes_first_without_artist() {
        let hits = vec![SearchHit {
            result: SearchResult {
                id: 7,
                title: "Zombie".to_string(),
                url: "https://example.com/7".to_string(),
                primary_artist: PrimaryArtist {
                    name: "The Cranberries".to_string(),
                },
            },
        }];

        let hit = GeniusClient::select_hit(hits, None).unwrap();
        assert_eq!(hit.id, 7);
    }

    #[test]
    fn test_search_request_encodes_query() {
        // Same construction get_json uses for the search endpoint.
        let request = Client::new()
            .get(format!("{API_BASE}/search"))
            .query(&[("q", "wit's end")])
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://api.genius.com/search?q=wit%27s+end"
        );
    }

    #[test]
    fn test_release_year_parses_nested_optional() {
        let json = r#"{"response":{"song":{"release_date_components":{"year":1994,"month":9,"day":19}}}}"#;
        let parsed: SongResponse = serde_json::from_str(json).unwrap();
        let year = parsed
            .response
            .song
            .release_date_components
            .and_then(|c| c.year);
        assert_eq!(year, Some(1994));

        let json = r#"{"response":{"song":{"release_date_components":null}}}"#;
        let parsed: SongResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.response.song.release_date_components.is_none());
    }
}
