//! Local-first song resolution.
//!
//! Looks the query up in the local library first, asks the provider on
//! a miss, and inserts the provider's record when no matching row
//! exists yet. Records are never updated afterwards.

use strophe_core::model::Song;
use strophe_core::schema::Database;

use crate::error::FetchResult;
use crate::genius::LyricsProvider;

/// Resolve a (title, artist) query to a stored song.
///
/// - An empty title is the invalid-input condition, regardless of
///   whether the song would have been found locally or remotely.
/// - Provider timeout and transport errors propagate without retry.
/// - A provider miss resolves to `Ok(None)`.
pub async fn resolve<P>(
    db: &Database,
    provider: &P,
    title: &str,
    artist: Option<&str>,
) -> FetchResult<Option<Song>>
where
    P: LyricsProvider + ?Sized,
{
    // Empty-title guard lives in find_songs so both paths share it.
    let local = db.find_songs(title, artist)?;
    if let Some(song) = local.into_iter().next() {
        log::debug!("resolved {:?} locally", song.title);
        return Ok(Some(song));
    }

    let Some(hit) = provider.search(title, artist).await? else {
        log::info!("provider has no match for {title:?}");
        return Ok(None);
    };

    // The provider may resolve the query to different canonical names;
    // only insert when no record exists under those.
    if let Some(existing) = db
        .find_songs(&hit.title, Some(&hit.artist))?
        .into_iter()
        .next()
    {
        return Ok(Some(existing));
    }

    let mut song = Song::new(hit.title, hit.artist)
        .with_external_id(hit.external_id)
        .with_lyrics(hit.lyrics);
    if let Some(year) = hit.released {
        song = song.with_released(year);
    }

    let id = db.insert_song(&song)?;
    song.id = Some(id);
    log::info!("stored {} (provider id {})", song, hit.external_id);

    Ok(Some(song))
}
