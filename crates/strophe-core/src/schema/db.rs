use rusqlite::Connection;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Song;

use super::migrations::MIGRATIONS;

/// A database connection with CRUD methods for Song records.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        drop(stmt);
        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

// Song CRUD
impl Database {
    /// Insert a new song and return its rowid.
    ///
    /// A duplicate external id violates the UNIQUE constraint and
    /// surfaces as a database error.
    pub fn insert_song(&self, song: &Song) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO songs (external_id, title, artist, released, lyrics, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                song.external_id,
                song.title,
                song.artist,
                song.released,
                song.lyrics,
                song.created_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Find songs by title and, when non-empty, artist.
    ///
    /// Both comparisons are case-insensitive. An empty title is the
    /// invalid-input condition regardless of the artist.
    pub fn find_songs(&self, title: &str, artist: Option<&str>) -> Result<Vec<Song>> {
        if title.is_empty() {
            return Err(Error::InvalidData("title is required".to_string()));
        }

        let songs = match artist.filter(|a| !a.is_empty()) {
            Some(artist) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, external_id, title, artist, released, lyrics, created_at
                     FROM songs
                     WHERE LOWER(title) = LOWER(?1) AND LOWER(artist) = LOWER(?2)
                     ORDER BY id",
                )?;
                let rows = stmt
                    .query_map([title, artist], row_to_song)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, external_id, title, artist, released, lyrics, created_at
                     FROM songs
                     WHERE LOWER(title) = LOWER(?1)
                     ORDER BY id",
                )?;
                let rows = stmt
                    .query_map([title], row_to_song)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
        };

        Ok(songs)
    }

    /// List every song, ordered by release year ascending with NULLs
    /// (no release year) first.
    pub fn list_songs(&self) -> Result<Vec<Song>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, external_id, title, artist, released, lyrics, created_at
             FROM songs
             ORDER BY released, id",
        )?;

        let songs = stmt
            .query_map([], row_to_song)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(songs)
    }

    /// Delete a song by rowid. Deletion sits outside the normal flow;
    /// it exists for fixtures and manual library maintenance.
    pub fn delete_song(&self, id: i64) -> Result<()> {
        let deleted = self.conn.execute("DELETE FROM songs WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(Error::NotFound {
                entity: "song",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Number of songs in the library.
    pub fn count_songs(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn row_to_song(row: &rusqlite::Row) -> rusqlite::Result<Song> {
    use chrono::DateTime;

    let created_at_str: String = row.get(6)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                6,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?
        .into();

    Ok(Song {
        id: row.get(0)?,
        external_id: row.get(1)?,
        title: row.get(2)?,
        artist: row.get(3)?,
        released: row.get(4)?,
        lyrics: row.get(5)?,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_song_round_trip() {
        let db = Database::open_in_memory().unwrap();

        let song = Song::new("test_song", "test_artist");
        db.insert_song(&song).unwrap();

        let found = db.find_songs("test_song", Some("test_artist")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "test_song");

        // Artist is optional in lookups.
        let found = db.find_songs("test_song", None).unwrap();
        assert_eq!(found[0].artist, "test_artist");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let db = Database::open_in_memory().unwrap();
        db.insert_song(&Song::new("Waterloo", "ABBA")).unwrap();

        let found = db.find_songs("wAtErLoO", Some("abba")).unwrap();
        assert_eq!(found.len(), 1);
        // Stored casing is preserved for display.
        assert_eq!(found[0].title, "Waterloo");
        assert_eq!(found[0].artist, "ABBA");
    }

    #[test]
    fn test_delete_makes_lookup_miss() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_song(&Song::new("test_song", "test_artist")).unwrap();

        db.delete_song(id).unwrap();
        assert!(db.find_songs("test_song", None).unwrap().is_empty());
        assert!(matches!(
            db.delete_song(id),
            Err(Error::NotFound { entity: "song", .. })
        ));
    }

    #[test]
    fn test_empty_title_is_invalid_input() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.find_songs("", Some("test_artist")),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_external_id_is_unique() {
        let db = Database::open_in_memory().unwrap();
        db.insert_song(&Song::new("a", "x").with_external_id(42)).unwrap();

        let err = db.insert_song(&Song::new("b", "y").with_external_id(42));
        assert!(matches!(err, Err(Error::Database(_))));

        // Records without an external id do not collide.
        db.insert_song(&Song::new("c", "z")).unwrap();
        db.insert_song(&Song::new("d", "w")).unwrap();
    }

    #[test]
    fn test_list_songs_orders_missing_year_first() {
        let db = Database::open_in_memory().unwrap();
        db.insert_song(&Song::new("a", "x").with_released(1994)).unwrap();
        db.insert_song(&Song::new("b", "y")).unwrap();
        db.insert_song(&Song::new("c", "z").with_released(1968)).unwrap();

        let songs = db.list_songs().unwrap();
        let years: Vec<Option<i32>> = songs.iter().map(|s| s.released).collect();
        assert_eq!(years, vec![None, Some(1968), Some(1994)]);
    }

    #[test]
    fn test_round_trip_preserves_all_fields() {
        let db = Database::open_in_memory().unwrap();
        let song = Song::new("Zombie", "The Cranberries")
            .with_external_id(52651)
            .with_released(1994)
            .with_lyrics("Zombie Lyrics\nAnother head hangs lowly");
        db.insert_song(&song).unwrap();

        let found = db.find_songs("zombie", Some("the cranberries")).unwrap();
        assert_eq!(found[0].external_id, Some(52651));
        assert_eq!(found[0].released, Some(1994));
        assert_eq!(found[0].lyrics, song.lyrics);
    }
}
