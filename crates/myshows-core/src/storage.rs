use std::path::Path;

use rusqlite::{params, Connection};

use crate::error::MyShowsError;
use crate::models::{WatchlistDelete, WatchlistEntry};

const SCHEMA_V1: &str = include_str!("../../../migrations/001_initial.sql");

const ENTRY_COLUMNS: &str = "id, title, poster, summary, genre, is_movie, rating, release,
     trailer, trailer_name";

/// SQLite-backed storage for the watchlist.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, MyShowsError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, MyShowsError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Entries whose title contains `filter` (case-insensitive), ordered by title.
    /// An empty filter returns the whole watchlist.
    pub fn find_matching(&self, filter: &str) -> Result<Vec<WatchlistEntry>, MyShowsError> {
        let pattern = format!("%{}%", escape_like(filter));
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM watchlist
             WHERE title LIKE ?1 ESCAPE '\\'
             ORDER BY title COLLATE NOCASE, id"
        ))?;
        let rows = stmt
            .query_map(params![pattern], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Insert or replace an entry, returning the full watchlist afterwards.
    pub fn upsert_entry(&self, entry: &WatchlistEntry) -> Result<Vec<WatchlistEntry>, MyShowsError> {
        self.conn.execute(
            "INSERT INTO watchlist (id, title, poster, summary, genre, is_movie, rating,
             release, trailer, trailer_name)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                poster = excluded.poster,
                summary = excluded.summary,
                genre = excluded.genre,
                is_movie = excluded.is_movie,
                rating = excluded.rating,
                release = excluded.release,
                trailer = excluded.trailer,
                trailer_name = excluded.trailer_name",
            params![
                entry.id,
                entry.title,
                entry.poster_path,
                entry.summary,
                entry.genre,
                entry.is_movie,
                entry.rating,
                entry.release,
                entry.trailer_key,
                entry.trailer_name,
            ],
        )?;
        self.find_matching("")
    }

    /// Delete an entry by id. The delete and the read-back run in one
    /// transaction, so `entries` is exactly the list the delete left behind.
    pub fn delete_entry(&self, id: i64) -> Result<WatchlistDelete, MyShowsError> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM watchlist WHERE id = ?1", params![id])? > 0;
        let entries = self.find_matching("")?;
        tx.commit()?;
        Ok(WatchlistDelete { removed, entries })
    }
}

/// Run schema migrations using `PRAGMA user_version` for version tracking.
fn run_migrations(conn: &Connection) -> Result<(), MyShowsError> {
    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        conn.execute_batch(SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", 1)?;
    }
    Ok(())
}

/// `%` and `_` in user input match literally.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<WatchlistEntry> {
    Ok(WatchlistEntry {
        id: row.get(0)?,
        title: row.get(1)?,
        poster_path: row.get(2)?,
        summary: row.get(3)?,
        genre: row.get(4)?,
        is_movie: row.get(5)?,
        rating: row.get(6)?,
        release: row.get(7)?,
        trailer_key: row.get(8)?,
        trailer_name: row.get(9)?,
    })
}
