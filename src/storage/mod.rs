//! Persistent storage using SQLite (rusqlite)
//!
//! This module provides:
//! - OS-standard data directory location (via `directories` crate)
//! - SQLite database with schema versioning
//! - A library of generated boards, so expensive high-power boards can be
//!   reused
//! - A history of finished games for lifetime statistics

use crate::game::GeneratedBoard;
use crate::stats::{GameRecord, LifetimeStats};
use directories::ProjectDirs;
use log::debug;
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current schema version. Bump this when making schema changes.
const SCHEMA_VERSION: u32 = 1;

/// Database file name inside the data directory
const DB_FILE: &str = "wordgrid.db";

/// Default word list file name inside the data directory
const DICTIONARY_FILE: &str = "words.txt";

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Could not determine data directory
    #[error("could not determine data directory")]
    NoDataDirectory,
    /// Schema version mismatch (future version)
    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },
    /// Failed to create data directory
    #[error("failed to create data directory: {0}")]
    CreateDirFailed(#[source] std::io::Error),
}

/// A generated board kept in the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBoard {
    pub id: i64,
    pub letters: String,
    pub width: usize,
    pub height: usize,
    pub power: u8,
    pub total_score: u32,
    pub word_count: u32,
    /// Unix timestamp (milliseconds)
    pub created_at: i64,
}

/// The main storage handle.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the storage database.
    ///
    /// Uses OS-standard directories:
    /// - Linux: `$XDG_DATA_HOME/wordgrid/` or `~/.local/share/wordgrid/`
    /// - macOS: `~/Library/Application Support/wordgrid/`
    pub fn open() -> Result<Self, StorageError> {
        let data_dir = Self::data_dir()?;
        std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;
        Self::open_at(data_dir.join(DB_FILE))
    }

    /// Open or create a database at a specific path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path.as_ref())?;
        let storage = Storage { conn };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let storage = Storage {
            conn: Connection::open_in_memory()?,
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Get the OS-standard data directory.
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "wordgrid")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    /// Where the word list is looked for when none is given.
    pub fn default_dictionary_path() -> Result<PathBuf, StorageError> {
        Ok(Self::data_dir()?.join(DICTIONARY_FILE))
    }

    /// Add a generated board to the library. Returns its row id.
    pub fn save_board(&self, generated: &GeneratedBoard) -> Result<i64, StorageError> {
        self.conn.execute(
            "INSERT INTO boards (letters, width, height, power, total_score, word_count, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                generated.letters(),
                generated.board.width() as i64,
                generated.board.height() as i64,
                generated.power,
                generated.total_score,
                generated.word_count as i64,
                now_millis()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Stored boards of the given size scoring at least `min_score`,
    /// best first.
    pub fn boards(
        &self,
        width: usize,
        height: usize,
        min_score: u32,
    ) -> Result<Vec<StoredBoard>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, letters, width, height, power, total_score, word_count, created_at
             FROM boards
             WHERE width = ?1 AND height = ?2 AND total_score >= ?3
             ORDER BY total_score DESC, id",
        )?;
        let rows = stmt.query_map(params![width as i64, height as i64, min_score], |row| {
            Ok(StoredBoard {
                id: row.get(0)?,
                letters: row.get(1)?,
                width: row.get::<_, i64>(2)? as usize,
                height: row.get::<_, i64>(3)? as usize,
                power: row.get(4)?,
                total_score: row.get(5)?,
                word_count: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?;

        let mut boards = Vec::new();
        for row in rows {
            boards.push(row?);
        }
        Ok(boards)
    }

    /// Get the total number of boards in the library.
    pub fn board_count(&self) -> Result<i64, StorageError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM boards", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Append a finished game to the history. Returns its row id.
    pub fn record_game(&self, record: &GameRecord) -> Result<i64, StorageError> {
        self.conn.execute(
            "INSERT INTO games (letters, width, height, points, rank, words_found, words_total,
                                board_score, histogram, played_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.letters,
                record.width as i64,
                record.height as i64,
                record.points,
                record.rank,
                record.words_found,
                record.words_total,
                record.board_score,
                record.histogram_text(),
                now_millis()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All finished games in the order they were played.
    pub fn games(&self) -> Result<Vec<GameRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT letters, width, height, points, rank, words_found, words_total,
                    board_score, histogram
             FROM games ORDER BY id",
        )?;
        let rows = stmt.query_map([], game_from_row)?;

        let mut games = Vec::new();
        for row in rows {
            games.push(row?);
        }
        Ok(games)
    }

    /// Lifetime statistics over the whole history.
    pub fn lifetime_stats(&self) -> Result<LifetimeStats, StorageError> {
        Ok(LifetimeStats::from_records(&self.games()?))
    }

    // Private helper methods

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            debug!("creating schema v{}", SCHEMA_VERSION);
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            // Database is from a newer version of wordgrid
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: u32 = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: stores schema version
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- Generated boards that cleared the score floor
            CREATE TABLE boards (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                letters TEXT NOT NULL,
                width INTEGER NOT NULL,
                height INTEGER NOT NULL,
                power INTEGER NOT NULL,
                total_score INTEGER NOT NULL,
                word_count INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- Index for library lookups by size
            CREATE INDEX idx_boards_size ON boards (width, height, total_score);

            -- Finished games, one row per board played
            CREATE TABLE games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                letters TEXT NOT NULL,
                width INTEGER NOT NULL,
                height INTEGER NOT NULL,
                points INTEGER NOT NULL,
                rank REAL NOT NULL,
                words_found INTEGER NOT NULL,
                words_total INTEGER NOT NULL,
                board_score INTEGER NOT NULL,
                histogram TEXT NOT NULL,
                played_at INTEGER NOT NULL
            );
            "#,
        )?;

        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, now_millis()],
        )?;

        Ok(())
    }
}

fn game_from_row(row: &Row<'_>) -> rusqlite::Result<GameRecord> {
    let histogram: String = row.get(8)?;
    Ok(GameRecord {
        letters: row.get(0)?,
        width: row.get::<_, i64>(1)? as usize,
        height: row.get::<_, i64>(2)? as usize,
        points: row.get(3)?,
        rank: row.get(4)?,
        words_found: row.get(5)?,
        words_total: row.get(6)?,
        board_score: row.get(7)?,
        histogram: GameRecord::parse_histogram(&histogram),
    })
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::scoring::HISTOGRAM_BINS;
    use crate::game::Board;

    fn generated(letters: &str, total_score: u32) -> GeneratedBoard {
        GeneratedBoard {
            board: Board::new(4, 4, letters).unwrap(),
            total_score,
            word_count: 12,
            attempts: 1,
            power: 3,
        }
    }

    fn game(points: u32, rank: f64) -> GameRecord {
        let mut histogram = [0; HISTOGRAM_BINS];
        histogram[3] = 2;
        histogram[5] = 1;
        GameRecord {
            letters: "abcdefghijklmnop".to_string(),
            width: 4,
            height: 4,
            points,
            rank,
            words_found: 3,
            words_total: 40,
            board_score: 120_000,
            histogram,
        }
    }

    #[test]
    fn test_storage_creation() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.board_count().unwrap(), 0);
        assert!(storage.games().unwrap().is_empty());
    }

    #[test]
    fn test_schema_version_is_current() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.get_schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_future_schema_rejected() {
        let storage = Storage::open_in_memory().unwrap();
        storage
            .conn
            .execute("UPDATE meta SET schema_version = ?1", params![SCHEMA_VERSION + 1])
            .unwrap();
        assert!(matches!(
            storage.initialize_schema(),
            Err(StorageError::FutureSchemaVersion { .. })
        ));
    }

    #[test]
    fn test_save_and_query_boards() {
        let storage = Storage::open_in_memory().unwrap();
        storage.save_board(&generated("abcdefghijklmnop", 90_000)).unwrap();
        storage.save_board(&generated("serstaniloetrasd", 150_000)).unwrap();
        storage.save_board(&generated("pinetarsloadcems", 120_000)).unwrap();

        let boards = storage.boards(4, 4, 100_000).unwrap();
        assert_eq!(boards.len(), 2);
        assert_eq!(boards[0].letters, "serstaniloetrasd");
        assert_eq!(boards[0].total_score, 150_000);
        assert_eq!(boards[0].power, 3);
        assert_eq!(boards[1].total_score, 120_000);

        assert!(storage.boards(5, 5, 0).unwrap().is_empty());
        assert_eq!(storage.board_count().unwrap(), 3);
    }

    #[test]
    fn test_record_and_read_games() {
        let storage = Storage::open_in_memory().unwrap();
        let first = game(900, 22.5);
        storage.record_game(&first).unwrap();
        storage.record_game(&game(2400, 41.0)).unwrap();

        let games = storage.games().unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0], first);
        assert_eq!(games[1].points, 2400);
    }

    #[test]
    fn test_lifetime_stats_from_history() {
        let storage = Storage::open_in_memory().unwrap();
        storage.record_game(&game(900, 22.5)).unwrap();
        storage.record_game(&game(2400, 41.0)).unwrap();

        let stats = storage.lifetime_stats().unwrap();
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.best_score, 2400);
        assert_eq!(stats.best_rank, 41.0);
        assert_eq!(stats.longest_word, 5);
    }

    #[test]
    fn test_data_dir() {
        // Should return a path (may fail in some CI environments without home dir)
        if let Ok(dir) = Storage::data_dir() {
            assert!(dir.to_string_lossy().contains("wordgrid"));
            let dict = Storage::default_dictionary_path().unwrap();
            assert!(dict.ends_with(DICTIONARY_FILE));
        }
    }
}
