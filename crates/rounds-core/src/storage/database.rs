//! SQLite-based preset storage.
//!
//! Provides persistent storage for:
//! - Workout presets
//! - Key-value store for application settings

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::data_dir;
use super::migrations;
use crate::error::{CoreError, DatabaseError, Result};
use crate::preset::Preset;

const DB_FILE: &str = "rounds.db";

const PRESET_COLUMNS: &str = "id, name, rounds, round_length_secs, rest_secs, prep_secs";

/// SQLite database for presets and settings.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/rounds.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join(DB_FILE);
        Self::open_at(path)
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::from_connection(conn)
    }

    /// Open an in-memory database, for tests and throwaway sessions.
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // ── Presets ──────────────────────────────────────────────────────

    /// Insert a preset and return its new id. The preset's own `id` is ignored.
    pub fn insert_preset(&self, preset: &Preset) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO presets (name, rounds, round_length_secs, rest_secs, prep_secs)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                preset.name,
                preset.rounds,
                preset.round_length_secs,
                preset.rest_secs,
                preset.prep_secs,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Overwrite the stored preset with the same id.
    pub fn update_preset(&self, preset: &Preset) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE presets
             SET name = ?2, rounds = ?3, round_length_secs = ?4, rest_secs = ?5, prep_secs = ?6
             WHERE id = ?1",
            params![
                preset.id,
                preset.name,
                preset.rounds,
                preset.round_length_secs,
                preset.rest_secs,
                preset.prep_secs,
            ],
        )?;
        if changed == 0 {
            return Err(CoreError::NotFound {
                kind: "preset",
                id: preset.id,
            });
        }
        Ok(())
    }

    /// Delete a preset. Returns whether a row was removed.
    pub fn delete_preset(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM presets WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub fn preset_by_id(&self, id: i64) -> Result<Option<Preset>> {
        let sql = format!("SELECT {PRESET_COLUMNS} FROM presets WHERE id = ?1");
        let preset = self
            .conn
            .query_row(&sql, params![id], preset_from_row)
            .optional()?;
        Ok(preset)
    }

    /// First preset with exactly this name.
    pub fn preset_by_name(&self, name: &str) -> Result<Option<Preset>> {
        let sql = format!("SELECT {PRESET_COLUMNS} FROM presets WHERE name = ?1 ORDER BY id LIMIT 1");
        let preset = self
            .conn
            .query_row(&sql, params![name], preset_from_row)
            .optional()?;
        Ok(preset)
    }

    /// All presets in insertion order.
    pub fn all_presets(&self) -> Result<Vec<Preset>> {
        let sql = format!("SELECT {PRESET_COLUMNS} FROM presets ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], preset_from_row)?;
        let mut presets = Vec::new();
        for row in rows {
            presets.push(row?);
        }
        Ok(presets)
    }

    pub fn preset_count(&self) -> Result<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM presets", [], |row| row.get::<_, u64>(0))?;
        Ok(count)
    }

    // ── Key-value store ──────────────────────────────────────────────

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

fn preset_from_row(row: &Row<'_>) -> rusqlite::Result<Preset> {
    Ok(Preset {
        id: row.get(0)?,
        name: row.get(1)?,
        rounds: row.get(2)?,
        round_length_secs: row.get(3)?,
        rest_secs: row.get(4)?,
        prep_secs: row.get(5)?,
    })
}
