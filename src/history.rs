use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::path::Path;

use crate::results::ResultSummary;
use crate::session::Mode;
use crate::vocabulary::Language;

/// One finished session as stored in the history database
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub language: String,
    pub mode: String,
    pub time_limit_secs: Option<u64>,
    pub score: u32,
    pub accuracy_percent: u32,
    pub total_answers: u32,
    pub end_reason: String,
    pub played_at: DateTime<Local>,
}

/// Log of finished sessions and the words missed in them
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open (or create) the history database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                language TEXT NOT NULL,
                mode TEXT NOT NULL,
                time_limit_secs INTEGER,
                score INTEGER NOT NULL,
                accuracy INTEGER NOT NULL,
                total_answers INTEGER NOT NULL,
                end_reason TEXT NOT NULL,
                played_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS missed_words (
                session_id INTEGER NOT NULL REFERENCES sessions(id),
                word TEXT NOT NULL,
                wrong INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_sessions_mode ON sessions(language, mode);
            CREATE INDEX IF NOT EXISTS idx_missed_words_word ON missed_words(word);
            "#,
        )?;

        Ok(HistoryDb { conn })
    }

    /// Store a finished session. Returns the new session id.
    pub fn record(&mut self, summary: &ResultSummary) -> Result<i64> {
        self.record_at(summary, Local::now())
    }

    pub fn record_at(&mut self, summary: &ResultSummary, played_at: DateTime<Local>) -> Result<i64> {
        let tx = self.conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO sessions
            (language, mode, time_limit_secs, score, accuracy, total_answers, end_reason, played_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                language_key(summary.language),
                mode_key(summary.mode),
                summary.time_limit_secs,
                summary.score,
                summary.accuracy_percent,
                summary.total_answers,
                summary.end_reason.to_string(),
                played_at.to_rfc3339(),
            ],
        )?;
        let session_id = tx.last_insert_rowid();

        for missed in &summary.frequently_missed {
            tx.execute(
                "INSERT INTO missed_words (session_id, word, wrong) VALUES (?1, ?2, ?3)",
                params![session_id, missed.word, missed.wrong],
            )?;
        }

        tx.commit()?;
        Ok(session_id)
    }

    /// Highest score for a language/mode (and time limit, for timer sessions)
    pub fn best_score(
        &self,
        language: Language,
        mode: Mode,
        time_limit_secs: Option<u64>,
    ) -> Result<Option<u32>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT MAX(score) FROM sessions
            WHERE language = ?1 AND mode = ?2 AND time_limit_secs IS ?3
            "#,
        )?;

        let best: Option<u32> = stmt
            .query_row(
                params![language_key(language), mode_key(mode), time_limit_secs],
                |row| row.get::<_, Option<u32>>(0),
            )
            .optional()?
            .flatten();
        Ok(best)
    }

    /// Most recent sessions first
    pub fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT language, mode, time_limit_secs, score, accuracy, total_answers, end_reason, played_at
            FROM sessions
            ORDER BY played_at DESC, id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            let played_at_str: String = row.get(7)?;
            let played_at = DateTime::parse_from_rfc3339(&played_at_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        7,
                        "played_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(SessionRecord {
                language: row.get(0)?,
                mode: row.get(1)?,
                time_limit_secs: row.get(2)?,
                score: row.get(3)?,
                accuracy_percent: row.get(4)?,
                total_answers: row.get(5)?,
                end_reason: row.get(6)?,
                played_at,
            })
        })?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    /// Words missed most often across all recorded sessions for a language
    pub fn most_missed(&self, language: Language, limit: usize) -> Result<Vec<(String, u32)>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT m.word, SUM(m.wrong) AS total_wrong
            FROM missed_words m
            JOIN sessions s ON s.id = m.session_id
            WHERE s.language = ?1
            GROUP BY m.word
            ORDER BY total_wrong DESC, m.word
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![language_key(language), limit as i64], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;

        let mut words = Vec::new();
        for row in rows {
            words.push(row?);
        }
        Ok(words)
    }
}

fn language_key(language: Language) -> String {
    language.to_string().to_lowercase()
}

fn mode_key(mode: Mode) -> String {
    mode.to_string().to_lowercase()
}
