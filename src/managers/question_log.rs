//! Question Log for JGChat.
//!
//! Implements `QuestionLogTrait`: appending visitor questions, paginated
//! and searchable listing, idempotent bulk deletion, and CSV export,
//! backed by SQLite via `rusqlite`.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, params_from_iter, Connection};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::errors::LogError;
use crate::types::log::{LogPage, QuestionLogEntry};

/// Entries per page in the listing view.
pub const PER_PAGE: u32 = 20;

/// Trait defining question log operations.
pub trait QuestionLogTrait {
    fn append(&mut self, question: &str) -> Result<i64, LogError>;
    fn list(&self, search: Option<&str>, page: u32) -> Result<LogPage, LogError>;
    fn delete_many(&mut self, ids: &[i64]) -> Result<usize, LogError>;
    fn export_csv(&self) -> Result<String, LogError>;
}

/// Question log backed by a SQLite connection.
pub struct QuestionLog<'a> {
    conn: &'a Connection,
}

impl<'a> QuestionLog<'a> {
    /// Creates a new `QuestionLog` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Reads a single `QuestionLogEntry` row into a struct.
    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<QuestionLogEntry> {
        Ok(QuestionLogEntry {
            id: row.get(0)?,
            question: row.get(1)?,
            created_at: row.get(2)?,
        })
    }

    /// Formats a UNIX timestamp for display and CSV export.
    pub fn format_timestamp(ts: i64) -> String {
        match DateTime::<Utc>::from_timestamp(ts, 0) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            None => String::new(),
        }
    }

    /// Returns the export download filename for the given date,
    /// e.g. `jgchat-logs-2026-08-27.csv`.
    pub fn export_filename(today: NaiveDate) -> String {
        format!("jgchat-logs-{}.csv", today.format("%Y-%m-%d"))
    }

    /// Escapes LIKE wildcards so a search term matches its characters
    /// literally. Pairs with `ESCAPE '\'` in the query.
    fn escape_like(term: &str) -> String {
        term.replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_")
    }

    /// Quotes a CSV field when it contains a comma, quote, or newline.
    fn csv_field(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

impl<'a> QuestionLogTrait for QuestionLog<'a> {
    /// Inserts a question with a server-assigned id and the current timestamp.
    /// Returns the new entry id.
    fn append(&mut self, question: &str) -> Result<i64, LogError> {
        self.conn
            .execute(
                "INSERT INTO question_logs (question, created_at) VALUES (?1, ?2)",
                params![question, Self::now()],
            )
            .map_err(|e| LogError::DatabaseError(e.to_string()))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Lists one page of entries, newest first, with the total match count.
    ///
    /// `search` filters by case-insensitive substring match on the question
    /// text. Pages are 1-based; page 0 is treated as page 1.
    fn list(&self, search: Option<&str>, page: u32) -> Result<LogPage, LogError> {
        let page = page.max(1);
        let pattern = format!("%{}%", Self::escape_like(search.unwrap_or("")));

        let total: u64 = self
            .conn
            .query_row(
                "SELECT COUNT(id) FROM question_logs WHERE question LIKE ?1 ESCAPE '\\'",
                params![pattern],
                |row| row.get::<_, i64>(0),
            )
            .map(|n| n as u64)
            .map_err(|e| LogError::DatabaseError(e.to_string()))?;

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, question, created_at FROM question_logs \
                 WHERE question LIKE ?1 ESCAPE '\\' \
                 ORDER BY created_at DESC, id DESC \
                 LIMIT ?2 OFFSET ?3",
            )
            .map_err(|e| LogError::DatabaseError(e.to_string()))?;

        // Page numbers come straight from RPC params; widen before
        // multiplying so an absurd page cannot overflow u32.
        let offset = (page as i64 - 1) * PER_PAGE as i64;
        let rows = stmt
            .query_map(params![pattern, PER_PAGE, offset], Self::row_to_entry)
            .map_err(|e| LogError::DatabaseError(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| LogError::DatabaseError(e.to_string()))?);
        }

        Ok(LogPage {
            entries,
            total,
            page,
            per_page: PER_PAGE,
        })
    }

    /// Bulk-deletes entries by id. An empty set is a no-op and deleting
    /// already-deleted ids is not an error. Returns the number of rows removed.
    fn delete_many(&mut self, ids: &[i64]) -> Result<usize, LogError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; ids.len()].join(",");
        let sql = format!("DELETE FROM question_logs WHERE id IN ({})", placeholders);
        self.conn
            .execute(&sql, params_from_iter(ids.iter()))
            .map_err(|e| LogError::DatabaseError(e.to_string()))
    }

    /// Exports all entries, newest first, as CSV with a `Date/Time,Question`
    /// header. No pagination limit.
    fn export_csv(&self) -> Result<String, LogError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, question, created_at FROM question_logs \
                 ORDER BY created_at DESC, id DESC",
            )
            .map_err(|e| LogError::DatabaseError(e.to_string()))?;

        let rows = stmt
            .query_map([], Self::row_to_entry)
            .map_err(|e| LogError::DatabaseError(e.to_string()))?;

        let mut csv = String::from("Date/Time,Question\n");
        for row in rows {
            let entry = row.map_err(|e| LogError::DatabaseError(e.to_string()))?;
            csv.push_str(&Self::csv_field(&Self::format_timestamp(entry.created_at)));
            csv.push(',');
            csv.push_str(&Self::csv_field(&entry.question));
            csv.push('\n');
        }
        Ok(csv)
    }
}
