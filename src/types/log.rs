use serde::{Deserialize, Serialize};

/// A logged visitor question.
///
/// Immutable once written, except for bulk deletion by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionLogEntry {
    pub id: i64,
    pub question: String,
    /// UNIX timestamp (seconds) assigned at insert time.
    pub created_at: i64,
}

/// One page of question log entries plus the total match count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogPage {
    pub entries: Vec<QuestionLogEntry>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}
