use std::fmt;

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === ChatError ===

/// Errors produced while orchestrating a chat turn against the provider.
#[derive(Debug)]
pub enum ChatError {
    /// No API key has been configured; no request was sent.
    NotConfigured,
    /// A transport-level error occurred reaching the provider (includes timeouts).
    NetworkError(String),
    /// The provider returned a non-200 response; carries status code and raw body.
    ApiError { status: u16, body: String },
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::NotConfigured => write!(f, "API key not configured"),
            ChatError::NetworkError(msg) => write!(f, "Chat network error: {}", msg),
            ChatError::ApiError { status, body } => {
                write!(f, "API returned status {}: {}", status, body)
            }
        }
    }
}

impl std::error::Error for ChatError {}

// === CatalogError ===

/// Errors produced while refreshing the model catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// No API key has been configured; no request was sent.
    NotConfigured,
    /// A transport-level error occurred reaching the provider (includes timeouts).
    NetworkError(String),
    /// The provider returned a non-200 response; carries status code and raw body.
    ApiError { status: u16, body: String },
    /// The response body could not be parsed.
    ParseError(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotConfigured => write!(f, "API key not configured"),
            CatalogError::NetworkError(msg) => write!(f, "Catalog network error: {}", msg),
            CatalogError::ApiError { status, body } => {
                write!(f, "API returned status {}: {}", status, body)
            }
            CatalogError::ParseError(msg) => write!(f, "Catalog parse error: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

// === LogError ===

/// Errors related to question log operations.
#[derive(Debug)]
pub enum LogError {
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::DatabaseError(msg) => write!(f, "Question log database error: {}", msg),
        }
    }
}

impl std::error::Error for LogError {}

// === TokenError ===

/// Errors related to session token validation.
#[derive(Debug)]
pub enum TokenError {
    /// The session id is not known to the server.
    UnknownSession(String),
    /// The supplied token does not match the session's token.
    InvalidToken,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::UnknownSession(id) => write!(f, "Unknown session: {}", id),
            TokenError::InvalidToken => write!(f, "Invalid session token"),
        }
    }
}

impl std::error::Error for TokenError {}
