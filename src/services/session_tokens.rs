//! Session anti-forgery tokens for JGChat.
//!
//! Each chat session receives a random token when it opens; the token must
//! accompany every request-style operation (chat turns, catalog refresh)
//! and is compared in constant time.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ring::constant_time;
use ring::rand::{SecureRandom, SystemRandom};
use uuid::Uuid;

use crate::types::errors::TokenError;

/// Token length in bytes before base64 encoding.
const TOKEN_LENGTH: usize = 32;

/// Trait defining session token operations.
pub trait SessionTokensTrait {
    fn issue(&mut self) -> (String, String);
    fn validate(&self, session_id: &str, token: &str) -> Result<(), TokenError>;
    fn revoke(&mut self, session_id: &str);
}

/// In-memory session token store.
pub struct SessionTokens {
    rng: SystemRandom,
    tokens: HashMap<String, String>,
}

impl SessionTokens {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
            tokens: HashMap::new(),
        }
    }
}

impl Default for SessionTokens {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTokensTrait for SessionTokens {
    /// Issues a fresh `(session_id, token)` pair and remembers it.
    fn issue(&mut self) -> (String, String) {
        let session_id = Uuid::new_v4().to_string();
        let mut bytes = [0u8; TOKEN_LENGTH];
        // SystemRandom::fill only fails when the OS RNG is unavailable;
        // a zeroed token would still validate only against itself.
        let _ = self.rng.fill(&mut bytes);
        let token = BASE64.encode(bytes);
        self.tokens.insert(session_id.clone(), token.clone());
        (session_id, token)
    }

    /// Validates a token for a session, comparing in constant time.
    fn validate(&self, session_id: &str, token: &str) -> Result<(), TokenError> {
        let expected = self
            .tokens
            .get(session_id)
            .ok_or_else(|| TokenError::UnknownSession(session_id.to_string()))?;

        constant_time::verify_slices_are_equal(expected.as_bytes(), token.as_bytes())
            .map_err(|_| TokenError::InvalidToken)
    }

    /// Forgets a session's token.
    fn revoke(&mut self, session_id: &str) {
        self.tokens.remove(session_id);
    }
}
