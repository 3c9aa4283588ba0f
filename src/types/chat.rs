use serde::{Deserialize, Serialize};

/// Role of a participant in a chat conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message in a session's conversation.
///
/// An ordered sequence of turns forms the session history, which is replayed
/// in full to the provider on every new turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Snapshot of the settings a single chat turn needs.
///
/// Taken from the settings store by the caller and passed in explicitly, so
/// the orchestrator never reads ambient global state.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
    pub model: String,
    pub name: String,
    pub knowledge_base: String,
}

impl ChatConfig {
    pub fn from_settings(settings: &super::settings::ChatSettings) -> Self {
        Self {
            api_key: settings.api.api_key.clone(),
            model: settings.api.model.clone(),
            name: settings.chat.name.clone(),
            knowledge_base: settings.knowledge_base.clone(),
        }
    }
}
