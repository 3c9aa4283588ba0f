use serde::{Deserialize, Serialize};

use super::model::ModelDescriptor;

/// Top-level chatbot settings container.
///
/// A single global instance, persisted as JSON. Every field has a defined
/// default so reads before any write return the documented values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatSettings {
    pub chat: IdentitySettings,
    pub api: ApiSettings,
    pub widget: WidgetSettings,
    /// Free-text content injected into the system prompt to ground responses.
    pub knowledge_base: String,
    /// Cached model catalog, fully replaced on each successful refresh.
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            chat: IdentitySettings::default(),
            api: ApiSettings::default(),
            widget: WidgetSettings::default(),
            knowledge_base: String::new(),
            models: Vec::new(),
        }
    }
}

/// How the chatbot presents itself to visitors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentitySettings {
    pub name: String,
    pub welcome_message: String,
    pub placeholder: String,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            name: "JGChat".to_string(),
            welcome_message:
                "Hello! I'm a customizable chatbot powered by Claude AI. How can I help you today?"
                    .to_string(),
            placeholder: "Type your message...".to_string(),
        }
    }
}

/// Provider API settings. The key is stored in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    pub api_key: String,
    pub model: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "claude-3-opus-20240229".to_string(),
        }
    }
}

/// Footer widget settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WidgetSettings {
    pub enabled: bool,
    pub theme: ThemeMode,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            theme: ThemeMode::Dark,
        }
    }
}

/// Theme mode for the chat interface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Dark,
    Light,
}
