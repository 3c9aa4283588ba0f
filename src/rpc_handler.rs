//! RPC method handler for the JGChat JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! appropriate managers and services via the `App` struct.

use std::sync::Mutex;

use crate::app::App;
use crate::managers::question_log::{QuestionLog, QuestionLogTrait};
use crate::services::chat_orchestrator::ChatOrchestratorTrait;
use crate::services::chat_view;
use crate::services::model_catalog::ModelCatalogTrait;
use crate::services::session_tokens::SessionTokensTrait;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::chat::ChatConfig;

use chrono::Utc;
use serde_json::{json, Value};

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── Session ───
        "session.open" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let (session_id, token) = a.session_tokens.issue();
            let settings = a.settings_engine.get_settings();
            let theme = serde_json::to_value(settings.widget.theme).map_err(|e| e.to_string())?;
            Ok(json!({
                "session_id": session_id,
                "token": token,
                "name": settings.chat.name,
                "welcome_message": settings.chat.welcome_message,
                "placeholder": settings.chat.placeholder,
                "theme": theme,
            }))
        }
        "session.close" => {
            let session_id = params.get("session_id").and_then(|v| v.as_str()).ok_or("missing session_id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.session_tokens.revoke(session_id);
            Ok(json!({"ok": true}))
        }

        // ─── Chat ───
        "chat.send" => {
            let session_id = params.get("session_id").and_then(|v| v.as_str()).ok_or("missing session_id")?;
            let token = params.get("token").and_then(|v| v.as_str()).ok_or("missing token")?;
            let message = params.get("message").and_then(|v| v.as_str()).ok_or("missing message")?;
            if message.trim().is_empty() {
                return Err("empty message".to_string());
            }
            let history: Vec<Value> = params
                .get("history")
                .and_then(|v| v.as_array())
                .cloned()
                .unwrap_or_default();

            let a = app.lock().map_err(|e| e.to_string())?;
            a.session_tokens.validate(session_id, token).map_err(|e| e.to_string())?;

            let config = ChatConfig::from_settings(a.settings_engine.get_settings());
            let content = a.chat.send_turn(&config, message, &history).map_err(|e| e.to_string())?;

            // Only answered questions are recorded; a failed turn above has
            // already returned. Log failures do not fail the turn.
            let conn = a.db.connection();
            let mut logger = QuestionLog::new(conn);
            if let Err(e) = logger.append(message) {
                log::warn!("failed to record question: {}", e);
            }

            Ok(json!({"content": content}))
        }

        // ─── Models ───
        "models.refresh" => {
            let session_id = params.get("session_id").and_then(|v| v.as_str()).ok_or("missing session_id")?;
            let token = params.get("token").and_then(|v| v.as_str()).ok_or("missing token")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.session_tokens.validate(session_id, token).map_err(|e| e.to_string())?;

            let api_key = a.settings_engine.get_settings().api.api_key.clone();
            let models = a.model_catalog.refresh(&api_key).map_err(|e| e.to_string())?;
            a.settings_engine.replace_models(models.clone()).map_err(|e| e.to_string())?;

            let arr = serde_json::to_value(&models).map_err(|e| e.to_string())?;
            Ok(json!({"models": arr}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let settings = a.settings_engine.get_settings();
            let json_val = serde_json::to_value(settings).map_err(|e| e.to_string())?;
            Ok(json_val)
        }
        "settings.set" => {
            let key = params.get("key").and_then(|v| v.as_str()).ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.settings_engine.set_value(key, value).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Question log ───
        "logs.list" => {
            let search = params.get("search").and_then(|v| v.as_str());
            let page = params.get("page").and_then(|v| v.as_u64()).unwrap_or(1) as u32;
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.db.connection();
            let logger = QuestionLog::new(conn);
            let result = logger.list(search, page).map_err(|e| e.to_string())?;
            let arr: Vec<Value> = result
                .entries
                .iter()
                .map(|entry| {
                    json!({
                        "id": entry.id,
                        "question": entry.question,
                        "created_at": entry.created_at,
                        "created_at_display": QuestionLog::format_timestamp(entry.created_at),
                    })
                })
                .collect();
            Ok(json!({
                "entries": arr,
                "total": result.total,
                "page": result.page,
                "per_page": result.per_page,
            }))
        }
        "logs.delete" => {
            let ids_val = params.get("ids").and_then(|v| v.as_array()).ok_or("missing ids")?;
            let ids: Vec<i64> = ids_val.iter().filter_map(|v| v.as_i64()).collect();
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.db.connection();
            let mut logger = QuestionLog::new(conn);
            let deleted = logger.delete_many(&ids).map_err(|e| e.to_string())?;
            Ok(json!({"deleted": deleted}))
        }
        "logs.export" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.db.connection();
            let logger = QuestionLog::new(conn);
            let csv = logger.export_csv().map_err(|e| e.to_string())?;
            let filename = QuestionLog::export_filename(Utc::now().date_naive());
            Ok(json!({"filename": filename, "csv": csv}))
        }

        // ─── Views ───
        "view.embed" => {
            let height = params.get("height").and_then(|v| v.as_str());
            let a = app.lock().map_err(|e| e.to_string())?;
            let html = chat_view::render_embed(a.settings_engine.get_settings(), height);
            Ok(json!({"html": html}))
        }
        "view.widget" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let html = chat_view::render_widget(a.settings_engine.get_settings());
            Ok(json!({"html": html}))
        }

        // ─── Ping ───
        "ping" => Ok(json!({"pong": true})),

        _ => Err(format!("unknown method: {}", method)),
    }
}
