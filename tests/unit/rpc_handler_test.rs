//! Integration tests for the RPC method dispatcher.
//!
//! Each test builds a full `App` backed by a temp directory and drives it
//! through `handle_method`, the same entry point the stdin/stdout server
//! uses. Provider calls go to a loopback stub serving canned responses.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Mutex;
use std::thread;

use jgchat::app::App;
use jgchat::rpc_handler::handle_method;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Serves a canned HTTP response for every connection until the test ends.
fn stub_server(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let mut stream = match stream {
                Ok(s) => s,
                Err(_) => break,
            };
            let mut data = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                match stream.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        data.extend_from_slice(&buf[..n]);
                        if request_complete(&data) {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{}", addr)
}

fn request_complete(data: &[u8]) -> bool {
    let text = String::from_utf8_lossy(data);
    let header_end = match text.find("\r\n\r\n") {
        Some(pos) => pos,
        None => return false,
    };
    let content_length = text
        .lines()
        .find_map(|line| {
            let lower = line.to_ascii_lowercase();
            lower
                .strip_prefix("content-length:")
                .and_then(|v| v.trim().parse::<usize>().ok())
        })
        .unwrap_or(0);
    data.len() >= header_end + 4 + content_length
}

/// Builds an App in a temp directory. The `TempDir` handle must outlive the
/// test body.
fn test_app(api_base: Option<&str>) -> (Mutex<App>, TempDir) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("jgchat.db").to_string_lossy().to_string();
    let config_path = dir.path().join("settings.json").to_string_lossy().to_string();
    let app = App::with_overrides(&db_path, Some(config_path), api_base).unwrap();
    (Mutex::new(app), dir)
}

/// Opens a session and returns `(session_id, token)`.
fn open_session(app: &Mutex<App>) -> (String, String) {
    let result = handle_method(app, "session.open", &json!({})).unwrap();
    (
        result["session_id"].as_str().unwrap().to_string(),
        result["token"].as_str().unwrap().to_string(),
    )
}

fn set_api_key(app: &Mutex<App>, key: &str) {
    handle_method(app, "settings.set", &json!({"key": "api.api_key", "value": key})).unwrap();
}

fn log_total(app: &Mutex<App>) -> u64 {
    let result = handle_method(app, "logs.list", &json!({})).unwrap();
    result["total"].as_u64().unwrap()
}

#[test]
fn test_ping() {
    let (app, _dir) = test_app(None);
    let result = handle_method(&app, "ping", &json!({})).unwrap();
    assert_eq!(result, json!({"pong": true}));
}

#[test]
fn test_unknown_method_is_an_error() {
    let (app, _dir) = test_app(None);
    let err = handle_method(&app, "no.such.method", &json!({})).unwrap_err();
    assert!(err.contains("no.such.method"));
}

#[test]
fn test_session_open_returns_bootstrap_payload() {
    let (app, _dir) = test_app(None);
    let result = handle_method(&app, "session.open", &json!({})).unwrap();

    assert!(!result["session_id"].as_str().unwrap().is_empty());
    assert!(!result["token"].as_str().unwrap().is_empty());
    assert_eq!(result["name"], "JGChat");
    assert_eq!(
        result["welcome_message"],
        "Hello! I'm a customizable chatbot powered by Claude AI. How can I help you today?"
    );
    assert_eq!(result["placeholder"], "Type your message...");
    assert_eq!(result["theme"], "dark");
}

#[test]
fn test_session_open_issues_distinct_sessions() {
    let (app, _dir) = test_app(None);
    let (id_a, token_a) = open_session(&app);
    let (id_b, token_b) = open_session(&app);
    assert_ne!(id_a, id_b);
    assert_ne!(token_a, token_b);
}

#[test]
fn test_chat_send_requires_valid_token() {
    let base = stub_server("200 OK", json!({"content": []}).to_string());
    let (app, _dir) = test_app(Some(&base));
    set_api_key(&app, "sk-test");
    let (session_id, _token) = open_session(&app);

    let err = handle_method(
        &app,
        "chat.send",
        &json!({"session_id": session_id, "token": "forged", "message": "hi"}),
    )
    .unwrap_err();
    assert!(err.contains("Invalid session token"));
    assert_eq!(log_total(&app), 0);
}

#[test]
fn test_chat_send_rejects_closed_session() {
    let (app, _dir) = test_app(None);
    let (session_id, token) = open_session(&app);
    handle_method(&app, "session.close", &json!({"session_id": session_id})).unwrap();

    let err = handle_method(
        &app,
        "chat.send",
        &json!({"session_id": session_id, "token": token, "message": "hi"}),
    )
    .unwrap_err();
    assert!(err.contains("Unknown session"));
}

#[test]
fn test_chat_send_rejects_empty_message() {
    let (app, _dir) = test_app(None);
    let (session_id, token) = open_session(&app);

    let err = handle_method(
        &app,
        "chat.send",
        &json!({"session_id": session_id, "token": token, "message": "   "}),
    )
    .unwrap_err();
    assert_eq!(err, "empty message");
}

#[test]
fn test_chat_send_success_returns_content_and_logs_question() {
    let base = stub_server(
        "200 OK",
        json!({"content": [{"type": "text", "text": "We open at 9am."}]}).to_string(),
    );
    let (app, _dir) = test_app(Some(&base));
    set_api_key(&app, "sk-test");
    let (session_id, token) = open_session(&app);

    let result = handle_method(
        &app,
        "chat.send",
        &json!({
            "session_id": session_id,
            "token": token,
            "message": "When do you open?",
            "history": [{"role": "assistant", "content": "Hello!"}],
        }),
    )
    .unwrap();
    assert_eq!(result["content"], "We open at 9am.");

    // Exactly one log entry per successful turn
    assert_eq!(log_total(&app), 1);
    let logs = handle_method(&app, "logs.list", &json!({})).unwrap();
    assert_eq!(logs["entries"][0]["question"], "When do you open?");
}

#[test]
fn test_chat_send_failure_logs_nothing() {
    let base = stub_server("500 Internal Server Error", "{\"error\":\"boom\"}".to_string());
    let (app, _dir) = test_app(Some(&base));
    set_api_key(&app, "sk-test");
    let (session_id, token) = open_session(&app);

    let err = handle_method(
        &app,
        "chat.send",
        &json!({"session_id": session_id, "token": token, "message": "hi"}),
    )
    .unwrap_err();
    assert!(err.contains("500"));
    assert_eq!(log_total(&app), 0);
}

#[test]
fn test_chat_send_without_api_key_fails_without_logging() {
    let (app, _dir) = test_app(None);
    let (session_id, token) = open_session(&app);

    let err = handle_method(
        &app,
        "chat.send",
        &json!({"session_id": session_id, "token": token, "message": "hi"}),
    )
    .unwrap_err();
    assert_eq!(err, "API key not configured");
    assert_eq!(log_total(&app), 0);
}

#[test]
fn test_models_refresh_stores_catalog_in_settings() {
    let base = stub_server(
        "200 OK",
        json!({"data": [
            {"id": "claude-3-opus-20240229", "created": 2},
            {"id": "claude-3-haiku-20240307", "created": 1}
        ]})
        .to_string(),
    );
    let (app, _dir) = test_app(Some(&base));
    set_api_key(&app, "sk-test");
    let (session_id, token) = open_session(&app);

    let result = handle_method(
        &app,
        "models.refresh",
        &json!({"session_id": session_id, "token": token}),
    )
    .unwrap();
    assert_eq!(result["models"].as_array().unwrap().len(), 2);
    assert_eq!(result["models"][0]["id"], "claude-3-opus-20240229");

    let settings = handle_method(&app, "settings.get", &json!({})).unwrap();
    assert_eq!(settings["models"].as_array().unwrap().len(), 2);
}

#[test]
fn test_models_refresh_failure_keeps_cached_catalog() {
    let base = stub_server("503 Service Unavailable", "{}".to_string());
    let (app, _dir) = test_app(Some(&base));
    set_api_key(&app, "sk-test");
    {
        use jgchat::services::settings_engine::SettingsEngineTrait;
        use jgchat::types::model::ModelDescriptor;
        let mut a = app.lock().unwrap();
        a.settings_engine
            .replace_models(vec![ModelDescriptor {
                id: "claude-cached".to_string(),
                name: "claude-cached".to_string(),
                description: String::new(),
                created: 1,
                latest: false,
            }])
            .unwrap();
    }
    let (session_id, token) = open_session(&app);

    let err = handle_method(
        &app,
        "models.refresh",
        &json!({"session_id": session_id, "token": token}),
    )
    .unwrap_err();
    assert!(err.contains("503"));

    let settings = handle_method(&app, "settings.get", &json!({})).unwrap();
    assert_eq!(settings["models"][0]["id"], "claude-cached");
}

#[test]
fn test_models_refresh_requires_token() {
    let (app, _dir) = test_app(None);
    let err = handle_method(
        &app,
        "models.refresh",
        &json!({"session_id": "nope", "token": "nope"}),
    )
    .unwrap_err();
    assert!(err.contains("Unknown session"));
}

#[test]
fn test_settings_get_and_set_roundtrip() {
    let (app, _dir) = test_app(None);

    let before = handle_method(&app, "settings.get", &json!({})).unwrap();
    assert_eq!(before["chat"]["name"], "JGChat");

    handle_method(
        &app,
        "settings.set",
        &json!({"key": "chat.name", "value": "Support Bot"}),
    )
    .unwrap();

    let after = handle_method(&app, "settings.get", &json!({})).unwrap();
    assert_eq!(after["chat"]["name"], "Support Bot");
}

#[test]
fn test_settings_set_invalid_key_is_an_error() {
    let (app, _dir) = test_app(None);
    let err = handle_method(
        &app,
        "settings.set",
        &json!({"key": "bogus.key", "value": 1}),
    )
    .unwrap_err();
    assert!(err.contains("bogus.key"));
}

#[test]
fn test_logs_list_search_and_display_timestamp() {
    let (app, _dir) = test_app(None);
    {
        let a = app.lock().unwrap();
        a.db.connection()
            .execute(
                "INSERT INTO question_logs (question, created_at) VALUES ('Where is pricing?', 1609459200)",
                [],
            )
            .unwrap();
        a.db.connection()
            .execute(
                "INSERT INTO question_logs (question, created_at) VALUES ('unrelated', 1609459300)",
                [],
            )
            .unwrap();
    }

    let result = handle_method(&app, "logs.list", &json!({"search": "pricing"})).unwrap();
    assert_eq!(result["total"], 1);
    assert_eq!(result["per_page"], 20);
    assert_eq!(result["entries"][0]["question"], "Where is pricing?");
    assert_eq!(result["entries"][0]["created_at_display"], "2021-01-01 00:00");
}

#[test]
fn test_logs_list_huge_page_from_params_does_not_panic() {
    let (app, _dir) = test_app(None);
    {
        let a = app.lock().unwrap();
        a.db.connection()
            .execute(
                "INSERT INTO question_logs (question, created_at) VALUES ('only entry', 1)",
                [],
            )
            .unwrap();
    }

    let result = handle_method(&app, "logs.list", &json!({"page": u32::MAX})).unwrap();
    assert_eq!(result["total"], 1);
    assert_eq!(result["entries"].as_array().unwrap().len(), 0);
}

#[test]
fn test_startup_with_corrupt_config_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("jgchat.db").to_string_lossy().to_string();
    let config_path = dir.path().join("settings.json");
    std::fs::write(&config_path, "{not json").unwrap();

    let mut app = App::with_overrides(
        &db_path,
        Some(config_path.to_string_lossy().to_string()),
        None,
    )
    .unwrap();
    app.startup();
    let app = Mutex::new(app);

    let settings = handle_method(&app, "settings.get", &json!({})).unwrap();
    assert_eq!(settings["chat"]["name"], "JGChat");
    assert_eq!(settings["api"]["api_key"], "");

    // The corrupt file is left in place, not clobbered with defaults
    let on_disk = std::fs::read_to_string(&config_path).unwrap();
    assert_eq!(on_disk, "{not json");
}

#[test]
fn test_logs_delete() {
    let (app, _dir) = test_app(None);
    {
        let a = app.lock().unwrap();
        a.db.connection()
            .execute(
                "INSERT INTO question_logs (question, created_at) VALUES ('a', 1), ('b', 2)",
                [],
            )
            .unwrap();
    }

    let ids: Vec<Value> = handle_method(&app, "logs.list", &json!({})).unwrap()["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].clone())
        .collect();
    assert_eq!(ids.len(), 2);

    let result = handle_method(&app, "logs.delete", &json!({"ids": [ids[0]]})).unwrap();
    assert_eq!(result["deleted"], 1);
    assert_eq!(log_total(&app), 1);
}

#[test]
fn test_logs_export_filename_and_header() {
    let (app, _dir) = test_app(None);
    let result = handle_method(&app, "logs.export", &json!({})).unwrap();

    let filename = result["filename"].as_str().unwrap();
    assert!(filename.starts_with("jgchat-logs-"));
    assert!(filename.ends_with(".csv"));

    let csv = result["csv"].as_str().unwrap();
    assert!(csv.starts_with("Date/Time,Question\n"));
}

#[test]
fn test_view_embed_and_widget() {
    let (app, _dir) = test_app(None);

    let embed = handle_method(&app, "view.embed", &json!({"height": "450px"})).unwrap();
    assert!(embed["html"].as_str().unwrap().contains("height: 450px"));

    let widget = handle_method(&app, "view.widget", &json!({})).unwrap();
    assert!(widget["html"]
        .as_str()
        .unwrap()
        .contains("jgchat-widget-button"));

    handle_method(
        &app,
        "settings.set",
        &json!({"key": "widget.enabled", "value": false}),
    )
    .unwrap();
    let disabled = handle_method(&app, "view.widget", &json!({})).unwrap();
    assert!(disabled["html"].is_null());
}
