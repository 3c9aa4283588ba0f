//! Unit tests for the embed and widget view renderers.

use jgchat::services::chat_view::{render_embed, render_widget, DEFAULT_EMBED_HEIGHT};
use jgchat::types::settings::{ChatSettings, ThemeMode};

#[test]
fn test_embed_uses_default_height() {
    let settings = ChatSettings::default();
    let html = render_embed(&settings, None);
    assert!(html.contains(&format!("height: {}", DEFAULT_EMBED_HEIGHT)));
    assert!(html.contains("jgchat-embedded"));
}

#[test]
fn test_embed_height_override() {
    let settings = ChatSettings::default();
    let html = render_embed(&settings, Some("400px"));
    assert!(html.contains("height: 400px"));
    assert!(!html.contains("600px"));
}

#[test]
fn test_embed_dark_theme_has_no_light_class() {
    let settings = ChatSettings::default();
    let html = render_embed(&settings, None);
    assert!(!html.contains("jgchat-light-mode"));
}

#[test]
fn test_embed_light_theme_class() {
    let mut settings = ChatSettings::default();
    settings.widget.theme = ThemeMode::Light;
    let html = render_embed(&settings, None);
    assert!(html.contains("jgchat-embedded jgchat-light-mode"));
}

#[test]
fn test_embed_contains_input_elements_and_placeholder() {
    let settings = ChatSettings::default();
    let html = render_embed(&settings, None);
    assert!(html.contains("id=\"jgchat-messages\""));
    assert!(html.contains("id=\"jgchat-input\""));
    assert!(html.contains("placeholder=\"Type your message...\""));
    assert!(html.contains("id=\"jgchat-send\""));
}

#[test]
fn test_embed_escapes_placeholder() {
    let mut settings = ChatSettings::default();
    settings.chat.placeholder = "Ask \"anything\" <here>".to_string();
    let html = render_embed(&settings, None);
    assert!(html.contains("placeholder=\"Ask &quot;anything&quot; &lt;here&gt;\""));
}

#[test]
fn test_widget_disabled_renders_nothing() {
    let mut settings = ChatSettings::default();
    settings.widget.enabled = false;
    assert!(render_widget(&settings).is_none());
}

#[test]
fn test_widget_enabled_renders_launcher_and_container() {
    let settings = ChatSettings::default();
    let html = render_widget(&settings).unwrap();
    assert!(html.contains("id=\"jgchat-widget-button\""));
    assert!(html.contains("id=\"jgchat-widget-container\""));
    // Container starts hidden until the launcher is clicked
    assert!(html.contains("display: none"));
}

#[test]
fn test_widget_header_shows_escaped_name() {
    let mut settings = ChatSettings::default();
    settings.chat.name = "Q&A <Bot>".to_string();
    let html = render_widget(&settings).unwrap();
    assert!(html.contains("Q&amp;A &lt;Bot&gt;"));
    assert!(!html.contains("<Bot>"));
}

#[test]
fn test_widget_light_theme_class() {
    let mut settings = ChatSettings::default();
    settings.widget.theme = ThemeMode::Light;
    let html = render_widget(&settings).unwrap();
    assert!(html.contains("class=\"jgchat-light-mode\""));
}
