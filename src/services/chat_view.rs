//! Embeddable chat views for JGChat.
//!
//! Renders the inline (shortcode-style) embed and the floating footer
//! widget. Both variants share the same message-pane/typing-indicator/input
//! markup; the widget adds a launcher button and a header with the
//! configured chatbot name and is gated by the widget-enabled flag.

use crate::services::markdown::{escape_attr, escape_html};
use crate::types::settings::{ChatSettings, ThemeMode};

/// Default height of the inline embed.
pub const DEFAULT_EMBED_HEIGHT: &str = "600px";

fn theme_class(theme: ThemeMode) -> &'static str {
    match theme {
        ThemeMode::Light => " jgchat-light-mode",
        ThemeMode::Dark => "",
    }
}

/// The message pane, typing indicator, and input row shared by both views.
fn render_chat_body(settings: &ChatSettings) -> String {
    format!(
        concat!(
            "<div id=\"jgchat-messages\"></div>",
            "<div id=\"jgchat-typing\" style=\"display: none;\" class=\"jgchat-typing\">",
            "<div class=\"typing-dot\"></div>",
            "<div class=\"typing-dot\"></div>",
            "<div class=\"typing-dot\"></div>",
            "</div>",
            "<div id=\"jgchat-input-container\">",
            "<textarea id=\"jgchat-input\" placeholder=\"{placeholder}\"></textarea>",
            "<button id=\"jgchat-send\">Send</button>",
            "</div>"
        ),
        placeholder = escape_attr(&settings.chat.placeholder)
    )
}

/// Renders the inline embed with an optional height override.
pub fn render_embed(settings: &ChatSettings, height: Option<&str>) -> String {
    let height = height.unwrap_or(DEFAULT_EMBED_HEIGHT);
    format!(
        "<div class=\"jgchat-embedded{theme}\" style=\"height: {height}\">{body}</div>",
        theme = theme_class(settings.widget.theme),
        height = escape_attr(height),
        body = render_chat_body(settings)
    )
}

/// Renders the floating footer widget, or `None` when the widget is
/// disabled in settings.
pub fn render_widget(settings: &ChatSettings) -> Option<String> {
    if !settings.widget.enabled {
        return None;
    }

    Some(format!(
        concat!(
            "<div id=\"jgchat-widget-button\">",
            "<div class=\"jgchat-widget-icon\">\u{1F4AC}</div>",
            "</div>",
            "<div id=\"jgchat-widget-container\" class=\"{theme}\" style=\"display: none;\">",
            "<div class=\"jgchat-widget-header\">",
            "<div class=\"jgchat-widget-title\">{name}</div>",
            "<button class=\"jgchat-widget-minimize\">\u{2715}</button>",
            "</div>",
            "{body}",
            "</div>"
        ),
        theme = theme_class(settings.widget.theme).trim_start(),
        name = escape_html(&settings.chat.name),
        body = render_chat_body(settings)
    ))
}
