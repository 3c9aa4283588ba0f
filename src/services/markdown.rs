//! Markdown formatting for assistant messages.
//!
//! Converts a GitHub-flavored subset of markdown to HTML: fenced code
//! blocks (with an optional language tag on the first line), headings,
//! bold/italic/inline code, explicit and bare links, bullet lists, and
//! single-newline-as-linebreak semantics. Every generated link carries
//! `target="_blank" rel="noopener noreferrer"`.

use std::sync::OnceLock;

use regex::Regex;

fn inline_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"`([^`]+)`").unwrap())
}

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap())
}

fn italic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*([^*]+)\*").unwrap())
}

fn md_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").unwrap())
}

fn bare_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Guard group: only match at start of text or after whitespace/'(' so
    // URLs already inside generated anchors are left alone.
    RE.get_or_init(|| Regex::new(r#"(^|[\s(])((?:https?://|www\.)[^\s<]+)"#).unwrap())
}

/// Escapes `&`, `<`, and `>` for safe embedding in element content.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escapes a string for use inside a double-quoted HTML attribute.
pub fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

/// Converts an assistant message to HTML.
///
/// The message is split on triple-backtick fences into alternating
/// prose/code sections; prose gets the markdown subset, code blocks are
/// emitted whole inside `<pre><code>`.
pub fn format_message(message: &str) -> String {
    let mut html = String::new();
    for (i, section) in message.split("```").enumerate() {
        if i % 2 == 0 {
            html.push_str(&render_prose(section));
        } else {
            html.push_str(&render_code_block(section));
        }
    }
    html
}

/// Renders a fenced code section. A non-empty, space-free first line is
/// treated as the language tag, matching the ```` ```lang ```` convention;
/// a fence immediately followed by a newline has no tag.
fn render_code_block(raw: &str) -> String {
    let (language, body) = match raw.split_once('\n') {
        Some((first, rest)) if !first.trim().is_empty() && !first.trim().contains(' ') => {
            (first.trim(), rest.trim())
        }
        _ => ("", raw.trim()),
    };

    format!(
        "<pre><code class=\"language-{}\">{}</code></pre>",
        escape_attr(language),
        escape_html(body)
    )
}

/// Renders a prose section: blank-line-separated blocks become headings,
/// bullet lists, or paragraphs with `<br>` on single newlines.
fn render_prose(text: &str) -> String {
    let mut html = String::new();
    for block in text.split("\n\n") {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }

        if block.lines().all(|l| l.trim_start().starts_with("- ")) {
            html.push_str("<ul>");
            for line in block.lines() {
                let item = line.trim_start().trim_start_matches("- ");
                html.push_str(&format!("<li>{}</li>", render_inline(item)));
            }
            html.push_str("</ul>");
        } else if let Some(heading) = render_heading(block) {
            html.push_str(&heading);
        } else {
            // Single newline inside a paragraph becomes a line break
            let lines: Vec<String> = block.lines().map(render_inline).collect();
            html.push_str(&format!("<p>{}</p>", lines.join("<br>")));
        }
    }
    html
}

fn render_heading(block: &str) -> Option<String> {
    for (prefix, tag) in [("### ", "h3"), ("## ", "h2"), ("# ", "h1")] {
        if let Some(rest) = block.strip_prefix(prefix) {
            if !rest.contains('\n') {
                return Some(format!("<{}>{}</{}>", tag, render_inline(rest), tag));
            }
        }
    }
    None
}

/// Applies inline markup to one line of already-plain text.
fn render_inline(line: &str) -> String {
    let escaped = escape_html(line.trim_end());

    let with_code = inline_code_re().replace_all(&escaped, "<code>$1</code>");
    let with_bold = bold_re().replace_all(&with_code, "<strong>$1</strong>");
    let with_italic = italic_re().replace_all(&with_bold, "<em>$1</em>");

    let with_links = md_link_re().replace_all(&with_italic, |caps: &regex::Captures| {
        format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            &caps[2], &caps[1]
        )
    });

    bare_url_re()
        .replace_all(&with_links, |caps: &regex::Captures| {
            let url = &caps[2];
            let href = if url.starts_with("www.") {
                format!("https://{}", url)
            } else {
                url.to_string()
            };
            format!(
                "{}<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                &caps[1], href, url
            )
        })
        .into_owned()
}
