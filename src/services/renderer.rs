//! Incremental reveal rendering and the per-session state machine.
//!
//! Incoming assistant text is segmented by triple-backtick fences into
//! alternating prose/code runs. Prose is revealed progressively in
//! fixed-size word chunks with a short inter-chunk delay; code blocks are
//! revealed atomically as a whole with a longer delay, so no chunk ever
//! shows a half-rendered token. The reveal is modeled as an explicit plan
//! of (cumulative content, delay) steps driven by a cooperative player:
//! render a step, suspend for its interval, resume.

use serde_json::{json, Value};

use crate::services::markdown;
use crate::types::chat::{ChatTurn, ChatRole};

/// Words appended per prose reveal step.
pub const PROSE_CHUNK_WORDS: usize = 3;
/// Delay after each prose chunk, in milliseconds.
pub const PROSE_DELAY_MS: u64 = 50;
/// Delay after an atomically revealed code block, in milliseconds.
pub const CODE_DELAY_MS: u64 = 200;

/// One run of an assistant message.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Prose(String),
    /// Fence-delimited content, stored without the backticks.
    Code(String),
}

/// One step of a reveal: the cumulative source text shown so far and how
/// long to suspend after rendering it.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealStep {
    pub content: String,
    pub delay_ms: u64,
}

/// Splits a message into alternating prose/code runs on triple-backtick
/// fences. Even-indexed sections of the split are prose, odd are code.
pub fn segment_message(message: &str) -> Vec<Segment> {
    message
        .split("```")
        .enumerate()
        .map(|(i, section)| {
            if i % 2 == 0 {
                Segment::Prose(section.to_string())
            } else {
                Segment::Code(section.to_string())
            }
        })
        .collect()
}

/// Builds the reveal plan for a message.
///
/// Prose runs are split on single spaces and appended in
/// [`PROSE_CHUNK_WORDS`]-word chunks (each chunk keeps a trailing space,
/// as the original reveal did); each code run is appended in one step with
/// its fences restored. Step contents are cumulative, so chunks for a
/// single message render strictly in source order.
pub fn reveal_plan(message: &str) -> Vec<RevealStep> {
    let mut plan = Vec::new();
    let mut content = String::new();

    for segment in segment_message(message) {
        match segment {
            Segment::Prose(text) => {
                let words: Vec<&str> = text.split(' ').collect();
                for chunk in words.chunks(PROSE_CHUNK_WORDS) {
                    content.push_str(&chunk.join(" "));
                    content.push(' ');
                    plan.push(RevealStep {
                        content: content.clone(),
                        delay_ms: PROSE_DELAY_MS,
                    });
                }
            }
            Segment::Code(code) => {
                content.push_str("```");
                content.push_str(&code);
                content.push_str("```");
                plan.push(RevealStep {
                    content: content.clone(),
                    delay_ms: CODE_DELAY_MS,
                });
            }
        }
    }

    plan
}

/// Drives a reveal plan through a sink.
///
/// For each step the cumulative content is formatted to HTML and handed to
/// `sink`, then `sleeper` is invoked with the step's delay, which is the
/// suspension point. Any cooperative scheduling primitive works as the sleeper
/// (`std::thread::sleep`, a timer wheel, a recording closure in tests).
pub fn play<F, S>(plan: &[RevealStep], mut sink: F, mut sleeper: S)
where
    F: FnMut(&str),
    S: FnMut(u64),
{
    for step in plan {
        sink(&markdown::format_message(&step.content));
        sleeper(step.delay_ms);
    }
}

/// Chat session lifecycle.
///
/// `Sending` and `AwaitingResponse` cover the round-trip to the provider;
/// `Rendering` covers the reveal. All three reject new input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    Idle,
    Sending,
    AwaitingResponse,
    Rendering,
}

/// Per-session chat state: the append-only transcript plus the reveal gate.
///
/// The transcript is replayed in full to the provider on every turn,
/// never windowed.
pub struct ChatSession {
    state: SessionState,
    transcript: Vec<ChatTurn>,
}

impl ChatSession {
    /// Creates a session seeded with the configured welcome message as the
    /// first assistant turn.
    pub fn new(welcome_message: &str) -> Self {
        Self {
            state: SessionState::Idle,
            transcript: vec![ChatTurn::assistant(welcome_message)],
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while a turn is in flight or a reveal is playing; new input is
    /// rejected so overlapping reveals cannot corrupt the message pane.
    pub fn is_busy(&self) -> bool {
        self.state != SessionState::Idle
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Attempts to start a new turn. Returns the prior history to replay to
    /// the provider, or `None` when the message is empty or the session is
    /// busy. On acceptance the user turn is appended and input is gated.
    pub fn begin_send(&mut self, message: &str) -> Option<Vec<ChatTurn>> {
        let message = message.trim();
        if message.is_empty() || self.is_busy() {
            return None;
        }

        let history = self.transcript.clone();
        self.transcript.push(ChatTurn::user(message));
        self.state = SessionState::Sending;
        Some(history)
    }

    /// Marks the request as handed to the transport.
    pub fn request_dispatched(&mut self) {
        if self.state == SessionState::Sending {
            self.state = SessionState::AwaitingResponse;
        }
    }

    /// Records a successful assistant reply and enters the reveal phase.
    pub fn response_received(&mut self, content: &str) {
        self.transcript.push(ChatTurn::assistant(content));
        self.state = SessionState::Rendering;
    }

    /// Appends an inline error message to the transcript and returns to
    /// `Idle`; the failed user turn stays in the transcript.
    pub fn fail(&mut self, error_message: &str) {
        self.transcript.push(ChatTurn::assistant(error_message));
        self.state = SessionState::Idle;
    }

    /// Marks the reveal as finished, re-enabling input.
    pub fn rendering_complete(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Serializes a history slice into the wire shape the orchestrator
    /// replays to the provider.
    pub fn history_to_wire(history: &[ChatTurn]) -> Vec<Value> {
        history
            .iter()
            .map(|turn| {
                let role = match turn.role {
                    ChatRole::User => "user",
                    ChatRole::Assistant => "assistant",
                };
                json!({"role": role, "content": turn.content})
            })
            .collect()
    }
}
