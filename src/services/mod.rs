// JGChat services
// Services provide core functionality: settings, model catalog, chat
// orchestration, session tokens, markdown formatting, reveal rendering,
// and the embeddable chat views.

pub mod chat_orchestrator;
pub mod chat_view;
pub mod markdown;
pub mod model_catalog;
pub mod renderer;
pub mod session_tokens;
pub mod settings_engine;
