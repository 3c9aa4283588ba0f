// JGChat shared type definitions
// Each submodule defines types used across the service.

pub mod chat;
pub mod errors;
pub mod log;
pub mod model;
pub mod settings;
