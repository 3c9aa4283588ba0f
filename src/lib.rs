//! JGChat — a customizable chatbot backend powered by Claude AI.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod rpc_handler;
pub mod services;
pub mod types;
