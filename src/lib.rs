//! TableHop: an LLM-driven restaurant reservation assistant.
//!
//! The crate wires a Groq chat-completions provider to a set of restaurant
//! tools over JSON-file-backed stores. The [`agent::Orchestrator`] runs the
//! per-turn tool-calling loop; everything below it is plain typed Rust.

pub mod agent;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod llm;
pub mod ops;
pub mod resolver;
pub mod store;
pub mod tools;
