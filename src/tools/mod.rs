//! Tool system.
//!
//! Tools are the assistant's interface to the reservation domain: catalog
//! lookups, availability checks, recommendations, and the reservation
//! lifecycle. All of them are JSON-in, JSON-out so the model can call them
//! via function calling.

pub mod builtin;

mod registry;
mod tool;

pub use registry::ToolRegistry;
pub use tool::{Tool, ToolError, ToolOutput, ToolSchema};
