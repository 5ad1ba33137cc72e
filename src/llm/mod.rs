//! LLM integration.
//!
//! The assistant talks to Groq's OpenAI-compatible chat completions API.
//! `provider` holds the neutral types and trait, `groq` the concrete client,
//! and `retry` the key-rotation and backoff policy.

mod groq;
mod provider;
mod retry;

pub use groq::GroqProvider;
pub use provider::{
    ChatMessage, CompletionRequest, CompletionResponse, LlmProvider, Role, ToolCall,
    ToolDefinition,
};
pub use retry::{RetryAction, RetryState};
