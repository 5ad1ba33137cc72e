//! The conversation agent: system prompt and turn orchestration.

mod orchestrator;
mod prompt;

pub use orchestrator::{Orchestrator, ToolTrace, TurnOutcome};
pub use prompt::system_prompt;
