//! Command-line interface: the chat REPL and the seed-data generator.

mod chat;
mod seed;

pub use chat::run_chat;
pub use seed::{generate_restaurants, run_seed, SeedArgs};
