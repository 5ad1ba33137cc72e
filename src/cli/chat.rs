//! Interactive chat REPL.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::agent::{system_prompt, Orchestrator};
use crate::config::Config;
use crate::llm::GroqProvider;
use crate::resolver::RestaurantResolver;
use crate::store::Datastore;
use crate::tools::ToolRegistry;

const BANNER: &str = "\
TableHop reservation assistant. Ask about restaurants or book a table.
Commands: /debug toggles tool-call output, /reset starts a new conversation, /quit exits.";

/// Run the interactive chat loop until EOF or `/quit`.
pub async fn run_chat(config: Config) -> anyhow::Result<()> {
    let store = Arc::new(Datastore::new(
        config.data.restaurants_file.clone(),
        config.data.reservations_file.clone(),
    ));

    let restaurants = store
        .load_restaurants()
        .context("failed to load the restaurant file; run `tablehop seed` to create one")?;
    tracing::info!(count = restaurants.len(), "restaurant data loaded");

    let resolver = RestaurantResolver::new(&restaurants);
    let registry = ToolRegistry::builtin(store);
    let provider = Arc::new(GroqProvider::new(config.llm)?);
    let mut orchestrator = Orchestrator::new(provider, registry, resolver, system_prompt());

    let mut editor = DefaultEditor::new()?;
    let history_path = history_file();
    if let Some(path) = &history_path {
        let _ = editor.load_history(path);
    }

    println!("{BANNER}");
    let mut debug = false;

    loop {
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(input);

        match input {
            "/quit" | "/exit" => break,
            "/reset" => {
                orchestrator.reset();
                println!("Conversation reset.");
                continue;
            }
            "/debug" => {
                debug = !debug;
                println!("Debug output {}.", if debug { "on" } else { "off" });
                continue;
            }
            _ => {}
        }

        let outcome = orchestrator.handle_turn(input).await;

        if debug {
            for trace in &outcome.tool_traces {
                println!("[tool] {}", trace.name);
                println!("  args:   {}", trace.arguments);
                println!("  result: {}", trace.result);
            }
        }

        println!("\n{}\n", outcome.reply);
    }

    if let Some(path) = &history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = editor.save_history(path);
    }

    Ok(())
}

fn history_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tablehop").join("history.txt"))
}
