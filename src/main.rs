use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tablehop::cli::{run_chat, run_seed, SeedArgs};
use tablehop::config::Config;

#[derive(Parser, Debug)]
#[command(name = "tablehop", about = "LLM-driven restaurant reservation assistant", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive chat assistant (default)
    Chat,
    /// Generate a randomized restaurant data file
    Seed(SeedArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tablehop=info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => {
            let config = Config::from_env()?;
            run_chat(config).await
        }
        Command::Seed(args) => run_seed(args),
    }
}
