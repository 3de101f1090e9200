#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use flightbot_config::Config;
use flightbot_core::{Outbound, TurnInput};
use flightbot_state::MemoryStore;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "flightbot")]
#[command(about = "Flight reservation dialog bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive reservation conversation
    Chat {
        /// Conversation id to resume (a new one is generated otherwise)
        #[arg(short = 'c', long)]
        conversation: Option<String>,
    },
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat { conversation } => {
            let config = Config::load_or_default();

            let level: Level = config.logging.level.parse().unwrap_or(Level::INFO);
            let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
            tracing::subscriber::set_global_default(subscriber)?;

            run_chat(&config, conversation).await?;
        }
        Commands::Init => {
            Config::create_config()?;
        }
        Commands::Version => {
            println!("flightbot {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Console transport adapter: one line in, one turn through the router.
async fn run_chat(config: &Config, conversation: Option<String>) -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let router = flightbot_flows::router(store)?;

    let conversation_id = conversation.unwrap_or_else(|| Uuid::now_v7().to_string());
    info!("Starting conversation: {conversation_id}");

    println!("=== {} ===", config.bot.name);
    println!("Type 'exit' to end the conversation.\n");

    let output = router
        .process_turn(TurnInput::started(&conversation_id))
        .await?;
    print_messages(&output.messages);

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let output = router
            .process_turn(TurnInput::message(&conversation_id, input))
            .await?;
        print_messages(&output.messages);

        if input.eq_ignore_ascii_case("exit") {
            break;
        }
    }

    Ok(())
}

fn print_messages(messages: &[Outbound]) {
    for message in messages {
        match message {
            Outbound::Text(text) => println!("{text}\n"),
            Outbound::Card(card) => println!("{card}"),
        }
    }
}
