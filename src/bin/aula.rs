use std::path::PathBuf;

use clap::{Parser, Subcommand};

use aula::{cli, config::Config};

#[derive(Parser)]
#[command(name = "aula", version, about = "Admissions assistant over your school's documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chat with the assistant on the terminal
    Chat {
        /// Conversation thread to resume (a fresh one is created by default)
        #[arg(long)]
        thread: Option<String>,
    },
    /// Index PDF files or directories of PDFs
    Ingest {
        /// Files or directories to ingest
        paths: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Chat { thread } => cli::run_chat(&config, thread).await,
        Command::Ingest { paths } => cli::run_ingest(&config, paths).await,
    }
}
