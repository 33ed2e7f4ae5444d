//! Terminal front end: an interactive chat loop and a one-shot ingest
//! command.

use std::{io::Write as _, path::PathBuf};

use anyhow::Context as _;
use uuid::Uuid;

use crate::{
    agent::Agent,
    config::Config,
    ingestion::Ingestor,
    knowledge::{KnowledgeConfig, KnowledgeTool, VectorStoreKnowledge},
    model::{EmbeddingModel, LangModel},
    registration::{RegistrationStore, RegistrationTool},
    tool::Tool,
    vector_store::VectorStore,
};

/// Wires a fully-equipped admissions agent from configuration: Gemini
/// models, the local vector index, and both tools.
pub async fn build_agent(config: &Config) -> anyhow::Result<Agent> {
    let store = VectorStore::open_local(&config.index_path).await?;
    if store.count().await? == 0 {
        log::warn!(
            "index at {} is empty, run `aula ingest` first for document-grounded answers",
            config.index_path.display()
        );
    }

    let embedding_model = EmbeddingModel::new_gemini(&config.embedding_model, &config.api_key);
    let knowledge = VectorStoreKnowledge::new(embedding_model, store);

    let mut agent = Agent::new(LangModel::new_gemini(&config.llm_model, &config.api_key));
    agent.add_tool(Tool::new_knowledge(KnowledgeTool::new(
        knowledge,
        KnowledgeConfig::default(),
    )));
    agent.add_tool(Tool::new_registration(RegistrationTool::new(
        RegistrationStore::new(&config.registration_path),
    )));
    Ok(agent)
}

/// Reads user turns from stdin until EOF or a quit command. A failed turn
/// is reported and the loop continues; the thread keeps its history.
pub async fn run_chat(config: &Config, thread_id: Option<String>) -> anyhow::Result<()> {
    let mut agent = build_agent(config).await?;
    let thread_id = thread_id.unwrap_or_else(|| Uuid::new_v4().to_string());

    println!("Admissions assistant ready. Type 'quit' or 'exit' to leave.");
    let stdin = std::io::stdin();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        match agent.send(&thread_id, line).await {
            Ok(reply) => println!("assistant> {reply}"),
            Err(e) => {
                log::error!("turn failed: {e:#}");
                println!("assistant> Something went wrong, please try again.");
            }
        }
    }
    Ok(())
}

/// Ingests the given PDF files (or, for directories, the PDFs directly
/// inside them) into the index.
pub async fn run_ingest(config: &Config, paths: Vec<PathBuf>) -> anyhow::Result<()> {
    anyhow::ensure!(!paths.is_empty(), "no paths given");

    let store = VectorStore::open_local(&config.index_path).await?;
    let embedding_model = EmbeddingModel::new_gemini(&config.embedding_model, &config.api_key);
    let mut ingestor = Ingestor::new(embedding_model, store);

    for path in paths {
        let meta = tokio::fs::metadata(&path)
            .await
            .with_context(|| format!("cannot access {}", path.display()))?;
        let reports = if meta.is_dir() {
            ingestor.ingest_dir(&path).await?
        } else {
            vec![ingestor.ingest_file(&path).await?]
        };
        for report in reports {
            println!(
                "{}: {} pages, {} chunks",
                report.file, report.pages, report.chunks
            );
        }
    }
    Ok(())
}
