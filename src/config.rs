use std::path::PathBuf;

use anyhow::Context as _;

use crate::constants::{
    DEFAULT_EMBEDDING_MODEL, DEFAULT_INDEX_PATH, DEFAULT_LLM_MODEL, DEFAULT_REGISTRATION_PATH,
};

/// Runtime configuration, resolved from the environment (a `.env` file is
/// honored when present).
#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub llm_model: String,
    pub embedding_model: String,
    pub index_path: PathBuf,
    pub registration_path: PathBuf,
}

impl Config {
    /// Reads configuration from the environment. `GEMINI_API_KEY` is
    /// required; everything else falls back to defaults:
    ///
    /// - `AULA_LLM_MODEL` (default `gemini-2.5-flash`)
    /// - `AULA_EMBEDDING_MODEL` (default `embedding-001`)
    /// - `AULA_INDEX_PATH` (default `data/index.json`)
    /// - `AULA_REGISTRATION_PATH` (default `data/registrations.json`)
    pub fn from_env() -> anyhow::Result<Self> {
        // Missing .env is fine; the variables may come from the shell.
        let _ = dotenvy::dotenv();

        let api_key = std::env::var("GEMINI_API_KEY")
            .context("GEMINI_API_KEY is not set (put it in the environment or a .env file)")?;

        Ok(Self {
            api_key,
            llm_model: env_or("AULA_LLM_MODEL", DEFAULT_LLM_MODEL),
            embedding_model: env_or("AULA_EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            index_path: env_or("AULA_INDEX_PATH", DEFAULT_INDEX_PATH).into(),
            registration_path: env_or("AULA_REGISTRATION_PATH", DEFAULT_REGISTRATION_PATH).into(),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
