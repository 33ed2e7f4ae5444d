pub mod agent;
pub mod cli;
pub mod config;
pub(crate) mod constants;
pub mod ingestion;
pub mod knowledge;
pub mod model;
pub mod registration;
pub mod tool;
pub(crate) mod utils;
pub mod value;
pub mod vector_store;
