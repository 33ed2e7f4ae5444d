pub(crate) mod api;
pub(crate) mod custom;
pub(crate) mod embedding_model;
pub(crate) mod language_model;

pub use api::{APIModel, APIProvider};
pub use custom::{CustomEmbeddingModel, CustomLangModel, EmbeddingFunc, LangModelFunc};
pub use embedding_model::{EmbeddingModel, EmbeddingModelInference};
pub use language_model::{InferenceConfig, LangModel, LangModelInference};
