//! Model service client for LLM Tester
//!
//! This crate talks to an Ollama-compatible model-serving endpoint. It handles
//! connecting, model listing and prompt generation, and folds the
//! newline-delimited JSON generation stream into a single [`GenerationResult`].

pub mod client;
pub mod error;
pub mod models;
pub mod service;
pub mod stream;

pub use client::{ClientDiagnostics, OllamaClient};
pub use error::ClientError;
pub use models::{GenerationParams, GenerationResult, ModelInfo};
pub use service::ModelService;
pub use stream::{LineBuffer, StreamAccumulator};

/// Result type for model service operations
pub type Result<T> = std::result::Result<T, ClientError>;
