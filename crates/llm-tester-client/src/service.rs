//! Abstraction over the generation endpoint used by the test runner

use async_trait::async_trait;

use crate::{
    models::{GenerationParams, GenerationResult},
    Result,
};

/// Anything that can turn a prompt into a completed generation.
///
/// [`crate::OllamaClient`] is the production implementation; test code
/// substitutes scripted services.
#[async_trait]
pub trait ModelService: Send + Sync {
    async fn generate_response(
        &self,
        model: &str,
        prompt: &str,
        params: Option<&GenerationParams>,
    ) -> Result<GenerationResult>;
}
