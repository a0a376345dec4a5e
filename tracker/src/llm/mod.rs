//! Inference abstraction layer

mod bedrock;

pub use bedrock::BedrockClient;

use anyhow::Result;
use async_trait::async_trait;

/// Trait for inference backends
///
/// Unlike the collaborator clients, inference failures are fatal to the
/// operation that issued them; implementations return errors rather than
/// degrading silently.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Send one prompt and return the raw response text.
    async fn chat(&self, prompt: &str) -> Result<String>;
}
