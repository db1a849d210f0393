//! The `TextModel` trait -- the adapter interface for generative models.
//!
//! The pipeline only needs "prompt in, free text out"; everything about
//! the concrete provider lives behind this seam. The trait is
//! intentionally object-safe so handlers can hold `Arc<dyn TextModel>`
//! and tests can substitute a scripted implementation.

mod gemini;

pub use gemini::{GeminiClient, ModelConfig};

use async_trait::async_trait;

use crate::error::Error;

/// Adapter interface for a generative text model.
///
/// Implementations send the prompt to their provider and return the raw
/// completion text. Transport or provider failures map to
/// [`Error::Upstream`]; no retries happen at this layer.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Human-readable name for this model (e.g. "gemini-2.5-flash").
    fn name(&self) -> &str;

    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String, Error>;
}

// Compile-time assertion: TextModel must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn TextModel) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoModel;

    #[async_trait]
    impl TextModel for EchoModel {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str) -> Result<String, Error> {
            Ok(prompt.to_string())
        }
    }

    #[tokio::test]
    async fn trait_is_object_safe_and_usable() {
        let model: Box<dyn TextModel> = Box::new(EchoModel);
        assert_eq!(model.name(), "echo");
        let reply = model.generate("hello").await.unwrap();
        assert_eq!(reply, "hello");
    }
}
