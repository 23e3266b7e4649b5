//! LLM Client abstractions and provider management
//!
//! This module provides a unified interface for the generative models behind
//! the legal flows:
//! - **Gemini**: text and image generation over the REST API (always built)
//! - **Ollama**: local text generation (requires the `ollama` feature)

use crate::types::{AppError, Result};
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction
///
/// All LLM providers implement this trait, allowing the flows to switch
/// providers without changing application code.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Generate an image (plus any accompanying text) from a prompt
    ///
    /// Providers without image output keep the default, which fails.
    async fn generate_media(&self, _prompt: &str) -> Result<MediaResponse> {
        Err(AppError::LLM(format!(
            "Model '{}' does not support image generation",
            self.model_name()
        )))
    }

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Response from an image generation request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaResponse {
    /// The generated media, as a `data:` URI when inline
    pub media_url: Option<String>,
    /// Any text the model produced alongside (or instead of) the media
    pub text: String,
}

/// Provider enum for runtime selection
///
/// | Provider | Text | Images | Notes |
/// |----------|------|--------|-------|
/// | Gemini | ✅ | ✅ | Default, needs an API key |
/// | Ollama | ✅ | ❌ | Needs the `ollama` feature |
#[derive(Debug, Clone)]
pub enum Provider {
    /// Google Gemini over the Generative Language REST API
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Gemini {
    ///     api_key: "AIza...".to_string(),
    ///     api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
    ///     model: "gemini-2.0-flash".to_string(),
    ///     image_model: "gemini-2.0-flash-exp".to_string(),
    ///     timeout_secs: 60,
    /// };
    /// ```
    Gemini {
        api_key: String,
        api_base: String,
        model: String,
        image_model: String,
        timeout_secs: u64,
    },

    /// Ollama local LLM provider
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Ollama {
    ///     base_url: "http://localhost:11434".to_string(),
    ///     model: "llama3.2".to_string(),
    /// };
    /// ```
    Ollama { base_url: String, model: String },
}

impl Provider {
    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The provider was not compiled in (Ollama without the `ollama` feature)
    /// - The HTTP client cannot be built
    pub async fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            Provider::Gemini {
                api_key,
                api_base,
                model,
                image_model,
                timeout_secs,
            } => Ok(Box::new(super::gemini::GeminiClient::new(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                image_model.clone(),
                *timeout_secs,
            )?)),

            #[cfg(feature = "ollama")]
            Provider::Ollama { base_url, model } => Ok(Box::new(
                super::ollama::OllamaClient::new(base_url.clone(), model.clone()).await?,
            )),

            #[cfg(not(feature = "ollama"))]
            Provider::Ollama { model, .. } => Err(AppError::LLM(format!(
                "Ollama provider requested for model '{}' but this build lacks the \
                 'ollama' feature. Rebuild with --features ollama or use Gemini.",
                model
            ))),
        }
    }

    /// Whether the provider can produce images
    pub fn supports_images(&self) -> bool {
        matches!(self, Provider::Gemini { .. })
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini { .. } => "Gemini",
            Provider::Ollama { .. } => "Ollama",
        }
    }
}

/// Configuration-based client factory
///
/// # Example
///
/// ```rust,ignore
/// use ai_attorney::llm::{LLMClientFactory, Provider};
///
/// let factory = LLMClientFactory::new(provider);
/// let client = factory.create_default().await?;
/// ```
pub struct LLMClientFactory {
    default_provider: Provider,
}

impl LLMClientFactory {
    /// Create a new factory with the specified default provider
    pub fn new(default_provider: Provider) -> Self {
        Self { default_provider }
    }

    /// Create a client using the default provider
    pub async fn create_default(&self) -> Result<Box<dyn LLMClient>> {
        self.default_provider.create_client().await
    }

    /// Get a reference to the default provider
    pub fn default_provider(&self) -> &Provider {
        &self.default_provider
    }
}
