//! Mock implementations for testing.
//!
//! This module provides mock LLM clients and image generators that can be
//! used across different test files without duplication.

use ai_attorney::imaging::ImageGenerator;
use ai_attorney::llm::{LLMClient, MediaResponse};
use ai_attorney::types::{AppError, GeneratedImage, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Mock LLM client with configurable responses.
///
/// Records every `(system, prompt)` pair it receives so tests can assert on
/// what the flows sent.
pub struct MockLLMClient {
    response: String,
    media_url: Option<String>,
    should_fail: bool,
    pub prompts: Mutex<Vec<(Option<String>, String)>>,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given text response.
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            media_url: None,
            should_fail: false,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock client whose media calls return `url`.
    pub fn with_media(url: &str, text: &str) -> Self {
        Self {
            media_url: Some(url.to_string()),
            ..Self::new(text)
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new("")
        }
    }

    fn record(&self, system: Option<&str>, prompt: &str) -> Result<()> {
        self.prompts
            .lock()
            .push((system.map(str::to_string), prompt.to_string()));
        if self.should_fail {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.record(None, prompt)?;
        Ok(self.response.clone())
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.record(Some(system), prompt)?;
        Ok(self.response.clone())
    }

    async fn generate_media(&self, prompt: &str) -> Result<MediaResponse> {
        self.record(None, prompt)?;
        Ok(MediaResponse {
            media_url: self.media_url.clone(),
            text: self.response.clone(),
        })
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Outcome a [`GatedImageGenerator`] call settles with.
pub type Scripted = std::result::Result<GeneratedImage, String>;

/// Image generator whose calls stay pending until the test releases them.
///
/// Register a prompt with [`expect`](Self::expect) and keep the returned
/// sender; the matching `generate` call settles when the sender fires.
/// Unregistered prompts fail immediately.
#[derive(Default)]
pub struct GatedImageGenerator {
    gates: Mutex<HashMap<String, oneshot::Receiver<Scripted>>>,
    calls: AtomicUsize,
}

impl GatedImageGenerator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Hold the call for `prompt` until the returned sender is used.
    pub fn expect(&self, prompt: &str) -> oneshot::Sender<Scripted> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(prompt.to_string(), rx);
        tx
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for GatedImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().remove(prompt);
        let Some(gate) = gate else {
            return Err(AppError::LLM(format!("unexpected prompt '{}'", prompt)));
        };

        match gate.await {
            Ok(Ok(image)) => Ok(image),
            Ok(Err(message)) => Err(AppError::LLM(message)),
            Err(_) => Err(AppError::Internal("gate dropped".to_string())),
        }
    }
}

/// A successful image result.
pub fn image(url: &str) -> Scripted {
    Ok(GeneratedImage {
        url: url.to_string(),
        error: None,
    })
}
