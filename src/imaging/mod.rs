//! Per-instance AI image acquisition
//!
//! An [`ImageAcquirer`] belongs to one visual element (a lawyer portrait, a
//! dashboard illustration). Each time its prompt changes it issues exactly one
//! generation call and normalizes the outcome into an [`ImageState`] that is
//! always displayable.
//!
//! Late completions are discarded: every request captures a token, and a
//! settling call may only publish if the instance is still alive and no newer
//! request has been issued since. The in-flight call itself is not cancelled.

use crate::types::{GeneratedImage, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Message used when the collaborator returns neither an image nor an error.
pub const EMPTY_IMAGE_MESSAGE: &str = "Image data URI was empty.";

/// Base URL of the generic placeholder service.
pub const PLACEHOLDER_BASE: &str = "https://placehold.co";

/// Asynchronously produces an image for a prompt.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage>;
}

/// Displayable state of one acquirer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
    Idle,
    Loading,
    Resolved(String),
    Fallback { url: String, error: Option<String> },
}

impl ImageState {
    /// URL to display, `None` while idle or loading.
    pub fn url(&self) -> Option<&str> {
        match self {
            ImageState::Resolved(url) | ImageState::Fallback { url, .. } => Some(url),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ImageState::Fallback { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, ImageState::Resolved(_) | ImageState::Fallback { .. })
    }
}

/// Placeholder image sized `width` x `height`.
pub fn placeholder_url(width: u32, height: u32) -> String {
    labelled_placeholder(width, height, "Image")
}

/// Placeholder image with a caption. `label` must already be URL-safe.
pub fn labelled_placeholder(width: u32, height: u32, label: &str) -> String {
    format!("{}/{}x{}.png?text={}", PLACEHOLDER_BASE, width, height, label)
}

/// One image request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    pub fallback_url: Option<String>,
}

struct Liveness {
    token: u64,
    alive: bool,
}

struct Shared {
    liveness: Mutex<Liveness>,
    state: watch::Sender<ImageState>,
}

impl Shared {
    /// Publish `state` if `token` is still the current request.
    fn publish(&self, token: u64, state: ImageState) -> bool {
        let liveness = self.liveness.lock();
        if !liveness.alive || liveness.token != token {
            return false;
        }
        self.state.send_replace(state);
        true
    }
}

/// Image state machine for one visual element.
pub struct ImageAcquirer {
    generator: Arc<dyn ImageGenerator>,
    shared: Arc<Shared>,
    width: u32,
    height: u32,
    fallback_url: Option<String>,
}

impl ImageAcquirer {
    pub fn new(generator: Arc<dyn ImageGenerator>, width: u32, height: u32) -> Self {
        let (state, _) = watch::channel(ImageState::Idle);
        Self {
            generator,
            shared: Arc::new(Shared {
                liveness: Mutex::new(Liveness {
                    token: 0,
                    alive: true,
                }),
                state,
            }),
            width,
            height,
            fallback_url: None,
        }
    }

    /// Use `url` instead of the generic placeholder on failure.
    pub fn with_fallback(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.fallback_url = if url.is_empty() { None } else { Some(url) };
        self
    }

    /// Explicit fallback if set, otherwise a sized placeholder.
    pub fn effective_fallback(&self) -> String {
        self.fallback_url
            .clone()
            .unwrap_or_else(|| placeholder_url(self.width, self.height))
    }

    pub fn state(&self) -> ImageState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ImageState> {
        self.shared.state.subscribe()
    }

    pub fn is_alive(&self) -> bool {
        self.shared.liveness.lock().alive
    }

    /// Start acquiring an image for `prompt`, superseding any earlier request.
    ///
    /// An empty prompt settles immediately on the fallback without calling the
    /// generator and returns `None`. Otherwise the call runs on a spawned task
    /// whose handle is returned.
    pub fn request(&self, prompt: &str) -> Option<JoinHandle<()>> {
        let fallback = self.effective_fallback();

        let token = {
            let mut liveness = self.shared.liveness.lock();
            if !liveness.alive {
                debug!("Ignoring image request on torn down acquirer");
                return None;
            }
            liveness.token += 1;
            liveness.token
        };

        if prompt.is_empty() {
            self.shared.publish(
                token,
                ImageState::Fallback {
                    url: fallback,
                    error: None,
                },
            );
            return None;
        }

        self.shared.publish(token, ImageState::Loading);

        let generator = Arc::clone(&self.generator);
        let shared = Arc::clone(&self.shared);
        let prompt = prompt.to_string();

        Some(tokio::spawn(async move {
            let outcome = generator.generate(&prompt).await;
            let state = normalize(outcome, fallback);
            if let ImageState::Fallback {
                error: Some(ref error),
                ..
            } = state
            {
                warn!(prompt = %prompt, "Failed to generate AI image: {}", error);
            }
            if !shared.publish(token, state) {
                debug!(prompt = %prompt, token, "Discarded stale image result");
            }
        }))
    }

    /// Apply a full [`ImageRequest`], replacing the fallback URL.
    pub fn request_with(&mut self, request: ImageRequest) -> Option<JoinHandle<()>> {
        self.fallback_url = request.fallback_url.filter(|url| !url.is_empty());
        self.request(&request.prompt)
    }

    /// Detach the instance; pending calls will no longer touch its state.
    pub fn teardown(&self) {
        let mut liveness = self.shared.liveness.lock();
        liveness.alive = false;
        liveness.token += 1;
    }
}

impl Drop for ImageAcquirer {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn normalize(outcome: Result<GeneratedImage>, fallback: String) -> ImageState {
    match outcome {
        Ok(GeneratedImage {
            error: Some(error), ..
        }) => ImageState::Fallback {
            url: fallback,
            error: Some(error),
        },
        Ok(GeneratedImage { url, error: None }) if !url.is_empty() => ImageState::Resolved(url),
        Ok(_) => ImageState::Fallback {
            url: fallback,
            error: Some(EMPTY_IMAGE_MESSAGE.to_string()),
        },
        Err(e) => ImageState::Fallback {
            url: fallback,
            error: Some(e.to_string()),
        },
    }
}
