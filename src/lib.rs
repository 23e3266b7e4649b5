//! # AI-Attorney
//!
//! Session gating, route guarding and AI image acquisition for an AI legal
//! assistant, plus the Gemini-backed legal flows and lawyer directory that sit
//! behind them.
//!
//! ## Overview
//!
//! AI-Attorney can be used in two ways:
//!
//! 1. **As a CLI** - Run the `ai-attorney` binary; every command opens one page
//!    of the application through the same session and route guard a UI would
//! 2. **As a library** - Drive [`SessionGate`], [`RouteGuard`] and
//!    [`ImageAcquirer`] from your own renderer
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use ai_attorney::guard::{PublicPaths, RouteDecision, RouteGuard};
//! use ai_attorney::session::{MemoryStore, SessionGate};
//! use ai_attorney::shell::{Navigation, NotificationLog};
//! use std::sync::Arc;
//!
//! let nav = Arc::new(Navigation::new("/legal-guidance"));
//! let toasts = Arc::new(NotificationLog::new());
//! let gate = Arc::new(SessionGate::new(
//!     Arc::new(MemoryStore::new()),
//!     nav.clone(),
//!     toasts.clone(),
//! ));
//!
//! let guard = RouteGuard::new(PublicPaths::default(), nav.clone());
//! let (decisions, _task) = guard.spawn(gate.subscribe(), nav.subscribe());
//!
//! gate.activate();
//! // The guard redirects to /login and settles on ShowPublicContent
//! ```
//!
//! ### Images
//!
//! ```rust,ignore
//! use ai_attorney::flows::ImageFlow;
//! use ai_attorney::imaging::ImageAcquirer;
//!
//! let acquirer = ImageAcquirer::new(Arc::new(ImageFlow::new(client)), 400, 300);
//! if let Some(task) = acquirer.request("a courtroom at dawn") {
//!     task.await?;
//! }
//! println!("{:?}", acquirer.state());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local text generation |
//!
//! ## Modules
//!
//! - [`session`] - Demo login, logout and registration over a key-value store
//! - [`guard`] - Route decisions and redirect side effects
//! - [`imaging`] - Per-element image acquisition with stale result discard
//! - [`shell`] - Navigation and notification seams, navigation shell
//! - [`llm`] - LLM client implementations
//! - [`flows`] - Legal guidance, summaries, next steps and image generation
//! - [`lawyers`] - Static lawyer directory
//! - [`types`] - Common types and error handling

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Command-line interface.
pub mod cli;
/// Prompted legal flows and image generation.
pub mod flows;
/// Route guard.
pub mod guard;
/// AI image acquisition.
pub mod imaging;
/// Lawyer directory.
pub mod lawyers;
/// LLM provider clients and abstractions.
pub mod llm;
/// Session gate and storage.
pub mod session;
/// Navigation, notifications and the app shell.
pub mod shell;
/// Core types and errors.
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use guard::{decide, PublicPaths, RouteDecision, RouteGuard};
pub use imaging::{ImageAcquirer, ImageGenerator, ImageState};
pub use llm::{LLMClient, LLMClientFactory, Provider};
pub use session::{KeyValueStore, SessionGate};
pub use shell::{Navigator, Notifier};
pub use types::{AppError, Result, SessionStatus};
pub use utils::{AttorneyConfig, ConfigError};
