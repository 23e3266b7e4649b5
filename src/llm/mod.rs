//! LLM Provider Clients and Abstractions
//!
//! This module provides a unified interface for the generative models used by
//! the legal flows. Provider-specific implementations sit behind [`LLMClient`]
//! so the flows and the image pipeline work with any supported provider.
//!
//! # Supported Providers
//!
//! - Gemini (always built) - text and image generation over REST
//! - Ollama (`ollama` feature) - local text generation
//!
//! # Example
//!
//! ```ignore
//! use ai_attorney::llm::{LLMClientFactory, Provider};
//!
//! let factory = LLMClientFactory::new(config.llm.provider()?);
//! let client = factory.create_default().await?;
//!
//! let response = client.generate("What is an FIR?").await?;
//! println!("{}", response);
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// Gemini REST client.
pub mod gemini;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use client::{LLMClient, LLMClientFactory, MediaResponse, Provider};
