//! Legal assistance flows on top of an [`LLMClient`]
//!
//! Each flow wraps a fixed prompt, asks the model for a JSON object and parses
//! it into a typed result:
//!
//! - [`LegalFlows::provide_legal_guidance`]: advice plus relevant IPC sections
//! - [`LegalFlows::summarize_legal_document`]: summary plus suggested steps
//! - [`LegalFlows::suggest_next_steps`]: a list of follow-up actions
//!
//! [`ImageFlow`] is the server side of image generation. It never fails: a
//! provider error or a response without media becomes a placeholder URL with
//! an error message, which [`ImageAcquirer`](crate::imaging::ImageAcquirer)
//! then turns into its own fallback.

use crate::imaging::{labelled_placeholder, ImageGenerator};
use crate::llm::{LLMClient, MediaResponse};
use crate::types::{
    AppError, DocumentSummary, GeneratedImage, LegalGuidance, NextSteps, Result,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{error, info, instrument};

const GUIDANCE_SYSTEM: &str = "You are an AI legal assistant specializing in Indian law. \
A user describes their situation and you give legal advice for it. Identify the sections \
of the Indian Penal Code (IPC) that apply. Decide, based on legal precedents, whether the \
advice should incorporate specific details of the situation.";

const SUMMARY_SYSTEM: &str =
    "You are an AI legal assistant. Summarize legal documents and suggest subsequent steps.";

const NEXT_STEPS_SYSTEM: &str = "You are an AI legal assistant helping a user decide what to \
do after reading a legal document summary.";

/// Turn a free-form visual description into the image model's prompt.
pub fn image_prompt(description: &str) -> String {
    format!(
        "Generate a high-quality, visually appealing image based on the following \
         description: \"{}\". The image should be suitable for a professional application.",
        description
    )
}

/// Typed legal flows over one LLM client.
#[derive(Clone)]
pub struct LegalFlows {
    client: Arc<dyn LLMClient>,
}

impl LegalFlows {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// Advice and IPC sections for a described situation.
    #[instrument(skip_all)]
    pub async fn provide_legal_guidance(&self, situation: &str) -> Result<LegalGuidance> {
        let situation = require_text(situation, "Situation description")?;
        let prompt = format!(
            "Situation Description: {}\n\n\
             Respond with only a JSON object of the form \
             {{\"legalAdvice\": string, \"ipcSections\": [string], \"shouldIncorporateDetails\": boolean}}.",
            situation
        );

        let guidance: LegalGuidance = self.ask(GUIDANCE_SYSTEM, &prompt).await?;
        info!(sections = guidance.ipc_sections.len(), "Legal guidance generated");
        Ok(guidance)
    }

    /// Summary and suggested steps for a document's text.
    #[instrument(skip_all, fields(chars = document.len()))]
    pub async fn summarize_legal_document(&self, document: &str) -> Result<DocumentSummary> {
        let document = require_text(document, "Document text")?;
        let prompt = format!(
            "Document:\n{}\n\n\
             Respond with only a JSON object of the form \
             {{\"summary\": string, \"suggestedSteps\": string}}.",
            document
        );

        self.ask(SUMMARY_SYSTEM, &prompt).await
    }

    /// Possible next steps after reading a summary.
    #[instrument(skip_all)]
    pub async fn suggest_next_steps(&self, summary: &str) -> Result<NextSteps> {
        let summary = require_text(summary, "Document summary")?;
        let prompt = format!(
            "Based on the following summary of a legal document, suggest potential next steps \
             the user should consider.\n\nSummary: {}\n\n\
             Consider legal action, further investigation, seeking advice, gathering evidence \
             or any other relevant actions, and be as specific as possible. \
             Respond with only a JSON object of the form {{\"suggestedNextSteps\": [string]}}.",
            summary
        );

        self.ask(NEXT_STEPS_SYSTEM, &prompt).await
    }

    async fn ask<T: DeserializeOwned>(&self, system: &str, prompt: &str) -> Result<T> {
        let raw = self.client.generate_with_system(system, prompt).await?;
        parse_json_reply(&raw)
    }
}

fn require_text<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{} cannot be empty", what)));
    }
    Ok(trimmed)
}

/// Parse a model reply that should be a JSON object.
///
/// Tolerates Markdown code fences and prose around the object.
pub fn parse_json_reply<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let mut body = raw.trim();

    if let Some(rest) = body.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        body = rest.trim_end().trim_end_matches("```").trim();
    }

    if let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) {
        if start < end {
            body = &body[start..=end];
        }
    }

    serde_json::from_str(body)
        .map_err(|e| AppError::LLM(format!("Model returned malformed JSON: {}", e)))
}

/// Image generation through an LLM client's media output.
pub struct ImageFlow {
    client: Arc<dyn LLMClient>,
}

impl ImageFlow {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageGenerator for ImageFlow {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        match self.client.generate_media(&image_prompt(prompt)).await {
            Ok(MediaResponse {
                media_url: Some(url),
                ..
            }) => Ok(GeneratedImage { url, error: None }),
            Ok(MediaResponse { text, .. }) => {
                error!(response = %text, "Image generation returned no media");
                Ok(GeneratedImage {
                    url: labelled_placeholder(400, 300, "AI+Error"),
                    error: Some(format!(
                        "Image generation did not return media. LLM Response: {}",
                        text
                    )),
                })
            }
            Err(e) => {
                error!("Image generation failed: {}", e);
                Ok(GeneratedImage {
                    url: labelled_placeholder(400, 300, "Generation+Failed"),
                    error: Some(e.to_string()),
                })
            }
        }
    }
}
