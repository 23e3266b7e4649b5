//! Command handlers
//!
//! Each handler opens the page its feature lives on, reports what the route
//! guard did, and only does its work if the page actually rendered.

use super::output::Output;
use super::page::PageHost;
use super::{Cli, Commands};
use crate::flows::{ImageFlow, LegalFlows};
use crate::guard::GuardView;
use crate::imaging::{ImageAcquirer, ImageGenerator, ImageRequest};
use crate::lawyers::{self, LawyerQuery, SPECIALIZATIONS};
use crate::llm::{LLMClient, LLMClientFactory};
use crate::shell::{AppShell, HOME_PATH, LOGIN_PATH, REGISTER_PATH};
use crate::types::{AppError, GeneratedImage, Notification, Result as AppResult};
use crate::utils::AttorneyConfig;
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command did what was asked
    Done,
    /// The command was refused (bad credentials, not logged in, ...);
    /// the reason has already been printed
    Rejected,
}

/// Everything a handler needs.
pub struct CommandContext {
    pub config: AttorneyConfig,
    pub store: Option<PathBuf>,
    pub output: Output,
}

impl CommandContext {
    pub fn new(cli: &Cli, config: AttorneyConfig) -> Self {
        let output = if cli.no_color {
            Output::no_color()
        } else {
            Output::new()
        };
        Self {
            config,
            store: cli.store.clone(),
            output,
        }
    }

    /// Open `path` and print the guard's evaluations and any toasts.
    fn open(&self, path: &str) -> anyhow::Result<PageHost> {
        let mut page = PageHost::from_config(&self.config, self.store.as_deref(), path)?;
        page.open();
        self.flush(&page);
        Ok(page)
    }

    fn flush(&self, page: &PageHost) {
        for notification in page.take_notifications() {
            self.output.notification(&notification);
        }
    }

    /// Open a protected page, returning `None` (after explaining) if the
    /// session does not reach it.
    fn protected(&self, path: &str) -> anyhow::Result<Option<(PageHost, AppShell<()>)>> {
        let page = self.open(path)?;
        match page.view(()) {
            GuardView::Protected(shell) => Ok(Some((page, shell))),
            _ => {
                self.output.error("Please log in first.");
                self.output.command("ai-attorney login admin -p password");
                Ok(None)
            }
        }
    }

    /// Factory for the configured provider.
    fn factory(&self) -> anyhow::Result<LLMClientFactory> {
        let provider = self
            .config
            .llm
            .provider()
            .context("LLM provider is not configured")?;
        Ok(LLMClientFactory::new(provider))
    }

    /// Build the configured LLM client.
    async fn client(&self) -> anyhow::Result<Arc<dyn LLMClient>> {
        let client = self.factory()?.create_default().await?;
        info!(model = client.model_name(), "LLM client ready");
        Ok(Arc::from(client))
    }

    /// Image generator backed by the LLM, or one that always fails if the
    /// provider cannot draw or the client cannot be built. Acquirers turn
    /// either outcome into an image.
    async fn image_generator(&self) -> Arc<dyn ImageGenerator> {
        let built = match self.factory() {
            Ok(factory) => {
                let provider = factory.default_provider();
                if provider.supports_images() {
                    factory.create_default().await.map_err(anyhow::Error::from)
                } else {
                    Err(anyhow::anyhow!(
                        "{} provider does not support image generation",
                        provider.name()
                    ))
                }
            }
            Err(e) => Err(e),
        };

        match built {
            Ok(client) => {
                info!(model = client.model_name(), "Image client ready");
                Arc::new(ImageFlow::new(Arc::from(client)))
            }
            Err(e) => {
                warn!("Image generation unavailable: {:#}", e);
                Arc::new(Unavailable(format!("{:#}", e)))
            }
        }
    }
}

struct Unavailable(String);

#[async_trait]
impl ImageGenerator for Unavailable {
    async fn generate(&self, _prompt: &str) -> AppResult<GeneratedImage> {
        Err(AppError::Config(self.0.clone()))
    }
}

/// Dispatch a parsed command.
pub async fn run(command: Commands, ctx: &CommandContext) -> anyhow::Result<Outcome> {
    match command {
        Commands::Status => status(ctx),
        Commands::Login { username, password } => login(ctx, &username, &password),
        Commands::Register {
            username,
            password,
            confirm,
        } => register(ctx, &username, &password, &confirm),
        Commands::Logout => logout(ctx),
        Commands::Users => users(ctx),
        Commands::Visit { path } => visit(ctx, &path),
        Commands::Guidance { situation } => guidance(ctx, &situation.join(" ")).await,
        Commands::Summarize { file, next_steps } => summarize(ctx, file, next_steps).await,
        Commands::NextSteps { summary } => suggest_next_steps(ctx, &summary.join(" ")).await,
        Commands::Image {
            prompt,
            width,
            height,
            fallback,
        } => image(ctx, prompt, width, height, fallback).await,
        Commands::Lawyers {
            location,
            specialization,
            portraits,
        } => find_lawyers(ctx, location, specialization, portraits).await,
        Commands::Config => show_config(ctx),
    }
}

// ============= Session Commands =============

fn status(ctx: &CommandContext) -> anyhow::Result<Outcome> {
    let out = &ctx.output;
    let page = ctx.open(HOME_PATH)?;

    out.header("Session");
    out.kv("Status", &page.status().to_string());
    out.kv("Page", &page.path());
    out.kv("Registered users", &page.gate.users().len().to_string());
    Ok(Outcome::Done)
}

fn login(ctx: &CommandContext, username: &str, password: &str) -> anyhow::Result<Outcome> {
    let out = &ctx.output;
    let mut page = ctx.open(LOGIN_PATH)?;

    if page.status().is_logged_in() {
        out.info("Already logged in.");
        out.hint("Log out first to switch accounts.");
        return Ok(Outcome::Done);
    }

    let ok = page.gate.login(username, password);
    ctx.flush(&page);
    page.settle();
    Ok(if ok { Outcome::Done } else { Outcome::Rejected })
}

fn register(
    ctx: &CommandContext,
    username: &str,
    password: &str,
    confirm: &str,
) -> anyhow::Result<Outcome> {
    let out = &ctx.output;
    let mut page = ctx.open(REGISTER_PATH)?;

    if page.status().is_logged_in() {
        out.info("Already logged in.");
        return Ok(Outcome::Done);
    }

    if password != confirm {
        out.notification(&Notification::destructive(
            "Registration Failed",
            "Passwords do not match.",
        ));
        return Ok(Outcome::Rejected);
    }

    let ok = page.gate.register(username, password);
    ctx.flush(&page);
    page.settle();
    Ok(if ok { Outcome::Done } else { Outcome::Rejected })
}

fn logout(ctx: &CommandContext) -> anyhow::Result<Outcome> {
    let out = &ctx.output;
    let mut page = ctx.open(HOME_PATH)?;

    match page.view(()) {
        GuardView::Protected(shell) => {
            shell.on_logout.invoke();
            ctx.flush(&page);
            page.settle();
        }
        _ => out.info("Not logged in."),
    }
    Ok(Outcome::Done)
}

fn users(ctx: &CommandContext) -> anyhow::Result<Outcome> {
    let out = &ctx.output;
    let page = PageHost::from_config(&ctx.config, ctx.store.as_deref(), HOME_PATH)?;

    out.header("Demo Accounts");
    out.list_item("admin (built in)");
    for user in page.gate.users() {
        out.list_item(&user.username);
    }
    Ok(Outcome::Done)
}

fn visit(ctx: &CommandContext, path: &str) -> anyhow::Result<Outcome> {
    let out = &ctx.output;
    if !path.starts_with('/') {
        anyhow::bail!("Path must start with '/': {}", path);
    }

    let page = ctx.open(path)?;

    out.header("Route Guard");
    for step in page.trail() {
        out.decision(&step.path, step.decision);
    }

    match page.view(()) {
        GuardView::Loader => out.info("Showing loader"),
        GuardView::Public(()) => out.info(&format!("Showing public page {}", page.path())),
        GuardView::Protected(shell) => {
            out.subheader("Navigation");
            for item in &shell.nav {
                let marker = if item.active { "▸" } else { " " };
                out.list_item(&format!("{} {} ({})", marker, item.label, item.href));
            }
        }
    }
    Ok(Outcome::Done)
}

// ============= Legal Assistance Commands =============

async fn guidance(ctx: &CommandContext, situation: &str) -> anyhow::Result<Outcome> {
    let out = &ctx.output;
    if ctx.protected("/legal-guidance")?.is_none() {
        return Ok(Outcome::Rejected);
    }

    let flows = LegalFlows::new(ctx.client().await?);
    let guidance = flows.provide_legal_guidance(situation).await?;

    out.header("Legal Advice");
    out.paragraph(&guidance.legal_advice);

    out.subheader("Relevant IPC Sections");
    if guidance.ipc_sections.is_empty() {
        out.info("No specific IPC sections identified.");
    }
    for section in &guidance.ipc_sections {
        out.list_item(section);
    }

    if guidance.should_incorporate_details {
        out.hint("This advice depends on the specifics of your situation.");
    }
    out.hint("This is AI generated guidance, not a substitute for a lawyer.");
    Ok(Outcome::Done)
}

async fn summarize(ctx: &CommandContext, file: PathBuf, next_steps: bool) -> anyhow::Result<Outcome> {
    let out = &ctx.output;
    if ctx.protected("/document-insight")?.is_none() {
        return Ok(Outcome::Rejected);
    }

    let document = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read {:?}", file))?;

    let flows = LegalFlows::new(ctx.client().await?);
    let summary = flows.summarize_legal_document(&document).await?;

    out.header("Document Summary");
    out.paragraph(&summary.summary);
    out.subheader("Suggested Steps");
    out.paragraph(&summary.suggested_steps);

    if next_steps {
        let steps = flows.suggest_next_steps(&summary.summary).await?;
        out.subheader("Next Steps");
        for step in &steps.suggested_next_steps {
            out.list_item(step);
        }
    }
    Ok(Outcome::Done)
}

async fn suggest_next_steps(ctx: &CommandContext, summary: &str) -> anyhow::Result<Outcome> {
    let out = &ctx.output;
    if ctx.protected("/document-insight")?.is_none() {
        return Ok(Outcome::Rejected);
    }

    let flows = LegalFlows::new(ctx.client().await?);
    let steps = flows.suggest_next_steps(summary).await?;

    out.header("Next Steps");
    for step in &steps.suggested_next_steps {
        out.list_item(step);
    }
    Ok(Outcome::Done)
}

async fn image(
    ctx: &CommandContext,
    prompt: String,
    width: Option<u32>,
    height: Option<u32>,
    fallback: Option<String>,
) -> anyhow::Result<Outcome> {
    let out = &ctx.output;
    if ctx.protected(HOME_PATH)?.is_none() {
        return Ok(Outcome::Rejected);
    }

    let images = &ctx.config.images;
    let mut acquirer = ImageAcquirer::new(
        ctx.image_generator().await,
        width.unwrap_or(images.width),
        height.unwrap_or(images.height),
    );

    let request = ImageRequest {
        prompt,
        fallback_url: fallback.or_else(|| images.fallback_url.clone()),
    };
    if let Some(handle) = acquirer.request_with(request) {
        handle.await.context("Image task panicked")?;
    }

    out.header("Image");
    out.image("URL", &acquirer.state());
    Ok(Outcome::Done)
}

async fn find_lawyers(
    ctx: &CommandContext,
    location: Option<String>,
    specialization: Option<String>,
    portraits: bool,
) -> anyhow::Result<Outcome> {
    let out = &ctx.output;
    if ctx.protected("/lawyer-locator")?.is_none() {
        return Ok(Outcome::Rejected);
    }

    let query = LawyerQuery {
        location,
        specialization,
    };
    let found = match lawyers::search(&query) {
        Ok(found) => found,
        Err(AppError::InvalidInput(message)) => {
            out.warning(&message);
            out.hint(&format!("Specializations: {}", SPECIALIZATIONS.join(", ")));
            return Ok(Outcome::Rejected);
        }
        Err(e) => return Err(e.into()),
    };

    out.header(&format!("Lawyers ({})", found.len()));
    if found.is_empty() {
        out.info("No lawyers found matching your criteria.");
        return Ok(Outcome::Done);
    }

    out.table_header(&["Name", "Specialization", "Location", "Rating"]);
    for lawyer in &found {
        let rating = format!("{:.1}", lawyer.rating);
        out.table_row(&[lawyer.name, lawyer.specialization, lawyer.location, &rating]);
    }

    if portraits {
        let generator = ctx.image_generator().await;
        let acquirers: Vec<ImageAcquirer> = found
            .iter()
            .map(|_| ImageAcquirer::new(generator.clone(), 100, 100))
            .collect();
        let handles: Vec<_> = acquirers
            .iter()
            .zip(&found)
            .filter_map(|(acquirer, lawyer)| acquirer.request(lawyer.portrait_prompt))
            .collect();

        for result in futures::future::join_all(handles).await {
            result.context("Portrait task panicked")?;
        }

        out.subheader("Portraits");
        for (acquirer, lawyer) in acquirers.iter().zip(&found) {
            out.image(lawyer.name, &acquirer.state());
        }
    }

    for lawyer in &found {
        out.subheader(lawyer.name);
        out.kv("Firm", lawyer.firm);
        out.kv("Experience", &format!("{} years", lawyer.experience_years));
        out.kv("Phone", lawyer.phone);
        out.kv("Email", lawyer.email);
    }
    Ok(Outcome::Done)
}

fn show_config(ctx: &CommandContext) -> anyhow::Result<Outcome> {
    let rendered =
        toml::to_string_pretty(&ctx.config).context("Failed to render configuration")?;
    ctx.output.header("Configuration");
    ctx.output.paragraph(&rendered);
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::utils::toml_config::ProviderConfig;

    fn context(llm: ProviderConfig) -> CommandContext {
        CommandContext {
            config: AttorneyConfig {
                llm,
                ..Default::default()
            },
            store: None,
            output: Output::no_color(),
        }
    }

    #[tokio::test]
    async fn test_text_only_provider_gets_no_image_client() {
        let ctx = context(ProviderConfig::Ollama {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
        });

        let err = ctx.image_generator().await.generate("court").await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Ollama provider does not support image generation"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_gets_no_image_client() {
        let ctx = context(ProviderConfig::Gemini {
            api_key_env: "AI_ATTORNEY_TEST_UNSET_KEY".to_string(),
            api_base: "http://localhost:9".to_string(),
            model: "gemini-2.0-flash".to_string(),
            image_model: "gemini-2.0-flash-exp".to_string(),
            timeout_secs: 1,
        });

        let err = ctx.image_generator().await.generate("court").await.unwrap_err();
        assert!(err.to_string().contains("AI_ATTORNEY_TEST_UNSET_KEY"));
    }

    #[tokio::test]
    async fn test_unavailable_generator_fails() {
        let generator = Unavailable("no key".to_string());
        let err = generator.generate("court").await.unwrap_err();
        assert!(err.to_string().contains("no key"));
    }
}
