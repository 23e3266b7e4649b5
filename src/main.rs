use ai_attorney::cli::commands::{self, CommandContext, Outcome};
use ai_attorney::cli::output::Output;
use ai_attorney::cli::Cli;
use ai_attorney::utils::AttorneyConfig;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse_args();

    let fallback_output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let config = match AttorneyConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            fallback_output.error(&format!("Failed to load {:?}: {}", cli.config, e));
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&cli, &config);

    let ctx = CommandContext::new(&cli, config);
    match commands::run(cli.command, &ctx).await {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Rejected) => ExitCode::FAILURE,
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            ctx.output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so command output stays clean.
fn init_tracing(cli: &Cli, config: &AttorneyConfig) {
    let default_level = if cli.verbose {
        "ai_attorney=debug"
    } else {
        config.app.log_level.as_str()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (plain, json) = if cli.json_logs {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(fmt::layer().with_writer(std::io::stderr)), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}
