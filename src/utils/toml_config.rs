//! TOML-based configuration for AI-Attorney
//!
//! Everything is optional: a missing `ai-attorney.toml` yields the defaults
//! below. Secrets are never stored in the file; the file names the environment
//! variable that holds them.
//!
//! ```toml
//! [app]
//! log_level = "warn"
//! store_path = "./data/ai-attorney.json"
//!
//! [routes]
//! public_paths = ["/login", "/register"]
//!
//! [llm]
//! type = "gemini"
//! api_key_env = "GEMINI_API_KEY"
//! model = "gemini-2.0-flash"
//! image_model = "gemini-2.0-flash-exp"
//!
//! [images]
//! width = 400
//! height = 300
//! ```

use crate::guard::PublicPaths;
use crate::llm::Provider;
use crate::shell::{HOME_PATH, LOGIN_PATH, REGISTER_PATH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Root configuration structure loaded from ai-attorney.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttorneyConfig {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub routes: RoutesConfig,

    #[serde(default)]
    pub llm: ProviderConfig,

    #[serde(default)]
    pub images: ImagesConfig,
}

// ============= Application Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// JSON file standing in for browser local storage
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/ai-attorney.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            store_path: default_store_path(),
        }
    }
}

// ============= Route Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Paths reachable without logging in
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

fn default_public_paths() -> Vec<String> {
    vec![LOGIN_PATH.to_string(), REGISTER_PATH.to_string()]
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            public_paths: default_public_paths(),
        }
    }
}

impl RoutesConfig {
    pub fn public_paths(&self) -> PublicPaths {
        PublicPaths::new(self.public_paths.iter().cloned())
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        /// Environment variable containing the API key
        #[serde(default = "default_gemini_key_env")]
        api_key_env: String,
        #[serde(default = "default_gemini_base")]
        api_base: String,
        #[serde(default = "default_gemini_model")]
        model: String,
        #[serde(default = "default_gemini_image_model")]
        image_model: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        model: String,
    },
}

fn default_gemini_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_gemini_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_image_model() -> String {
    "gemini-2.0-flash-exp".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Gemini {
            api_key_env: default_gemini_key_env(),
            api_base: default_gemini_base(),
            model: default_gemini_model(),
            image_model: default_gemini_image_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// Resolve secrets and build the runtime provider.
    pub fn provider(&self) -> Result<Provider, ConfigError> {
        match self {
            ProviderConfig::Gemini {
                api_key_env,
                api_base,
                model,
                image_model,
                timeout_secs,
            } => {
                let api_key = std::env::var(api_key_env)
                    .ok()
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| ConfigError::MissingEnvVar(api_key_env.clone()))?;
                Ok(Provider::Gemini {
                    api_key,
                    api_base: api_base.clone(),
                    model: model.clone(),
                    image_model: image_model.clone(),
                    timeout_secs: *timeout_secs,
                })
            }
            ProviderConfig::Ollama { base_url, model } => Ok(Provider::Ollama {
                base_url: base_url.clone(),
                model: model.clone(),
            }),
        }
    }
}

// ============= Image Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    /// Image shown instead of the generic placeholder when generation fails
    #[serde(default)]
    pub fallback_url: Option<String>,
}

fn default_width() -> u32 {
    400
}

fn default_height() -> u32 {
    300
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fallback_url: None,
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl AttorneyConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load the file if it exists, otherwise use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Err(ConfigError::FileNotFound(path)) => {
                info!("No configuration at {:?}, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parse and validate TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AttorneyConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for internal consistency
    ///
    /// The home page must be protected and the login page public, otherwise
    /// the route guard would redirect forever.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let public = &self.routes.public_paths;

        if let Some(bad) = public.iter().find(|p| !p.starts_with('/')) {
            return Err(ConfigError::ValidationError(format!(
                "Public path '{}' must start with '/'",
                bad
            )));
        }
        if public.iter().any(|p| p == HOME_PATH) {
            return Err(ConfigError::ValidationError(format!(
                "Home path '{}' cannot be public",
                HOME_PATH
            )));
        }
        if !public.iter().any(|p| p == LOGIN_PATH) {
            return Err(ConfigError::ValidationError(format!(
                "Login path '{}' must be public",
                LOGIN_PATH
            )));
        }

        if self.images.width == 0 || self.images.height == 0 {
            return Err(ConfigError::ValidationError(
                "Image width and height must be positive".to_string(),
            ));
        }

        if let ProviderConfig::Ollama { model, .. } = &self.llm {
            if model.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Ollama provider needs a model".to_string(),
                ));
            }
        }

        Ok(())
    }
}
