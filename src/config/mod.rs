pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_API_ENDPOINT: &str = "https://json.astrologyapi.com/v1/planets/tropical";
pub const USER_ID_ENV: &str = "ASTROLOGY_API_USER_ID";
pub const API_KEY_ENV: &str = "ASTROLOGY_API_KEY";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "natal-signs")]
#[command(about = "Resolve natal sun and moon signs from birth data")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_API_ENDPOINT)]
    pub api_endpoint: String,

    #[arg(long, help = "API user id (defaults to $ASTROLOGY_API_USER_ID)")]
    pub api_user_id: Option<String>,

    #[arg(long, help = "API key (defaults to $ASTROLOGY_API_KEY)")]
    pub api_key: Option<String>,

    #[arg(long, help = "Accept-Language sent to the API")]
    pub language: Option<String>,

    #[arg(long, default_value = "10", help = "API request timeout in seconds")]
    pub timeout: u64,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, help = "Read birth data JSON from this file")]
    pub input: Option<String>,

    #[arg(long, help = "Birth data JSON given inline")]
    pub data: Option<String>,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 未指定的憑證從環境變數補上
    pub fn with_env_credentials(mut self) -> Self {
        if self.api_user_id.is_none() {
            self.api_user_id = std::env::var(USER_ID_ENV).ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var(API_KEY_ENV).ok();
        }
        self
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn api_user_id(&self) -> Option<&str> {
        self.api_user_id.as_deref()
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    fn request_timeout_secs(&self) -> u64 {
        self.timeout
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("api_endpoint", &self.api_endpoint)?;
        validate_path("output_path", &self.output_path)?;
        validate_range("timeout", self.timeout, 1, 120)?;
        validate_credentials(&self.api_user_id, &self.api_key)?;
        if let Some(language) = &self.language {
            validate_non_empty_string("language", language)?;
        }
        Ok(())
    }
}
