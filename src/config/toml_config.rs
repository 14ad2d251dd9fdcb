use crate::config::DEFAULT_API_ENDPOINT;
use crate::core::ConfigProvider;
use crate::utils::error::{ChartError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub user_id: Option<String>,
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_id: None,
            api_key: None,
            language: None,
            timeout_seconds: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_API_ENDPOINT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // ${VAR_NAME}
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder regex is valid"))
}

/// 環境變數未設定時，`${VAR}` 會原樣留下；這類值視為未提供
fn resolved(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|v| !placeholder_regex().is_match(v))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ChartError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ChartError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ASTROLOGY_API_KEY})
    fn substitute_env_vars(content: &str) -> String {
        placeholder_regex()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds.unwrap_or(10)
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_url("api.endpoint", &self.api.endpoint)?;
        validate_path("output.path", &self.output.path)?;
        validate_range("api.timeout_seconds", self.timeout_seconds(), 1, 120)?;

        let user_id = resolved(&self.api.user_id).map(str::to_string);
        let api_key = resolved(&self.api.api_key).map(str::to_string);
        validate_credentials(&user_id, &api_key)?;

        if let Some(language) = &self.api.language {
            validate_non_empty_string("api.language", language)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.api.endpoint
    }

    fn api_user_id(&self) -> Option<&str> {
        resolved(&self.api.user_id)
    }

    fn api_key(&self) -> Option<&str> {
        resolved(&self.api.api_key)
    }

    fn language(&self) -> Option<&str> {
        self.api.language.as_deref()
    }

    fn request_timeout_secs(&self) -> u64 {
        self.timeout_seconds()
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[api]
endpoint = "https://api.example.com/planets"
user_id = "600100"
api_key = "secret"
language = "en"
timeout_seconds = 5

[output]
path = "./charts"

[logging]
verbose = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_endpoint(), "https://api.example.com/planets");
        assert_eq!(config.api_user_id(), Some("600100"));
        assert_eq!(config.api_key(), Some("secret"));
        assert_eq!(config.request_timeout_secs(), 5);
        assert_eq!(config.output_path(), "./charts");
        assert!(config.verbose());
        assert!(!config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_section_defaults() {
        let config = TomlConfig::from_toml_str("[output]\npath = \"./out\"\n").unwrap();
        assert_eq!(config.api_endpoint(), DEFAULT_API_ENDPOINT);
        assert_eq!(config.request_timeout_secs(), 10);
        assert_eq!(config.api_key(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("NATAL_SIGNS_TEST_KEY", "from-env");

        let toml_content = r#"
[api]
user_id = "42"
api_key = "${NATAL_SIGNS_TEST_KEY}"

[output]
path = "./out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("from-env"));

        std::env::remove_var("NATAL_SIGNS_TEST_KEY");
    }

    #[test]
    fn test_unset_env_var_is_treated_as_missing() {
        let toml_content = r#"
[api]
user_id = "${NATAL_SIGNS_TEST_UNSET_USER}"
api_key = "${NATAL_SIGNS_TEST_UNSET_KEY}"

[output]
path = "./out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_user_id(), None);
        assert_eq!(config.api_key(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[api]
endpoint = "invalid-url"

[output]
path = "./out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_output_section_fails_to_parse() {
        let err = TomlConfig::from_toml_str("[api]\n").unwrap_err();
        assert!(matches!(err, ChartError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[output]
path = "./from-file"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "./from-file");
    }
}
