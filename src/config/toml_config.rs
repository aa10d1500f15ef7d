use crate::utils::error::{RatesError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "https://app.okargo.com/api/Export/v2/GetOnlineCarrierOffers";

pub const OUTPUT_FORMATS: [&str; 2] = ["json", "csv"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    pub okargo: OkargoConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

/// Upstream credentials and endpoint. `token` and `platforms` are optional
/// here so a partial file still parses; the client refuses to start without them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OkargoConfig {
    pub token: Option<String>,
    /// Platform key (as sent in requests) to the aggregator's `ratesFetcher` code.
    pub platforms: Option<HashMap<String, String>>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl OkargoConfig {
    pub fn new(token: impl Into<String>, platforms: HashMap<String, String>) -> Self {
        Self {
            token: Some(token.into()),
            platforms: Some(platforms),
            endpoint: None,
            timeout_seconds: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
    pub filenames: Option<FilenameConfig>,
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_output_formats() -> Vec<String> {
    vec!["json".to_string()]
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_formats: default_output_formats(),
            compression: None,
            filenames: None,
        }
    }
}

impl OutputConfig {
    pub fn wants(&self, format: &str) -> bool {
        self.output_formats.iter().any(|f| f == format)
    }

    pub fn json_filename(&self) -> &str {
        self.filenames
            .as_ref()
            .and_then(|f| f.json.as_deref())
            .unwrap_or("rates.json")
    }

    pub fn csv_filename(&self) -> &str {
        self.filenames
            .as_ref()
            .and_then(|f| f.csv.as_deref())
            .unwrap_or("rates.csv")
    }

    /// Archive name when compression is on.
    pub fn zip_filename(&self) -> Option<&str> {
        self.compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    #[serde(default = "default_zip_filename")]
    pub filename: String,
}

fn default_zip_filename() -> String {
    "rates.zip".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub json: Option<String>,
    pub csv: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    #[serde(default)]
    pub format: LogFormat,
}

impl RatesConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RatesError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RatesError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OKARGO_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RatesError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        let token = validation::validate_required_field("okargo.token", &self.okargo.token)?;
        validation::validate_non_empty_string("okargo.token", token)?;
        if token.starts_with("${") {
            return Err(RatesError::InvalidConfigValueError {
                field: "okargo.token".to_string(),
                value: token.clone(),
                reason: "Environment variable is not set".to_string(),
            });
        }

        let platforms =
            validation::validate_required_field("okargo.platforms", &self.okargo.platforms)?;
        for (key, code) in platforms {
            validation::validate_non_empty_string(&format!("okargo.platforms.{}", key), code)?;
        }

        validation::validate_url("okargo.endpoint", self.okargo.endpoint())?;

        if let Some(timeout) = self.okargo.timeout_seconds {
            validation::validate_positive_number("okargo.timeout_seconds", timeout, 1)?;
        }

        validation::validate_path("output.output_path", &self.output.output_path)?;

        for format in &self.output.output_formats {
            validation::validate_one_of("output.output_formats", format, &OUTPUT_FORMATS)?;
        }

        Ok(())
    }

    pub fn output_path(&self) -> &str {
        &self.output.output_path
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging.as_ref().map(|l| l.format).unwrap_or_default()
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }
}

impl Validate for RatesConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[okargo]
token = "TOKEN"
timeout_seconds = 20

[okargo.platforms]
"5" = "Okargo"

[output]
output_path = "./rates-output"
output_formats = ["json", "csv"]

[output.compression]
enabled = true

[logging]
level = "debug"
format = "json"
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = RatesConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.okargo.token.as_deref(), Some("TOKEN"));
        assert_eq!(config.okargo.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(
            config.okargo.platforms.as_ref().unwrap().get("5").map(String::as_str),
            Some("Okargo")
        );
        assert!(config.output.wants("csv"));
        assert_eq!(config.output.zip_filename(), Some("rates.zip"));
        assert_eq!(config.output.json_filename(), "rates.json");
        assert_eq!(config.log_format(), LogFormat::Json);
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_output_section_is_optional() {
        let config = RatesConfig::from_toml_str(
            r#"
[okargo]
token = "TOKEN"
platforms = {}
"#,
        )
        .unwrap();

        assert_eq!(config.output_path(), "./output");
        assert!(config.output.wants("json"));
        assert!(!config.output.wants("csv"));
        assert_eq!(config.output.zip_filename(), None);
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FREIGHT_RATES_TEST_TOKEN", "secret-token");

        let config = RatesConfig::from_toml_str(
            r#"
[okargo]
token = "${FREIGHT_RATES_TEST_TOKEN}"
platforms = {}
"#,
        )
        .unwrap();
        assert_eq!(config.okargo.token.as_deref(), Some("secret-token"));

        std::env::remove_var("FREIGHT_RATES_TEST_TOKEN");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let config = RatesConfig::from_toml_str(
            r#"
[okargo]
token = "${FREIGHT_RATES_SURELY_UNSET_VAR}"
platforms = {}
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let missing_platforms = RatesConfig::from_toml_str(
            r#"
[okargo]
token = "TOKEN"
"#,
        )
        .unwrap();
        assert!(matches!(
            missing_platforms.validate(),
            Err(RatesError::MissingConfigError { field }) if field == "okargo.platforms"
        ));

        let bad_endpoint = RatesConfig::from_toml_str(
            r#"
[okargo]
token = "TOKEN"
endpoint = "invalid-url"
platforms = {}
"#,
        )
        .unwrap();
        assert!(bad_endpoint.validate().is_err());

        let bad_format = RatesConfig::from_toml_str(
            r#"
[okargo]
token = "TOKEN"
platforms = {}

[output]
output_formats = ["tsv"]
"#,
        )
        .unwrap();
        assert!(bad_format.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = RatesConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.okargo.timeout_seconds, Some(20));
    }
}
