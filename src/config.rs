//! Configuration module for RxGate.
//!
//! Loads configuration from YAML files and environment variables. The
//! compliance tables are static for the process lifetime: loaded once at
//! startup, validated, and handed to components at construction time.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub compliance: ComplianceConfig,
    pub routing: RoutingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Generative text backend configuration (OpenAI-compatible chat API).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// API key for the backend. Falls back to OPENAI_API_KEY.
    pub api_key: String,
    /// Base URL of the chat-completions API.
    pub api_base: String,
    /// Model identifier.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Total attempts per request, including the first.
    pub max_attempts: u32,
    /// Base delay between retries, doubled per attempt.
    pub retry_backoff_ms: u64,
    /// Maximum in-flight backend calls.
    pub max_concurrency: usize,
    /// Sampling temperature for sales responses.
    pub temperature: f32,
    /// Maximum completion length.
    pub max_tokens: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
            max_attempts: 3,
            retry_backoff_ms: 250,
            max_concurrency: 8,
            temperature: 0.4,
            max_tokens: 800,
        }
    }
}

/// Off-label compliance policy tables.
///
/// Example values are seeded for the CardioStatin demo product; real
/// deployments override these per drug via config files or environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComplianceConfig {
    /// FDA-approved indications for the product.
    pub approved_indications: Vec<String>,
    /// Phrases that are explicit off-label language.
    pub off_label_keywords: Vec<String>,
    /// Regular expressions catching implicit off-label suggestions.
    pub implicit_patterns: Vec<String>,
    /// Condition terms outside the approved indications.
    pub off_label_conditions: Vec<String>,
    /// Disclaiming phrases that exempt a condition mention.
    pub context_exceptions: Vec<String>,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            approved_indications: vec![
                "hyperlipidemia".to_string(),
                "high cholesterol".to_string(),
                "elevated ldl".to_string(),
                "cardiovascular risk reduction".to_string(),
            ],
            off_label_keywords: vec![
                "off-label".to_string(),
                "off label".to_string(),
                "unapproved use".to_string(),
                "non-approved indication".to_string(),
                "investigational use".to_string(),
            ],
            implicit_patterns: vec![
                r"some (?:doctors|physicians|clinicians) (?:use|prescribe|find success)"
                    .to_string(),
                r"might(?:\s+also)? (?:work|help|benefit) (?:for|with)".to_string(),
                r"can be used for".to_string(),
                r"doctors have found".to_string(),
                r"in practice.*works for".to_string(),
            ],
            off_label_conditions: vec![
                "migraine".to_string(),
                "headache prevention".to_string(),
                "weight loss".to_string(),
                "pediatric use".to_string(),
                "children".to_string(),
                "pregnancy".to_string(),
            ],
            context_exceptions: vec![
                "not approved for".to_string(),
                "is not indicated for".to_string(),
                "not fda-approved for".to_string(),
                "outside approved indications".to_string(),
            ],
        }
    }
}

/// Agent routing configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Terms implying a request for clinical/mechanistic detail.
    pub specialist_keywords: Vec<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            specialist_keywords: vec![
                "mechanism".to_string(),
                "interaction".to_string(),
                "dosing".to_string(),
                "pharmacokinetic".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (RXGATE_*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let loader = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("RXGATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Config = loader.try_deserialize()?;

        // The original deployment keys the backend off OPENAI_API_KEY.
        if config.backend.api_key.is_empty() {
            if let Ok(key) = std::env::var("OPENAI_API_KEY") {
                config.backend.api_key = key;
            }
        }

        Ok(config)
    }

    /// Verify every required static table is present.
    ///
    /// Missing tables are fatal at process start, not per-request.
    pub fn validate(&self) -> Result<(), String> {
        let required: [(&str, &[String]); 5] = [
            (
                "compliance.approved_indications",
                &self.compliance.approved_indications,
            ),
            (
                "compliance.off_label_keywords",
                &self.compliance.off_label_keywords,
            ),
            (
                "compliance.implicit_patterns",
                &self.compliance.implicit_patterns,
            ),
            (
                "compliance.off_label_conditions",
                &self.compliance.off_label_conditions,
            ),
            (
                "compliance.context_exceptions",
                &self.compliance.context_exceptions,
            ),
        ];

        for (name, table) in required {
            if table.is_empty() {
                return Err(format!("required table '{name}' is empty"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.backend.model, "gpt-4o-mini");
    }

    #[test]
    fn test_default_tables_are_populated() {
        let compliance = ComplianceConfig::default();
        assert!(compliance.off_label_keywords.contains(&"off-label".to_string()));
        assert!(compliance.off_label_conditions.contains(&"migraine".to_string()));
        assert!(compliance
            .context_exceptions
            .contains(&"not approved for".to_string()));
    }

    #[test]
    fn test_empty_table_rejected() {
        let mut config = Config::default();
        config.compliance.off_label_keywords.clear();

        let err = config.validate().unwrap_err();
        assert!(err.contains("off_label_keywords"));
    }
}
