//! Configuration loading from disk.

use std::path::Path;
use std::fs;
use crate::config::schema::ResilienceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ResilienceConfig, ConfigError> {
    let config: ResilienceConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ResilienceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Replace the API base URL and re-validate the result.
pub fn override_base_url(
    mut config: ResilienceConfig,
    base_url: impl Into<String>,
) -> Result<ResilienceConfig, ConfigError> {
    config.api.base_url = base_url.into();
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = parse_config("[retries]\nmax_attempts = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_attempts must be at least 1"));
    }

    #[test]
    fn test_base_url_override_is_validated() {
        let config = override_base_url(ResilienceConfig::default(), "http://10.0.0.5:8080").unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:8080");

        let err = override_base_url(ResilienceConfig::default(), "not a url").unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::BaseUrl("not a url".to_string())]);
            }
            other => panic!("expected validation error, got {}", other),
        }
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("resilience-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "mode = \"test\"\n[timeouts]\nprimary_ms = 500\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.timeouts.primary_ms, 500);
        assert_eq!(config.timeouts.fallback_ms, 10_000);

        fs::remove_file(&path).unwrap_or_default();
    }
}
