use super::{types::Config, ConfigError, ProviderBackend};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Provider backend has its backend-specific section
/// - Poll/scan intervals are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Provider validation
    match config.provider.backend {
        ProviderBackend::Nylas => {
            let Some(nylas) = &config.provider.nylas else {
                return Err(ConfigError::ValidationError(
                    "provider.nylas section is required when backend = \"nylas\"".to_string(),
                ));
            };
            if nylas.api_key.is_empty() {
                return Err(ConfigError::ValidationError(
                    "provider.nylas.api_key cannot be empty".to_string(),
                ));
            }
            if nylas.grant_id.is_empty() {
                return Err(ConfigError::ValidationError(
                    "provider.nylas.grant_id cannot be empty".to_string(),
                ));
            }
        }
    }

    // Interval validation
    if config.pipeline.poll_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.poll_interval_secs cannot be 0".to_string(),
        ));
    }
    if config.dispatcher.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "dispatcher.interval_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn valid_toml() -> String {
        r#"
[provider]
backend = "nylas"

[provider.nylas]
api_key = "k"
grant_id = "g"
"#
        .to_string()
    }

    #[test]
    fn test_validate_valid_config() {
        let config = load_config_from_str(&valid_toml()).unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let toml = format!("{}\n[server]\nport = 0\n", valid_toml());
        let config = load_config_from_str(&toml).unwrap();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_missing_nylas_section_fails() {
        let toml = r#"
[provider]
backend = "nylas"
"#;
        let config = load_config_from_str(toml).unwrap();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_empty_api_key_fails() {
        let toml = r#"
[provider]
backend = "nylas"

[provider.nylas]
api_key = ""
grant_id = "g"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_poll_interval_fails() {
        let toml = format!("{}\n[pipeline]\npoll_interval_secs = 0\n", valid_toml());
        let config = load_config_from_str(&toml).unwrap();
        assert!(validate_config(&config).is_err());
    }
}
