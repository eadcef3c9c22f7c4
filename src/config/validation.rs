use crate::config::types::{
    AccountConfig, Config, OutputConfig, SourceConfig, VerificationConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_account_config(&config.account)?;
    validate_source_config(&config.source)?;
    validate_verification_config(&config.verification)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the account section
fn validate_account_config(config: &AccountConfig) -> Result<(), ConfigError> {
    if config.id.is_empty() {
        return Err(ConfigError::Validation(
            "account id cannot be empty".to_string(),
        ));
    }

    // The id is spliced into request paths
    if !config
        .id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ConfigError::Validation(format!(
            "account id must contain only letters, digits, '.', '-' or '_', got '{}'",
            config.id
        )));
    }

    Ok(())
}

/// Validates the source section
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    if config.replay_dir.is_some() && config.endpoint.is_some() {
        return Err(ConfigError::Validation(
            "replay-dir and endpoint are mutually exclusive".to_string(),
        ));
    }

    if let (Some(replay), Some(archive)) = (&config.replay_dir, &config.archive_dir) {
        if replay == archive {
            return Err(ConfigError::Validation(format!(
                "archive-dir must differ from replay-dir ({})",
                archive.display()
            )));
        }
    }

    if config.replay_dir.is_none() {
        validate_endpoint(config.effective_endpoint())?;
    }

    if config.first_page.trim().is_empty() {
        return Err(ConfigError::Validation(
            "first-page cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "source timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.archive_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "archive-timeout-secs must be >= 1, got {}",
            config.archive_timeout_secs
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the endpoint URL
fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let url = Url::parse(endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Endpoint '{}' must use http or https",
            endpoint
        )));
    }

    Ok(())
}

/// Validates the verification section
fn validate_verification_config(config: &VerificationConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "verification timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates the output section
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.result_path.is_empty() {
        return Err(ConfigError::Validation(
            "result-path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.as_deref() == Some("") {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}
