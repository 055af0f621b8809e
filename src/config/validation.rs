use crate::config::types::{Config, OutputConfig, PacingConfig, SiteConfig, SolverConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_pacing_config(&config.pacing)?;
    validate_output_config(&config.output)?;
    validate_solver_config(&config.solver)?;
    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_pacing_config(config: &PacingConfig) -> Result<(), ConfigError> {
    check_range_f64(
        "listing-delay",
        config.listing_delay_min_secs,
        config.listing_delay_max_secs,
    )?;
    check_range_f64(
        "page-delay",
        config.page_delay_min_secs,
        config.page_delay_max_secs,
    )?;

    if config.rest_after_min < 1 || config.rest_after_min > config.rest_after_max {
        return Err(ConfigError::Validation(format!(
            "rest-after range must satisfy 1 <= min <= max, got [{}, {}]",
            config.rest_after_min, config.rest_after_max
        )));
    }

    if config.rest_min_secs > config.rest_max_secs {
        return Err(ConfigError::Validation(format!(
            "rest duration range must satisfy min <= max, got [{}, {}]",
            config.rest_min_secs, config.rest_max_secs
        )));
    }

    if config.max_errors_before_ban < 1 {
        return Err(ConfigError::Validation(
            "max-errors-before-ban must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.dir.is_empty() {
        return Err(ConfigError::Validation(
            "output dir cannot be empty".to_string(),
        ));
    }

    if config.flush_every < 1 {
        return Err(ConfigError::Validation(
            "flush-every must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_solver_config(config: &SolverConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "solver timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn check_range_f64(name: &str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min < 0.0 || min > max {
        return Err(ConfigError::Validation(format!(
            "{name} range must satisfy 0 <= min <= max, got [{min}, {max}]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_inverted_delay_range_rejected() {
        let mut config = Config::default();
        config.pacing.listing_delay_min_secs = 10.0;
        config.pacing.listing_delay_max_secs = 2.0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_rest_floor_rejected() {
        let mut config = Config::default();
        config.pacing.rest_after_min = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut config = Config::default();
        config.site.base_url = "not a url".to_string();
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_zero_flush_every_rejected() {
        let mut config = Config::default();
        config.output.flush_every = 0;
        assert!(validate(&config).is_err());
    }
}
