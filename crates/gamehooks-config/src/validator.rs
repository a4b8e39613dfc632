//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert the first error, if any, into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_api(config, &mut result);
        Self::validate_storage(config, &mut result);
        Self::validate_dispatch(config, &mut result);
        Self::validate_catalog(config, &mut result);

        Ok(result)
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_api(config: &Config, result: &mut ValidationResult) {
        let prefix = &config.api.prefix;
        if !prefix.starts_with('/') {
            result.add_error(ValidationError::new(
                "api.prefix",
                format!("Prefix '{}' must start with '/'", prefix),
            ));
        } else if prefix.len() > 1 && prefix.ends_with('/') {
            result.add_error(ValidationError::new(
                "api.prefix",
                format!("Prefix '{}' must not end with '/'", prefix),
            ));
        }
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        if config.storage.path.trim().is_empty() {
            result.add_error(ValidationError::new(
                "storage.path",
                "Storage path cannot be empty",
            ));
        }
    }

    fn validate_dispatch(config: &Config, result: &mut ValidationResult) {
        let dispatch = &config.dispatch;

        if dispatch.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "dispatch.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }

        if dispatch.timeout_seconds > 120 {
            result.add_warning(ValidationWarning::new(
                "dispatch.timeout_seconds",
                "timeout_seconds is very high (>120), slow receivers will hold delivery slots",
            ));
        }

        if dispatch.max_attempts == 0 {
            result.add_error(ValidationError::new(
                "dispatch.max_attempts",
                "max_attempts must be at least 1",
            ));
        }

        if dispatch.max_in_flight == 0 {
            result.add_error(ValidationError::new(
                "dispatch.max_in_flight",
                "max_in_flight must be greater than 0",
            ));
        }

        if dispatch.max_in_flight_per_endpoint == 0 {
            result.add_error(ValidationError::new(
                "dispatch.max_in_flight_per_endpoint",
                "max_in_flight_per_endpoint must be greater than 0",
            ));
        } else if dispatch.max_in_flight > 1
            && dispatch.max_in_flight_per_endpoint >= dispatch.max_in_flight
        {
            result.add_warning(ValidationWarning::new(
                "dispatch.max_in_flight_per_endpoint",
                "max_in_flight_per_endpoint is not below max_in_flight, it is capped at max_in_flight - 1",
            ));
        }

        if dispatch.max_queued_per_endpoint == 0 {
            result.add_error(ValidationError::new(
                "dispatch.max_queued_per_endpoint",
                "max_queued_per_endpoint must be greater than 0",
            ));
        }
    }

    fn validate_catalog(config: &Config, result: &mut ValidationResult) {
        if config.catalog.events.is_empty() {
            result.add_warning(ValidationWarning::new(
                "catalog.events",
                "Event catalog is empty, no endpoint can be registered until the host adds events",
            ));
        }

        for name in &config.catalog.events {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                result.add_error(ValidationError::new(
                    "catalog.events",
                    format!("Invalid event name '{}'", name),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
