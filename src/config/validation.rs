//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (budget > 0, delay shorter than budget)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProtectionConfig → Result<(), Vec<ValidationError>>

use std::fmt;

use crate::config::schema::ProtectionConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every semantic rule and collect all violations.
pub fn validate_config(config: &ProtectionConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.polling.poll_timeout_ms == 0 {
        errors.push(ValidationError {
            field: "polling.poll_timeout_ms",
            message: "must be greater than 0".to_string(),
        });
    }

    if config.polling.poll_delay_ms >= config.polling.poll_timeout_ms {
        errors.push(ValidationError {
            field: "polling.poll_delay_ms",
            message: format!(
                "must be less than poll_timeout_ms ({})",
                config.polling.poll_timeout_ms
            ),
        });
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError {
            field: "observability.log_level",
            message: format!(
                "unknown level '{}', expected one of {}",
                config.observability.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
