use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {message}")]
    Invalid { message: String },
    #[error("invalid webhook endpoint '{url}': {message}")]
    InvalidEndpoint { url: String, message: String },
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid { message } => format!("Check the shortgen settings: {message}"),
            Self::InvalidEndpoint { url, message } => {
                format!("The webhook endpoint '{url}' is not a valid URL: {message}")
            }
        }
    }
}

pub fn read_env_var(name: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(error) => Err(ConfigError::invalid(format!(
            "{name} could not be read: {error}"
        ))),
    }
}

pub fn parse_positive_integer(name: &str, value: &str, unit: &str) -> Result<u64, ConfigError> {
    let parsed = value.trim().parse::<u64>().map_err(|_| {
        ConfigError::invalid(format!("{name} must be a positive integer in {unit}"))
    })?;
    if parsed == 0 {
        return Err(ConfigError::invalid(format!(
            "{name} must be greater than 0 {unit}"
        )));
    }
    Ok(parsed)
}

pub fn parse_timeout_seconds(name: &str, value: &str) -> Result<Duration, ConfigError> {
    parse_positive_integer(name, value, "seconds").map(Duration::from_secs)
}

pub fn parse_delay_millis(name: &str, value: &str) -> Result<Duration, ConfigError> {
    parse_positive_integer(name, value, "milliseconds").map(Duration::from_millis)
}

pub fn read_timeout_from_env(name: &str) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = read_env_var(name)? else {
        return Ok(None);
    };
    Ok(Some(parse_timeout_seconds(name, &value)?))
}

pub fn read_delay_from_env(name: &str) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = read_env_var(name)? else {
        return Ok(None);
    };
    Ok(Some(parse_delay_millis(name, &value)?))
}

pub fn parse_truthy_flag(raw: &str) -> bool {
    let raw = raw.trim();
    raw.eq_ignore_ascii_case("1")
        || raw.eq_ignore_ascii_case("true")
        || raw.eq_ignore_ascii_case("yes")
        || raw.eq_ignore_ascii_case("on")
}

/// Unset or unreadable flags count as off.
pub fn read_flag_from_env(name: &str) -> bool {
    read_env_var(name)
        .ok()
        .flatten()
        .as_deref()
        .is_some_and(parse_truthy_flag)
}
