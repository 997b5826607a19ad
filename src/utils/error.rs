use thiserror::Error;

/// Crate-wide error type
///
/// Every variant is fatal for the invocation. The handler logs it and hands it back to the
/// Lambda runtime, which reports the failure to the invoking state machine.
#[derive(Debug, Error)]
pub enum AppError {
    /// The incoming state-change event is missing a required field
    #[error("Malformed alarm event: {0}")]
    MalformedEvent(String),

    /// The alarm record returned by CloudWatch is missing a required field
    #[error("Malformed alarm details: {0}")]
    MalformedAlarm(String),

    #[error("Environment variable {0} is not set")]
    MissingConfig(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// DescribeAlarms returned neither a metric nor a composite alarm
    #[error("No metric or composite alarm named {0:?}")]
    AlarmNotFound(String),

    #[error("CloudWatch error: {0}")]
    CloudWatchError(String),

    #[error("SNS error: {0}")]
    SnsError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Stable error code, emitted alongside the message in logs
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MalformedEvent(_) => "EVENT_001",
            AppError::MalformedAlarm(_) => "ALARM_002",
            AppError::MissingConfig(_) => "CONFIG_001",
            AppError::InvalidConfig(_) => "CONFIG_002",
            AppError::AlarmNotFound(_) => "ALARM_001",
            AppError::CloudWatchError(_) => "CW_001",
            AppError::SnsError(_) => "SNS_001",
            AppError::Serialization(_) => "COMMON500",
        }
    }
}

/// Convenience constructors
impl AppError {
    pub fn malformed_event(msg: impl Into<String>) -> Self {
        AppError::MalformedEvent(msg.into())
    }

    pub fn malformed_alarm(msg: impl Into<String>) -> Self {
        AppError::MalformedAlarm(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        AppError::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_missing_config_with_variable_name() {
        // Arrange
        let error = AppError::MissingConfig("ARN_PREFIX");

        // Act
        let message = error.to_string();

        // Assert
        assert_eq!(message, "Environment variable ARN_PREFIX is not set");
        assert_eq!(error.error_code(), "CONFIG_001");
    }

    #[test]
    fn should_quote_alarm_name_when_alarm_not_found() {
        let error = AppError::AlarmNotFound("cpu high".to_string());

        assert_eq!(error.to_string(), "No metric or composite alarm named \"cpu high\"");
        assert_eq!(error.error_code(), "ALARM_001");
    }

    #[test]
    fn should_convert_serde_json_error() {
        // Arrange
        let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

        // Act
        let error: AppError = parse_error.into();

        // Assert
        assert!(matches!(error, AppError::Serialization(_)));
        assert_eq!(error.error_code(), "COMMON500");
    }
}
