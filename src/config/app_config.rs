use std::env;

use crate::utils::AppError;

/// Environment variable holding the ARN prefix of the current partition (e.g. `arn:aws:`)
pub const ARN_PREFIX_VAR: &str = "ARN_PREFIX";
/// Environment variable holding the `key:value` tag that opts an alarm in
pub const REPEATED_NOTIFICATION_TAG_VAR: &str = "TagForRepeatedNotification";

/// Per-invocation settings
///
/// Both values are optional at load time. They are checked where they are used, so an
/// invocation only fails for a setting it actually needs.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    arn_prefix: Option<String>,
    repeated_notification_tag: Option<String>,
}

impl AppConfig {
    /// Load settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary lookup, mainly for tests
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            arn_prefix: lookup(ARN_PREFIX_VAR),
            repeated_notification_tag: lookup(REPEATED_NOTIFICATION_TAG_VAR),
        }
    }

    pub fn new(arn_prefix: impl Into<String>, repeated_notification_tag: impl Into<String>) -> Self {
        Self {
            arn_prefix: Some(arn_prefix.into()),
            repeated_notification_tag: Some(repeated_notification_tag.into()),
        }
    }

    pub fn arn_prefix(&self) -> Result<&str, AppError> {
        self.arn_prefix
            .as_deref()
            .ok_or(AppError::MissingConfig(ARN_PREFIX_VAR))
    }

    /// Prefix an alarm action must start with to be treated as an SNS topic
    pub fn sns_action_prefix(&self) -> Result<String, AppError> {
        Ok(format!("{}sns", self.arn_prefix()?))
    }

    pub fn repeated_notification_tag(&self) -> Result<TagFilter, AppError> {
        let raw = self
            .repeated_notification_tag
            .as_deref()
            .ok_or(AppError::MissingConfig(REPEATED_NOTIFICATION_TAG_VAR))?;

        TagFilter::parse(raw)
    }
}

/// Tag key/value pair an alarm must carry for repeated notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub key: String,
    pub value: String,
}

impl TagFilter {
    /// Parse `key:value`, splitting on the first `:`
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let (key, value) = raw.split_once(':').ok_or_else(|| {
            AppError::invalid_config(format!(
                "{} must be in key:value format, got {:?}",
                REPEATED_NOTIFICATION_TAG_VAR, raw
            ))
        })?;

        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}
