use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::AppError;

/// Value reported in `currState` when the alarm was not evaluated
pub const UNKNOWN_STATE: &str = "null";

/// EventBridge "CloudWatch Alarm State Change" event
///
/// The state machine feeds the returned event back in as the next input, so fields this
/// crate does not read are carried through untouched.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AlarmStateChangeEvent {
    #[serde(default)]
    pub resources: Vec<String>,

    #[serde(default)]
    pub detail: AlarmChangeDetail,

    #[serde(rename = "currState", default, skip_serializing_if = "Option::is_none")]
    pub curr_state: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmChangeDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alarm_name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AlarmStateChangeEvent {
    /// ARN of the alarm that changed state (`resources[0]`)
    pub fn alarm_arn(&self) -> Result<&str, AppError> {
        self.resources
            .first()
            .map(String::as_str)
            .ok_or_else(|| AppError::malformed_event("resources is empty"))
    }

    pub fn alarm_name(&self) -> Result<&str, AppError> {
        self.detail
            .alarm_name
            .as_deref()
            .ok_or_else(|| AppError::malformed_event("detail.alarmName is missing"))
    }

    pub fn set_curr_state(&mut self, state: impl Into<String>) {
        self.curr_state = Some(state.into());
    }
}

/// Resource tag as returned by ListTagsForResource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmType {
    CompositeAlarm,
    MetricAlarm,
}

impl AlarmType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmType::CompositeAlarm => "CompositeAlarm",
            AlarmType::MetricAlarm => "MetricAlarm",
        }
    }
}
