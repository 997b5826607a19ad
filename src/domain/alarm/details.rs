//! Alarm records as fetched from CloudWatch and their normalized JSON form.
//!
//! The client maps SDK alarm structs into an [`AlarmRecord`] that still carries real
//! timestamps. [`AlarmDetails::from_record`] renders those timestamps as strings so the
//! result is plain JSON that can be sent as an SNS message body.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::utils::AppError;

pub const STATE_VALUE_FIELD: &str = "StateValue";
pub const ALARM_ACTIONS_FIELD: &str = "AlarmActions";
pub const ALARM_STATE: &str = "ALARM";

/// Attribute value of a raw alarm record
#[derive(Debug, Clone, PartialEq)]
pub enum AlarmAttribute {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    List(Vec<AlarmAttribute>),
    Map(BTreeMap<String, AlarmAttribute>),
}

/// One alarm as returned by DescribeAlarms, keyed by the API's PascalCase field names
pub type AlarmRecord = BTreeMap<String, AlarmAttribute>;

impl AlarmAttribute {
    pub fn string_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AlarmAttribute::List(
            items
                .into_iter()
                .map(|item| AlarmAttribute::String(item.into()))
                .collect(),
        )
    }

    /// Convert to JSON, rendering timestamps as strings
    pub fn into_json(self) -> Value {
        match self {
            AlarmAttribute::Null => Value::Null,
            AlarmAttribute::Bool(b) => Value::Bool(b),
            AlarmAttribute::Integer(i) => Value::Number(i.into()),
            AlarmAttribute::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            AlarmAttribute::String(s) => Value::String(s),
            AlarmAttribute::Timestamp(ts) => Value::String(format_timestamp(&ts)),
            AlarmAttribute::List(items) => {
                Value::Array(items.into_iter().map(AlarmAttribute::into_json).collect())
            }
            AlarmAttribute::Map(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for AlarmAttribute {
    fn from(value: &str) -> Self {
        AlarmAttribute::String(value.to_string())
    }
}

impl From<String> for AlarmAttribute {
    fn from(value: String) -> Self {
        AlarmAttribute::String(value)
    }
}

impl From<DateTime<Utc>> for AlarmAttribute {
    fn from(value: DateTime<Utc>) -> Self {
        AlarmAttribute::Timestamp(value)
    }
}

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS[.ffffff]+00:00`
///
/// Microsecond precision; the fraction is omitted when it is zero.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    if ts.timestamp_subsec_micros() == 0 {
        ts.format("%Y-%m-%d %H:%M:%S+00:00").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S%.6f+00:00").to_string()
    }
}

/// Result of DescribeAlarms filtered to composite and metric alarms
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescribeAlarmsResult {
    pub composite_alarms: Vec<AlarmRecord>,
    pub metric_alarms: Vec<AlarmRecord>,
}

impl DescribeAlarmsResult {
    /// First metric alarm if any, otherwise first composite alarm
    pub fn into_selected(self) -> Option<AlarmRecord> {
        self.metric_alarms
            .into_iter()
            .next()
            .or_else(|| self.composite_alarms.into_iter().next())
    }
}

/// Normalized alarm details, serializable as plain JSON
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct AlarmDetails {
    fields: Map<String, Value>,
}

impl AlarmDetails {
    pub fn from_record(record: AlarmRecord) -> Self {
        Self {
            fields: record
                .into_iter()
                .map(|(k, v)| (k, v.into_json()))
                .collect(),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn state_value(&self) -> Result<&str, AppError> {
        self.fields
            .get(STATE_VALUE_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::malformed_alarm("StateValue is missing"))
    }

    pub fn is_in_alarm(&self) -> Result<bool, AppError> {
        Ok(self.state_value()? == ALARM_STATE)
    }

    /// Configured alarm actions, in order
    pub fn alarm_actions(&self) -> Result<Vec<&str>, AppError> {
        let actions = self
            .fields
            .get(ALARM_ACTIONS_FIELD)
            .and_then(Value::as_array)
            .ok_or_else(|| AppError::malformed_alarm("AlarmActions is missing"))?;

        actions
            .iter()
            .map(|action| {
                action
                    .as_str()
                    .ok_or_else(|| AppError::malformed_alarm("AlarmActions entry is not a string"))
            })
            .collect()
    }

    /// JSON message body for SNS
    pub fn to_message(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string(&self.fields)?)
    }
}
