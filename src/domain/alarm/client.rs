use std::sync::Arc;

use aws_sdk_cloudwatch::{
    error::{DisplayErrorContext, ProvideErrorMetadata},
    primitives::DateTime as SdkDateTime,
    types::{
        AlarmType as SdkAlarmType, CompositeAlarm, Dimension, Metric, MetricAlarm,
        MetricDataQuery, MetricStat, Tag as SdkTag,
    },
    Client,
};
use chrono::{DateTime, Utc};

use super::details::{AlarmAttribute, AlarmRecord, DescribeAlarmsResult};
use super::dto::{AlarmType, Tag};
use crate::utils::AppError;

/// Classify a CloudWatch SDK error into an AppError
fn classify_cloudwatch_error<E>(operation: &str, error: E) -> AppError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let code = error.code().unwrap_or("Unknown").to_string();
    let message = match error.message() {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(&error).to_string(),
    };

    AppError::CloudWatchError(format!("{} failed [{}]: {}", operation, code, message))
}

/// Alarm service interface
///
/// Abstracts the CloudWatch calls so tests can substitute a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AlarmServiceTrait: Send + Sync {
    /// Tags attached to the alarm resource, in the order CloudWatch returns them
    async fn list_tags_for_resource(&self, resource_arn: &str) -> Result<Vec<Tag>, AppError>;

    /// Alarms with the given name, restricted to the requested kinds
    async fn describe_alarms(
        &self,
        alarm_name: &str,
        alarm_types: &[AlarmType],
    ) -> Result<DescribeAlarmsResult, AppError>;
}

/// Shared alarm service handle
pub type AlarmService = Arc<dyn AlarmServiceTrait>;

/// CloudWatch-backed alarm service
#[derive(Clone)]
pub struct CloudWatchAlarmService {
    client: Client,
}

impl CloudWatchAlarmService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl AlarmServiceTrait for CloudWatchAlarmService {
    async fn list_tags_for_resource(&self, resource_arn: &str) -> Result<Vec<Tag>, AppError> {
        let output = self
            .client
            .list_tags_for_resource()
            .resource_arn(resource_arn)
            .send()
            .await
            .map_err(|e| classify_cloudwatch_error("ListTagsForResource", e))?;

        Ok(tags_from_output(output.tags()))
    }

    async fn describe_alarms(
        &self,
        alarm_name: &str,
        alarm_types: &[AlarmType],
    ) -> Result<DescribeAlarmsResult, AppError> {
        let mut request = self.client.describe_alarms().alarm_names(alarm_name);
        for alarm_type in alarm_types {
            request = request.alarm_types(SdkAlarmType::from(alarm_type.as_str()));
        }

        let output = request
            .send()
            .await
            .map_err(|e| classify_cloudwatch_error("DescribeAlarms", e))?;

        Ok(DescribeAlarmsResult {
            composite_alarms: output.composite_alarms().iter().map(composite_record).collect(),
            metric_alarms: output.metric_alarms().iter().map(metric_record).collect(),
        })
    }
}

/// Writes present SDK fields into an AlarmRecord under their API names
#[derive(Default)]
struct RecordWriter {
    record: AlarmRecord,
}

impl RecordWriter {
    fn put(&mut self, key: &str, value: AlarmAttribute) -> &mut Self {
        self.record.insert(key.to_string(), value);
        self
    }

    fn string(&mut self, key: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(v) => self.put(key, AlarmAttribute::String(v.to_string())),
            None => self,
        }
    }

    fn strings(&mut self, key: &str, values: &[String]) -> &mut Self {
        self.put(key, AlarmAttribute::string_list(values.iter().cloned()))
    }

    fn boolean(&mut self, key: &str, value: Option<bool>) -> &mut Self {
        match value {
            Some(v) => self.put(key, AlarmAttribute::Bool(v)),
            None => self,
        }
    }

    fn integer(&mut self, key: &str, value: Option<i32>) -> &mut Self {
        match value {
            Some(v) => self.put(key, AlarmAttribute::Integer(i64::from(v))),
            None => self,
        }
    }

    fn float(&mut self, key: &str, value: Option<f64>) -> &mut Self {
        match value {
            Some(v) => self.put(key, AlarmAttribute::Float(v)),
            None => self,
        }
    }

    fn timestamp(&mut self, key: &str, value: Option<&SdkDateTime>) -> &mut Self {
        match value.and_then(to_chrono) {
            Some(ts) => self.put(key, AlarmAttribute::Timestamp(ts)),
            None => self,
        }
    }

    fn finish(&mut self) -> AlarmRecord {
        std::mem::take(&mut self.record)
    }
}

/// Convert SDK tags, keeping their order. An absent key or value becomes `""`.
fn tags_from_output(tags: &[SdkTag]) -> Vec<Tag> {
    tags.iter()
        .map(|tag| Tag::new(tag.key().unwrap_or_default(), tag.value().unwrap_or_default()))
        .collect()
}

fn to_chrono(ts: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

fn dimension_attribute(dimension: &Dimension) -> AlarmAttribute {
    let mut writer = RecordWriter::default();
    writer
        .string("Name", dimension.name())
        .string("Value", dimension.value());
    AlarmAttribute::Map(writer.finish())
}

fn dimensions_attribute(dimensions: &[Dimension]) -> AlarmAttribute {
    AlarmAttribute::List(dimensions.iter().map(dimension_attribute).collect())
}

fn metric_attribute(metric: &Metric) -> AlarmAttribute {
    let mut writer = RecordWriter::default();
    writer
        .string("Namespace", metric.namespace())
        .string("MetricName", metric.metric_name())
        .put("Dimensions", dimensions_attribute(metric.dimensions()));
    AlarmAttribute::Map(writer.finish())
}

fn metric_stat_attribute(stat: &MetricStat) -> AlarmAttribute {
    let mut writer = RecordWriter::default();
    if let Some(metric) = stat.metric() {
        writer.put("Metric", metric_attribute(metric));
    }
    writer
        .integer("Period", stat.period())
        .string("Stat", stat.stat())
        .string("Unit", stat.unit().map(|u| u.as_str()));
    AlarmAttribute::Map(writer.finish())
}

/// One metric-math query of a metric alarm
fn metric_query_attribute(query: &MetricDataQuery) -> AlarmAttribute {
    let mut writer = RecordWriter::default();
    writer.string("Id", query.id());
    if let Some(stat) = query.metric_stat() {
        writer.put("MetricStat", metric_stat_attribute(stat));
    }
    writer
        .string("Expression", query.expression())
        .string("Label", query.label())
        .boolean("ReturnData", query.return_data())
        .integer("Period", query.period())
        .string("AccountId", query.account_id());
    AlarmAttribute::Map(writer.finish())
}

fn metric_record(alarm: &MetricAlarm) -> AlarmRecord {
    let mut writer = RecordWriter::default();
    writer
        .string("AlarmName", alarm.alarm_name())
        .string("AlarmArn", alarm.alarm_arn())
        .string("AlarmDescription", alarm.alarm_description())
        .timestamp(
            "AlarmConfigurationUpdatedTimestamp",
            alarm.alarm_configuration_updated_timestamp(),
        )
        .boolean("ActionsEnabled", alarm.actions_enabled())
        .strings("OKActions", alarm.ok_actions())
        .strings("AlarmActions", alarm.alarm_actions())
        .strings("InsufficientDataActions", alarm.insufficient_data_actions())
        .string("StateValue", alarm.state_value().map(|s| s.as_str()))
        .string("StateReason", alarm.state_reason())
        .string("StateReasonData", alarm.state_reason_data())
        .timestamp("StateUpdatedTimestamp", alarm.state_updated_timestamp())
        .string("MetricName", alarm.metric_name())
        .string("Namespace", alarm.namespace())
        .string("Statistic", alarm.statistic().map(|s| s.as_str()))
        .string("ExtendedStatistic", alarm.extended_statistic())
        .put("Dimensions", dimensions_attribute(alarm.dimensions()))
        .integer("Period", alarm.period())
        .string("Unit", alarm.unit().map(|u| u.as_str()))
        .integer("EvaluationPeriods", alarm.evaluation_periods())
        .integer("DatapointsToAlarm", alarm.datapoints_to_alarm())
        .float("Threshold", alarm.threshold())
        .string(
            "ComparisonOperator",
            alarm.comparison_operator().map(|c| c.as_str()),
        )
        .string("TreatMissingData", alarm.treat_missing_data())
        .string(
            "EvaluateLowSampleCountPercentile",
            alarm.evaluate_low_sample_count_percentile(),
        )
        .put(
            "Metrics",
            AlarmAttribute::List(alarm.metrics().iter().map(metric_query_attribute).collect()),
        )
        .string("ThresholdMetricId", alarm.threshold_metric_id())
        .string("EvaluationState", alarm.evaluation_state().map(|e| e.as_str()))
        .timestamp(
            "StateTransitionedTimestamp",
            alarm.state_transitioned_timestamp(),
        );
    writer.finish()
}

fn composite_record(alarm: &CompositeAlarm) -> AlarmRecord {
    let mut writer = RecordWriter::default();
    writer
        .boolean("ActionsEnabled", alarm.actions_enabled())
        .strings("AlarmActions", alarm.alarm_actions())
        .string("AlarmArn", alarm.alarm_arn())
        .timestamp(
            "AlarmConfigurationUpdatedTimestamp",
            alarm.alarm_configuration_updated_timestamp(),
        )
        .string("AlarmDescription", alarm.alarm_description())
        .string("AlarmName", alarm.alarm_name())
        .string("AlarmRule", alarm.alarm_rule())
        .strings("InsufficientDataActions", alarm.insufficient_data_actions())
        .strings("OKActions", alarm.ok_actions())
        .string("StateReason", alarm.state_reason())
        .string("StateReasonData", alarm.state_reason_data())
        .timestamp("StateUpdatedTimestamp", alarm.state_updated_timestamp())
        .string("StateValue", alarm.state_value().map(|s| s.as_str()))
        .timestamp(
            "StateTransitionedTimestamp",
            alarm.state_transitioned_timestamp(),
        )
        .string(
            "ActionsSuppressedBy",
            alarm.actions_suppressed_by().map(|a| a.as_str()),
        )
        .string("ActionsSuppressedReason", alarm.actions_suppressed_reason())
        .string("ActionsSuppressor", alarm.actions_suppressor())
        .integer(
            "ActionsSuppressorWaitPeriod",
            alarm.actions_suppressor_wait_period(),
        )
        .integer(
            "ActionsSuppressorExtensionPeriod",
            alarm.actions_suppressor_extension_period(),
        );
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_cloudwatch::types::{ComparisonOperator, EvaluationState, StateValue};
    use std::collections::BTreeMap;
    use chrono::TimeZone;

    #[test]
    fn should_map_metric_alarm_fields() {
        // Arrange
        let alarm = MetricAlarm::builder()
            .alarm_name("HighCpu")
            .state_value(StateValue::Alarm)
            .alarm_actions("arn:aws:sns:us-east-1:111:topic1")
            .threshold(80.0)
            .evaluation_periods(3)
            .comparison_operator(ComparisonOperator::GreaterThanThreshold)
            .state_updated_timestamp(SdkDateTime::from_secs(1_646_129_730))
            .state_transitioned_timestamp(SdkDateTime::from_secs(1_646_129_730))
            .evaluation_state(EvaluationState::PartialData)
            .metrics(
                MetricDataQuery::builder()
                    .id("e1")
                    .expression("m1 * 100")
                    .label("CPU percent")
                    .return_data(true)
                    .build(),
            )
            .metrics(
                MetricDataQuery::builder()
                    .id("m1")
                    .metric_stat(
                        MetricStat::builder()
                            .metric(
                                Metric::builder()
                                    .namespace("AWS/EC2")
                                    .metric_name("CPUUtilization")
                                    .dimensions(
                                        Dimension::builder()
                                            .name("InstanceId")
                                            .value("i-123")
                                            .build(),
                                    )
                                    .build(),
                            )
                            .period(300)
                            .stat("Average")
                            .build(),
                    )
                    .return_data(false)
                    .build(),
            )
            .build();

        // Act
        let record = metric_record(&alarm);

        // Assert
        assert_eq!(record["AlarmName"], AlarmAttribute::from("HighCpu"));
        assert_eq!(record["StateValue"], AlarmAttribute::from("ALARM"));
        assert_eq!(
            record["AlarmActions"],
            AlarmAttribute::string_list(["arn:aws:sns:us-east-1:111:topic1"])
        );
        assert_eq!(record["Threshold"], AlarmAttribute::Float(80.0));
        assert_eq!(record["EvaluationPeriods"], AlarmAttribute::Integer(3));
        assert_eq!(
            record["ComparisonOperator"],
            AlarmAttribute::from("GreaterThanThreshold")
        );
        assert_eq!(
            record["StateUpdatedTimestamp"],
            AlarmAttribute::Timestamp(Utc.with_ymd_and_hms(2022, 3, 1, 10, 15, 30).unwrap())
        );
        assert_eq!(
            record["StateTransitionedTimestamp"],
            AlarmAttribute::Timestamp(Utc.with_ymd_and_hms(2022, 3, 1, 10, 15, 30).unwrap())
        );
        assert_eq!(record["EvaluationState"], AlarmAttribute::from("PARTIAL_DATA"));
        assert!(!record.contains_key("AlarmDescription"));

        let AlarmAttribute::List(metrics) = &record["Metrics"] else {
            panic!("Metrics should be a list");
        };
        assert_eq!(metrics.len(), 2);

        let mut expression = BTreeMap::new();
        expression.insert("Id".to_string(), AlarmAttribute::from("e1"));
        expression.insert("Expression".to_string(), AlarmAttribute::from("m1 * 100"));
        expression.insert("Label".to_string(), AlarmAttribute::from("CPU percent"));
        expression.insert("ReturnData".to_string(), AlarmAttribute::Bool(true));
        assert_eq!(metrics[0], AlarmAttribute::Map(expression));

        let normalized = metrics[1].clone().into_json();
        assert_eq!(
            normalized,
            serde_json::json!({
                "Id": "m1",
                "MetricStat": {
                    "Metric": {
                        "Namespace": "AWS/EC2",
                        "MetricName": "CPUUtilization",
                        "Dimensions": [{ "Name": "InstanceId", "Value": "i-123" }]
                    },
                    "Period": 300,
                    "Stat": "Average"
                },
                "ReturnData": false
            })
        );
    }

    #[test]
    fn should_leave_out_absent_dimension_value() {
        let alarm = MetricAlarm::builder()
            .dimensions(Dimension::builder().name("InstanceId").build())
            .build();

        let record = metric_record(&alarm);

        assert_eq!(
            record["Dimensions"].clone().into_json(),
            serde_json::json!([{ "Name": "InstanceId" }])
        );
    }

    #[test]
    fn should_map_list_tags_output() {
        // Arrange
        let tags = vec![
            SdkTag::builder().key("Team").value("ops").build(),
            SdkTag::builder().key("RepeatedAlarm").build(),
            SdkTag::builder()
                .key("TagForRepeatedNotification")
                .value("true")
                .build(),
        ];

        // Act
        let mapped = tags_from_output(&tags);

        // Assert
        assert_eq!(
            mapped,
            vec![
                Tag::new("Team", "ops"),
                Tag::new("RepeatedAlarm", ""),
                Tag::new("TagForRepeatedNotification", "true"),
            ]
        );
    }

    #[test]
    fn should_map_composite_alarm_fields() {
        let alarm = CompositeAlarm::builder()
            .alarm_name("ServiceDown")
            .alarm_rule("ALARM(HighCpu)")
            .state_value(StateValue::Ok)
            .state_transitioned_timestamp(SdkDateTime::from_secs(1_646_129_730))
            .build();

        let record = composite_record(&alarm);

        assert_eq!(record["AlarmName"], AlarmAttribute::from("ServiceDown"));
        assert_eq!(record["AlarmRule"], AlarmAttribute::from("ALARM(HighCpu)"));
        assert_eq!(record["StateValue"], AlarmAttribute::from("OK"));
        assert_eq!(record["AlarmActions"], AlarmAttribute::List(vec![]));
        assert_eq!(
            record["StateTransitionedTimestamp"].clone().into_json(),
            serde_json::json!("2022-03-01 10:15:30+00:00")
        );
    }

    #[test]
    fn should_convert_sdk_timestamp_with_subsecond_precision() {
        let ts = SdkDateTime::from_millis(1_646_129_730_250);

        let converted = to_chrono(&ts).unwrap();

        assert_eq!(converted.timestamp_subsec_millis(), 250);
        assert_eq!(converted.timestamp(), 1_646_129_730);
    }
}
