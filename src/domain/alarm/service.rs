use tracing::{debug, error, info, instrument};

use super::client::AlarmService;
use super::details::AlarmDetails;
use super::dto::{AlarmStateChangeEvent, AlarmType, UNKNOWN_STATE};
use super::tags::repeated_notification_enabled;
use crate::config::AppConfig;
use crate::domain::notification::{compose_subject, NotificationService};
use crate::utils::AppError;

/// Kinds requested from DescribeAlarms
const DESCRIBED_ALARM_TYPES: [AlarmType; 2] = [AlarmType::CompositeAlarm, AlarmType::MetricAlarm];

/// Checks whether an alarm is opted in to repeated notification, re-publishes its ALARM
/// notification to its SNS actions and reports the alarm's current state.
pub struct AlarmStatusEvaluator {
    alarm_service: AlarmService,
    notification_service: NotificationService,
    region: String,
}

impl AlarmStatusEvaluator {
    pub fn new(
        alarm_service: AlarmService,
        notification_service: NotificationService,
        region: impl Into<String>,
    ) -> Self {
        Self {
            alarm_service,
            notification_service,
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Evaluate one state-change event
    ///
    /// The returned event carries `currState`: the alarm's `StateValue` when the alarm is
    /// tagged for repeated notification, `"null"` otherwise. Every error is logged and
    /// returned; nothing is retried.
    #[instrument(skip_all, fields(region = %self.region))]
    pub async fn evaluate(
        &self,
        mut event: AlarmStateChangeEvent,
        config: &AppConfig,
    ) -> Result<AlarmStateChangeEvent, AppError> {
        info!(?event, "Received alarm state change event");

        event.set_curr_state(UNKNOWN_STATE);

        match self.current_state(&event, config).await {
            Ok(Some(state)) => event.set_curr_state(state),
            Ok(None) => {}
            Err(e) => {
                error!(error_code = e.error_code(), error = ?e, "Error: {}", e);
                return Err(e);
            }
        }

        Ok(event)
    }

    /// `None` when the alarm is not tagged for repeated notification
    async fn current_state(
        &self,
        event: &AlarmStateChangeEvent,
        config: &AppConfig,
    ) -> Result<Option<String>, AppError> {
        // 1. 이벤트에서 알람 ARN과 이름 추출
        let alarm_arn = event.alarm_arn()?;
        let alarm_name = event.alarm_name()?;

        // 2. 태그 조회 후 반복 알림 대상인지 확인
        let tags = self.alarm_service.list_tags_for_resource(alarm_arn).await?;
        info!(alarm_arn, ?tags, "Fetched alarm tags");

        let tag_filter = config.repeated_notification_tag()?;
        if !repeated_notification_enabled(&tags, &tag_filter) {
            debug!(alarm_arn, "Repeated notification not enabled");
            return Ok(None);
        }

        // 3. 알람 상세 조회 (메트릭 알람 우선, 없으면 복합 알람)
        let response = self
            .alarm_service
            .describe_alarms(alarm_name, &DESCRIBED_ALARM_TYPES)
            .await?;
        info!(alarm_name, ?response, "Described alarm");

        let record = response
            .into_selected()
            .ok_or_else(|| AppError::AlarmNotFound(alarm_name.to_string()))?;
        let details = AlarmDetails::from_record(record);

        // 4. ALARM 상태일 때만 SNS 재발송
        if details.is_in_alarm()? {
            self.notify(alarm_name, &details, config).await?;
        }

        Ok(Some(details.state_value()?.to_string()))
    }

    /// Publish to every SNS action of the alarm, in order. Returns the number of publishes.
    async fn notify(
        &self,
        alarm_name: &str,
        details: &AlarmDetails,
        config: &AppConfig,
    ) -> Result<usize, AppError> {
        let actions = details.alarm_actions()?;
        if actions.is_empty() {
            return Ok(0);
        }

        // ARN_PREFIX는 발송할 액션이 있을 때만 필요
        let sns_prefix = config.sns_action_prefix()?;
        let subject = compose_subject(alarm_name, &self.region);
        let message = details.to_message()?;

        let mut published = 0;
        for action in actions.into_iter().filter(|a| a.starts_with(&sns_prefix)) {
            self.notification_service
                .publish(action, &subject, &message)
                .await?;
            info!("Publish to {}", action);
            published += 1;
        }

        Ok(published)
    }
}
