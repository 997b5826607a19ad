use lambda_runtime::{Error, LambdaEvent};
use tracing::instrument;

use super::dto::AlarmStateChangeEvent;
use super::service::AlarmStatusEvaluator;
use crate::config::AppConfig;

/// Lambda entrypoint for the check-alarm-status function
///
/// Settings are read from the environment on every invocation.
#[instrument(skip_all, fields(request_id = %event.context.request_id))]
pub async fn check_alarm_status_handler(
    evaluator: &AlarmStatusEvaluator,
    event: LambdaEvent<AlarmStateChangeEvent>,
) -> Result<AlarmStateChangeEvent, Error> {
    let config = AppConfig::from_env();

    Ok(evaluator.evaluate(event.payload, &config).await?)
}
