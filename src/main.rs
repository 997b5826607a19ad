use std::sync::Arc;

use aws_config::BehaviorVersion;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use repeated_alarm_notifier::{
    check_alarm_status_handler,
    utils::{init_logging, DEFAULT_FILTER},
    AlarmStatusEvaluator, AppError, CloudWatchAlarmService, SnsNotificationService,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 로깅 초기화
    if !init_logging(DEFAULT_FILTER) {
        eprintln!("Tracing subscriber already installed, keeping it");
    }

    // 3. AWS 클라이언트 구성
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let region = sdk_config
        .region()
        .map(ToString::to_string)
        .ok_or(AppError::MissingConfig("AWS_REGION"))?;

    let evaluator = AlarmStatusEvaluator::new(
        Arc::new(CloudWatchAlarmService::new(aws_sdk_cloudwatch::Client::new(
            &sdk_config,
        ))),
        Arc::new(SnsNotificationService::new(aws_sdk_sns::Client::new(
            &sdk_config,
        ))),
        region,
    );
    tracing::info!(region = evaluator.region(), "Alarm status evaluator ready");

    // 4. 런타임 실행
    let evaluator = &evaluator;
    run(service_fn(move |event: LambdaEvent<_>| async move {
        check_alarm_status_handler(evaluator, event).await
    }))
    .await
}
