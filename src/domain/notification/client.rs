use std::sync::Arc;

use aws_sdk_sns::{
    error::{DisplayErrorContext, ProvideErrorMetadata},
    Client,
};
use tracing::debug;

use crate::utils::AppError;

/// Classify an SNS SDK error into an AppError
fn classify_sns_error<E>(error: E) -> AppError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let code = error.code().unwrap_or("Unknown").to_string();
    let message = match error.message() {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(&error).to_string(),
    };

    AppError::SnsError(format!("Publish failed [{}]: {}", code, message))
}

/// Notification service interface
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    /// Publish one message to a topic
    async fn publish(&self, topic_arn: &str, subject: &str, message: &str) -> Result<(), AppError>;
}

pub type NotificationService = Arc<dyn NotificationServiceTrait>;

/// SNS-backed notification service
#[derive(Clone)]
pub struct SnsNotificationService {
    client: Client,
}

impl SnsNotificationService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl NotificationServiceTrait for SnsNotificationService {
    async fn publish(&self, topic_arn: &str, subject: &str, message: &str) -> Result<(), AppError> {
        let output = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .map_err(classify_sns_error)?;

        debug!(topic_arn, message_id = ?output.message_id(), "SNS publish accepted");
        Ok(())
    }
}
