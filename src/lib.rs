pub mod config;
pub mod domain;
pub mod utils;

pub use config::AppConfig;
pub use domain::alarm::{
    check_alarm_status_handler, AlarmService, AlarmServiceTrait, AlarmStatusEvaluator,
    CloudWatchAlarmService,
};
pub use domain::notification::{NotificationService, NotificationServiceTrait, SnsNotificationService};
pub use utils::AppError;
