pub mod client;
pub mod details;
pub mod dto;
pub mod handler;
pub mod service;
pub mod tags;

pub use client::{AlarmService, AlarmServiceTrait, CloudWatchAlarmService};
pub use details::{AlarmAttribute, AlarmDetails, AlarmRecord, DescribeAlarmsResult};
pub use dto::{AlarmStateChangeEvent, AlarmType, Tag};
pub use handler::check_alarm_status_handler;
pub use service::AlarmStatusEvaluator;
pub use tags::repeated_notification_enabled;
