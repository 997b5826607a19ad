pub mod client;
pub mod subject;

pub use client::{NotificationService, NotificationServiceTrait, SnsNotificationService};
pub use subject::compose_subject;
