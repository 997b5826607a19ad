pub mod alarm;
pub mod notification;
