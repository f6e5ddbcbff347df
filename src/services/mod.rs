pub mod alarms;
pub mod groups;
pub mod metrics;
