use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

/// Format accepted from the browser's `datetime-local` input.
pub const FORM_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
/// Format used when rendering a group's alarms.
pub const VIEW_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// ISO-8601 without offset, as the notification worker expects.
pub const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alarm {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub alarm_time: NaiveDateTime,
    pub group_id: i64,
    pub is_done: bool,
    pub notify_before_minutes: Option<i64>,
}

/// Form body for POST /add. Numeric fields arrive as raw strings and are parsed leniently.
#[derive(Debug, Deserialize)]
pub struct AddAlarmForm {
    pub title: String,
    pub description: String,
    pub alarm_time: String,
    pub notify_before_minutes: Option<String>,
    pub group_id: Option<String>,
}

/// Validated input for inserting an alarm.
#[derive(Debug, Clone)]
pub struct NewAlarm {
    pub title: String,
    pub description: String,
    pub alarm_time: NaiveDateTime,
    pub group_id: i64,
    pub notify_before_minutes: i64,
}

impl AddAlarmForm {
    /// A missing, zero or unparsable group id means no group was selected.
    pub fn selected_group(&self) -> Option<i64> {
        parse_lenient_int(self.group_id.as_deref()).filter(|id| *id != 0)
    }

    pub fn into_new_alarm(self, group_id: i64) -> Result<NewAlarm, AppError> {
        let alarm_time = parse_alarm_time(&self.alarm_time)?;
        Ok(NewAlarm {
            notify_before_minutes: parse_lenient_int(self.notify_before_minutes.as_deref())
                .unwrap_or(0),
            title: self.title,
            description: self.description,
            alarm_time,
            group_id,
        })
    }
}

pub fn parse_alarm_time(raw: &str) -> Result<NaiveDateTime, AppError> {
    NaiveDateTime::parse_from_str(raw.trim(), FORM_TIME_FORMAT)
        .map_err(|_| AppError::Validation("Invalid alarm time!".into()))
}

/// Integers from HTML forms: empty or garbage values count as absent.
pub fn parse_lenient_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// An alarm as rendered inside a group page and handed to the client timer.
#[derive(Debug, Clone, Serialize)]
pub struct AlarmView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub alarm_time: String,
    pub group_id: i64,
    pub is_done: bool,
    pub notify_before_minutes: i64,
}

impl From<Alarm> for AlarmView {
    fn from(a: Alarm) -> Self {
        Self {
            id: a.id,
            title: a.title,
            description: a.description.unwrap_or_default(),
            alarm_time: a.alarm_time.format(VIEW_TIME_FORMAT).to_string(),
            group_id: a.group_id,
            is_done: a.is_done,
            notify_before_minutes: a.notify_before_minutes.unwrap_or(0),
        }
    }
}

/// An alarm as served by GET /api/alarms.
#[derive(Debug, Clone, Serialize)]
pub struct ApiAlarm {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub alarm_time: String,
    pub notify_before_minutes: i64,
    pub is_done: bool,
}

impl From<Alarm> for ApiAlarm {
    fn from(a: Alarm) -> Self {
        Self {
            id: a.id,
            title: a.title,
            description: a.description.unwrap_or_default(),
            alarm_time: a.alarm_time.format(API_TIME_FORMAT).to_string(),
            notify_before_minutes: a.notify_before_minutes.unwrap_or(0),
            is_done: a.is_done,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AlarmsResponse {
    pub alarms: Vec<ApiAlarm>,
}
