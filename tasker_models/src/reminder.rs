use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::task::TaskId;

pub type ReminderId = Uuid;

/// Recurrence family of a reminder, keyed by its single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// `n`: repeats every few minutes within the day.
    SameDay,
    /// `d`
    Daily,
    /// `w`
    Weekly,
    /// `m`
    Monthly,
    /// `y`
    Yearly,
    /// `s`: repeats on selected weekdays.
    SpecificDays,
}

impl Frequency {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "n" => Some(Self::SameDay),
            "d" => Some(Self::Daily),
            "w" => Some(Self::Weekly),
            "m" => Some(Self::Monthly),
            "y" => Some(Self::Yearly),
            "s" => Some(Self::SpecificDays),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::SameDay => "n",
            Self::Daily => "d",
            Self::Weekly => "w",
            Self::Monthly => "m",
            Self::Yearly => "y",
            Self::SpecificDays => "s",
        }
    }
}

pub fn parse_weekday(code: &str) -> Option<Weekday> {
    match code {
        "mon" => Some(Weekday::Mon),
        "tue" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

/// A recurring notification definition attached to a task.
///
/// `frequency` and `repeat_days` keep the submitted codes verbatim so a
/// malformed definition can still be represented and rejected with a
/// precise reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub reminder_id: ReminderId,
    pub task_id: TaskId,
    pub reminder: String,
    #[serde(default)]
    pub description: String,
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub repeat_days: Vec<String>,
    #[serde(default)]
    pub repeat_sameday: bool,
    pub repeat_until: Option<DateTime<Utc>>,
    #[serde(alias = "inteval")]
    pub interval: Option<i64>,
    pub interval_in_minutes: Option<i64>,
    pub next_reminder: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reminder {
    pub fn frequency(&self) -> Option<Frequency> {
        Frequency::from_code(&self.frequency)
    }
}
