use chrono::{DateTime, Utc};
use tasker_models::reminder::Reminder;
use uuid::Uuid;


pub(crate) fn at(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().unwrap()
}

pub(crate) fn reminder(frequency: &str, start_time: &str) -> Reminder {
    let start = at(start_time);
    Reminder {
        reminder_id: Uuid::new_v4(),
        task_id: Uuid::new_v4(),
        reminder: "Stretch".to_string(),
        description: "Stand up and stretch".to_string(),
        start_time: Some(start),
        frequency: frequency.to_string(),
        repeat_days: Vec::new(),
        repeat_sameday: false,
        repeat_until: None,
        interval: None,
        interval_in_minutes: None,
        next_reminder: None,
        created_at: start,
        updated_at: start,
    }
}

pub(crate) fn days(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|code| code.to_string()).collect()
}
