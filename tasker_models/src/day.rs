use chrono::Weekday;
use serde::Serialize;

use crate::reminder::weekday_code;

/// Entry of the fixed weekday reference table. Monday is day 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Day {
    pub day_id: u8,
    pub day_name: &'static str,
}

impl Day {
    pub fn from_weekday(weekday: Weekday) -> Self {
        Self {
            day_id: weekday.number_from_monday() as u8,
            day_name: weekday_code(weekday),
        }
    }

    pub fn by_id(day_id: u8) -> Option<Self> {
        Self::all().into_iter().find(|day| day.day_id == day_id)
    }

    pub fn all() -> [Day; 7] {
        let mut weekday = Weekday::Mon;
        std::array::from_fn(|_| {
            let day = Self::from_weekday(weekday);
            weekday = weekday.succ();
            day
        })
    }
}
