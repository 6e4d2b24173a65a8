//! Reminder recurrence rules.
//!
//! [`validate`] decides whether a reminder definition is well formed for its
//! declared frequency and returns the first occurrence after `start_time`.
//! [`Recurrence::next_occurrence_after`] walks the same schedule forward and
//! is what keeps `next_reminder` moving once a reminder has fired.
//!
//! Everything here is a pure function of the definition fields. A stored
//! `next_reminder` is never read, so re-validating an unchanged reminder
//! always yields the same verdict and the same occurrence.

mod error;
mod weekdays;

use chrono::{DateTime, Datelike, Duration, Months, Utc};
use tasker_models::reminder::{Frequency, Reminder, parse_weekday};

pub use error::RecurrenceError;
pub use weekdays::WeekdaySet;

/// `interval_in_minutes` must stay strictly below one day.
pub const MINUTES_PER_DAY: i64 = 1440;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarUnit {
    Day,
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rule {
    Minutes {
        every: i64,
        until: Option<DateTime<Utc>>,
    },
    Calendar {
        unit: CalendarUnit,
        every: u32,
        until: DateTime<Utc>,
    },
    Weekdays {
        days: WeekdaySet,
        every_weeks: u32,
        until: DateTime<Utc>,
    },
}

/// A field-checked recurrence anchored at the reminder's `start_time`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recurrence {
    start: DateTime<Utc>,
    frequency: Frequency,
    rule: Rule,
}

/// Checks the reminder and returns its next occurrence.
pub fn validate(reminder: &Reminder) -> Result<DateTime<Utc>, RecurrenceError> {
    Recurrence::from_reminder(reminder)?
        .first_occurrence()
        .ok_or(RecurrenceError::UnschedulableOccurrence)
}

/// The next occurrence of a reminder. Only defined for a valid definition,
/// so this shares its failure reasons with [`validate`].
pub fn compute_next(reminder: &Reminder) -> Result<DateTime<Utc>, RecurrenceError> {
    validate(reminder)
}

pub fn is_valid(reminder: &Reminder) -> bool {
    validate(reminder).is_ok()
}

impl Recurrence {
    /// Runs the field checks and builds the typed rule. Does not look at
    /// whether any occurrence actually fits before `repeat_until`.
    pub fn from_reminder(reminder: &Reminder) -> Result<Self, RecurrenceError> {
        if reminder.reminder.trim().is_empty() {
            return Err(RecurrenceError::MissingField("reminder"));
        }
        if reminder.reminder_id.is_nil() {
            return Err(RecurrenceError::MissingField("reminder_id"));
        }
        if reminder.task_id.is_nil() {
            return Err(RecurrenceError::MissingField("task_id"));
        }
        let start = reminder
            .start_time
            .ok_or(RecurrenceError::MissingField("start_time"))?;

        let frequency = reminder
            .frequency()
            .ok_or_else(|| RecurrenceError::InvalidFrequencyCode(reminder.frequency.clone()))?;

        let rule = match frequency {
            Frequency::SameDay => same_day_rule(reminder)?,
            Frequency::Daily => calendar_rule(reminder, frequency, CalendarUnit::Day)?,
            Frequency::Weekly => calendar_rule(reminder, frequency, CalendarUnit::Week)?,
            Frequency::Monthly => calendar_rule(reminder, frequency, CalendarUnit::Month)?,
            Frequency::Yearly => calendar_rule(reminder, frequency, CalendarUnit::Year)?,
            Frequency::SpecificDays => weekday_rule(reminder, frequency)?,
        };

        Ok(Self {
            start,
            frequency,
            rule,
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// First occurrence strictly after `start_time`. For same-day
    /// reminders `repeat_until` only ends the series later on and does not
    /// bound the first occurrence.
    pub fn first_occurrence(&self) -> Option<DateTime<Utc>> {
        match &self.rule {
            Rule::Minutes { every, .. } => {
                self.start.checked_add_signed(Duration::try_minutes(*every)?)
            }
            _ => self.next_occurrence_after(self.start),
        }
    }

    /// First occurrence strictly after `after`, or `None` once the
    /// recurrence has run past its bound.
    pub fn next_occurrence_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match &self.rule {
            Rule::Minutes { every, until } => {
                let candidate = step_after(self.start, Duration::try_minutes(*every)?, after)?;
                match until {
                    Some(until) if candidate >= *until => None,
                    _ => Some(candidate),
                }
            }
            Rule::Calendar { unit, every, until } => {
                let candidate = calendar_after(self.start, *unit, *every, after)?;
                (candidate < *until).then_some(candidate)
            }
            Rule::Weekdays {
                days,
                every_weeks,
                until,
            } => weekday_after(self.start, *days, *every_weeks, *until, after),
        }
    }
}

fn same_day_rule(reminder: &Reminder) -> Result<Rule, RecurrenceError> {
    if !reminder.repeat_sameday {
        return Err(RecurrenceError::MissingField("repeat_sameday"));
    }
    if reminder.interval.is_some() {
        return Err(RecurrenceError::ConflictingIntervalFields {
            field: "interval",
            frequency: Frequency::SameDay.code(),
        });
    }
    let every = reminder
        .interval_in_minutes
        .ok_or(RecurrenceError::MissingField("interval_in_minutes"))?;
    if !(1..MINUTES_PER_DAY).contains(&every) {
        return Err(RecurrenceError::InvalidInterval {
            field: "interval_in_minutes",
            value: every,
        });
    }

    Ok(Rule::Minutes {
        every,
        until: reminder.repeat_until,
    })
}

fn calendar_rule(
    reminder: &Reminder,
    frequency: Frequency,
    unit: CalendarUnit,
) -> Result<Rule, RecurrenceError> {
    reject_intraday_fields(reminder, frequency)?;
    let every = positive_interval(reminder.interval)?;
    let until = reminder
        .repeat_until
        .ok_or(RecurrenceError::MissingField("repeat_until"))?;

    Ok(Rule::Calendar { unit, every, until })
}

fn weekday_rule(reminder: &Reminder, frequency: Frequency) -> Result<Rule, RecurrenceError> {
    reject_intraday_fields(reminder, frequency)?;
    if reminder.repeat_days.is_empty() {
        return Err(RecurrenceError::MissingField("repeat_days"));
    }

    let mut days = WeekdaySet::default();
    for code in &reminder.repeat_days {
        let weekday =
            parse_weekday(code).ok_or_else(|| RecurrenceError::InvalidWeekdayCode(code.clone()))?;
        days.insert(weekday);
    }

    let until = reminder
        .repeat_until
        .ok_or(RecurrenceError::MissingField("repeat_until"))?;
    let every_weeks = positive_interval(reminder.interval)?;

    Ok(Rule::Weekdays {
        days,
        every_weeks,
        until,
    })
}

fn reject_intraday_fields(reminder: &Reminder, frequency: Frequency) -> Result<(), RecurrenceError> {
    let field = if reminder.interval_in_minutes.is_some() {
        "interval_in_minutes"
    } else if reminder.repeat_sameday {
        "repeat_sameday"
    } else {
        return Ok(());
    };

    Err(RecurrenceError::ConflictingIntervalFields {
        field,
        frequency: frequency.code(),
    })
}

fn positive_interval(interval: Option<i64>) -> Result<u32, RecurrenceError> {
    let value = interval.ok_or(RecurrenceError::MissingField("interval"))?;
    match u32::try_from(value) {
        Ok(every) if every > 0 => Ok(every),
        _ => Err(RecurrenceError::InvalidInterval {
            field: "interval",
            value,
        }),
    }
}

/// Smallest `start + k * step` with `k >= 1` that is strictly after `after`.
fn step_after(
    start: DateTime<Utc>,
    step: Duration,
    after: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let step_secs = step.num_seconds();
    let k = if after < start {
        1
    } else {
        (after - start).num_seconds() / step_secs + 1
    };

    start.checked_add_signed(Duration::try_seconds(step_secs.checked_mul(k)?)?)
}

fn calendar_after(
    start: DateTime<Utc>,
    unit: CalendarUnit,
    every: u32,
    after: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let step_months = match unit {
        CalendarUnit::Day => return step_after(start, Duration::try_days(every.into())?, after),
        CalendarUnit::Week => return step_after(start, Duration::try_weeks(every.into())?, after),
        CalendarUnit::Month => every,
        CalendarUnit::Year => every.checked_mul(12)?,
    };

    // Offsets are always taken from `start` so a month-end anchor is
    // clamped per occurrence instead of drifting.
    let mut k = if after < start {
        1
    } else {
        u32::try_from(months_between(start, after) / i64::from(step_months))
            .ok()?
            .max(1)
    };
    loop {
        let candidate = start.checked_add_months(Months::new(k.checked_mul(step_months)?))?;
        if candidate > after {
            return Some(candidate);
        }
        k = k.checked_add(1)?;
    }
}

fn months_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let index = |at: DateTime<Utc>| i64::from(at.year()) * 12 + i64::from(at.month0());
    index(to) - index(from)
}

/// Weeks are Monday based and counted from the week holding `start`; only
/// every `every_weeks`-th week is active.
fn weekday_after(
    start: DateTime<Utc>,
    days: WeekdaySet,
    every_weeks: u32,
    until: DateTime<Utc>,
    after: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let from = after.max(start);
    let time_of_day = start.time();
    let anchor = start
        .date_naive()
        .checked_sub_signed(Duration::days(start.weekday().num_days_from_monday().into()))?;
    let every_weeks = i64::from(every_weeks);
    let last_day = until.date_naive();

    let mut date = from.date_naive();
    while date <= last_day {
        let week = (date - anchor).num_days() / 7;
        let offset = week % every_weeks;
        if offset != 0 {
            date = anchor.checked_add_signed(Duration::try_weeks(week - offset + every_weeks)?)?;
            continue;
        }

        let candidate = date.and_time(time_of_day).and_utc();
        if candidate > from && days.contains(candidate.weekday()) {
            return (candidate <= until).then_some(candidate);
        }
        date = date.succ_opt()?;
    }

    None
}

#[cfg(test)]
mod tests;
