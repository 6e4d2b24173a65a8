use thiserror::Error;

/// Why a reminder definition was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecurrenceError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` cannot be used with frequency `{frequency}`")]
    ConflictingIntervalFields {
        field: &'static str,
        frequency: &'static str,
    },

    #[error("unknown frequency code `{0}`")]
    InvalidFrequencyCode(String),

    #[error("unknown weekday code `{0}`")]
    InvalidWeekdayCode(String),

    #[error("`{field}` is out of range: {value}")]
    InvalidInterval { field: &'static str, value: i64 },

    #[error("no occurrence fits before `repeat_until`")]
    UnschedulableOccurrence,
}
