pub mod day;
pub mod reminder;
pub mod settings;
pub mod task;

pub use chrono;
pub use uuid;
