mod error;
mod memory;
mod reminder;
pub mod sqlite;
mod task;

pub use error::StorageError;
pub use memory::InMemoryStorage;
pub use reminder::ReminderStorage;
pub use task::{NewTask, TaskStorage, UpdateTask};
