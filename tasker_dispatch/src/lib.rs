mod delivery;
mod dispatcher;

pub use delivery::{
    LogDeliveryChannel, REMINDER_TOPIC, ReminderDeliveryChannel, ReminderNotification,
};
pub use dispatcher::{DispatchReport, ReminderDispatcher};
