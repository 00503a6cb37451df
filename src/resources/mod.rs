pub mod delegate;
pub mod plant;
pub mod reminder;

pub use delegate::{DelegatePatch, NewDelegate, ProxyDelegate};
pub use plant::{NewUserPlant, UserPlant, UserPlantPatch};
pub use reminder::{NewReminder, Reminder, ReminderPatch};
