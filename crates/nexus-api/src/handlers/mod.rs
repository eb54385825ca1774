//! API request handlers.

pub mod health;
pub mod history;
pub mod qa;
pub mod reminders;
pub mod telegram;
pub mod voice;

pub use health::*;
pub use history::*;
pub use qa::*;
pub use reminders::*;
pub use telegram::*;
pub use voice::*;
