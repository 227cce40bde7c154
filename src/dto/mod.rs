//!
//! Module with all dtos that are passed between the core and its callers
//!

mod delivery_channel;
mod notification_priority;
mod notification_status;
mod notification_type;
mod related_entity;
mod user_role;

pub mod input;
pub mod output;

pub use delivery_channel::*;
pub use notification_priority::*;
pub use notification_status::*;
pub use notification_type::*;
pub use related_entity::*;
pub use user_role::*;
