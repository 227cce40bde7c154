mod delivery_attempt;
mod notification_create;
mod notification_filters;
mod pagination;

pub use delivery_attempt::*;
pub use notification_create::*;
pub use notification_filters::*;
pub use pagination::*;
