mod cleanup_candidate;
mod notification;
mod notification_counts;

pub use cleanup_candidate::*;
pub use notification::*;
pub use notification_counts::*;
