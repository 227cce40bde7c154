mod bulk_send_result;
mod notification_stats;
mod notifications_page;

pub use bulk_send_result::*;
pub use notification_stats::*;
pub use notifications_page::*;
