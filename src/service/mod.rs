mod delivery_service;
mod notifications_service;

pub use delivery_service::*;
pub use notifications_service::*;
