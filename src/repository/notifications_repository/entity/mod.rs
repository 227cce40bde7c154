mod cleanup_candidate_find_entity;
mod notification_entity;

pub use cleanup_candidate_find_entity::*;
pub use notification_entity::*;
