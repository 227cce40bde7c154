mod application_find_entity;

pub use application_find_entity::*;
