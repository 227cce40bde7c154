mod scheme_find_entity;

pub use scheme_find_entity::*;
