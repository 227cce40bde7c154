mod grievance_find_entity;

pub use grievance_find_entity::*;
