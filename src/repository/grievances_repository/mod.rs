mod dto;
mod entity;
mod grievances_repository;
mod grievances_repository_impl;

pub use dto::*;
pub use grievances_repository::*;
pub use grievances_repository_impl::*;
