mod applications_repository;
mod applications_repository_impl;
mod dto;
mod entity;

pub use applications_repository::*;
pub use applications_repository_impl::*;
pub use dto::*;
