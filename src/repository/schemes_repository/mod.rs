mod dto;
mod entity;
mod schemes_repository;
mod schemes_repository_impl;

pub use dto::*;
pub use schemes_repository::*;
pub use schemes_repository_impl::*;
