mod applications_repository;
mod error;
mod grievances_repository;
mod notifications_repository;
mod schemes_repository;
mod users_repository;

pub use applications_repository::*;
pub use error::*;
pub use grievances_repository::*;
pub use notifications_repository::*;
pub use schemes_repository::*;
pub use users_repository::*;
