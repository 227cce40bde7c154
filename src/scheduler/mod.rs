//!
//! Time-triggered jobs that scan domain state and emit notifications
//!

mod dto;
mod error;
mod scheduler;
mod scheduler_jobs;

pub use dto::*;
pub use error::*;
pub use scheduler::*;
pub use scheduler_jobs::*;
