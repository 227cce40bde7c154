mod job_kind;
mod scheduler_config;
mod scheduler_jobs_config;

pub use job_kind::*;
pub use scheduler_config::*;
pub use scheduler_jobs_config::*;
