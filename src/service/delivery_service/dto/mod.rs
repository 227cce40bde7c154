mod delivery_dispatcher_config;
mod delivery_outcome;

pub use delivery_dispatcher_config::*;
pub use delivery_outcome::*;
