mod delivery_channel_sink;
mod delivery_dispatcher;
mod dto;

pub use delivery_channel_sink::*;
pub use delivery_dispatcher::*;
pub use dto::*;
