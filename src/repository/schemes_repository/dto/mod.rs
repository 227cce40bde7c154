mod scheme;

pub use scheme::*;
