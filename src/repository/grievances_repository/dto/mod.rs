mod grievance;

pub use grievance::*;
