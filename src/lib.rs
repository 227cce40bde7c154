//!
//! Notification delivery core of the welfare management platform.
//!
//! Notifications are persisted per recipient, mutated as delivery attempts
//! succeed or fail and as recipients read them. A set of scheduled jobs scans
//! welfare schemes, applications, grievances and users and emits notifications.
//!

pub mod application;
pub mod dto;
pub mod error;
pub mod repository;
pub mod scheduler;
pub mod service;
