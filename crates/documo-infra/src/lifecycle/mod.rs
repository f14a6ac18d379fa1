//! Document lifecycle cascade.

mod service;

pub use service::{InvalidationOutcome, LifecycleConfig, LifecycleService};
