//! Documo infrastructure services: the lifecycle cascade, invalidation
//! mail delivery, and telemetry initialization.

pub mod lifecycle;
pub mod mailer;
pub mod telemetry;

pub use lifecycle::{InvalidationOutcome, LifecycleConfig, LifecycleService};
pub use mailer::{MailOutcome, Mailer, RecordingMailer, SmtpMailer};
pub use telemetry::init_telemetry;
