//! Application setup: services, routing and the server loop.

pub mod server;
pub mod services;

pub use services::initialize_app;
