pub mod app;
pub mod core;
pub mod notifications;
pub mod queue;
