// Internal modules - all access should go through api module
pub(crate) mod bus;
pub(crate) mod event;

// Public API module - the only public interface for the notification system
pub mod api;
