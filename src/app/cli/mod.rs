//! CLI module containing argument parsing and configuration loading

pub mod api;
pub(crate) mod args;
pub(crate) mod config;
