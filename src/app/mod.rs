//! Application module: the `pubqueue` demo driver

pub mod cli;
pub mod demo;
pub mod error;
pub mod startup;
