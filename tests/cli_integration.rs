//! CLI Integration Tests
//!
//! Tests are organized by functionality:
//! - `cli::argument_parsing` - command line flags and their overrides
//! - `cli::toml_config` - configuration file loading and validation

mod cli;
