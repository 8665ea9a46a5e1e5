//! CLI argument parsing tests

use clap::Parser;
use pubqueue::app::cli::api::{Args, DemoConfig};
use std::path::PathBuf;

#[test]
fn test_short_and_long_forms_agree() {
    let long = Args::try_parse_from([
        "pubqueue",
        "--config-file",
        "a.toml",
        "--capacity",
        "7",
        "--log-level",
        "trace",
        "--log-format",
        "ext",
        "--log-file",
        "out.log",
    ])
    .unwrap();
    let short = Args::try_parse_from([
        "pubqueue", "-c", "a.toml", "-s", "7", "-l", "trace", "-o", "ext", "-f", "out.log",
    ])
    .unwrap();

    assert_eq!(long.config_file, Some(PathBuf::from("a.toml")));
    assert_eq!(long.config_file, short.config_file);
    assert_eq!(long.capacity, short.capacity);
    assert_eq!(long.log_level, short.log_level);
    assert_eq!(long.log_format, short.log_format);
    assert_eq!(long.log_file, short.log_file);
}

#[test]
fn test_invalid_log_level_rejected() {
    let result = Args::try_parse_from(["pubqueue", "--log-level", "verbose"]);
    assert!(result.is_err());
}

#[test]
fn test_zero_capacity_parses_but_fails_validation() {
    let args = Args::try_parse_from(["pubqueue", "--capacity", "0"]).unwrap();
    let mut config = DemoConfig::default();
    config.apply_args(&args);

    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("capacity"));
}

#[test]
fn test_color_flags() {
    let color = Args::try_parse_from(["pubqueue", "--color"]).unwrap();
    let no_color = Args::try_parse_from(["pubqueue", "--no-color"]).unwrap();
    let auto = Args::try_parse_from(["pubqueue"]).unwrap();

    assert_eq!(color.color_override(), Some(true));
    assert_eq!(no_color.color_override(), Some(false));
    assert_eq!(auto.color_override(), None);

    let mut config = DemoConfig::default();
    config.apply_args(&color);
    assert!(config.log_settings().color);
}

#[test]
fn test_log_settings_follow_overrides() {
    let args = Args::try_parse_from(["pubqueue", "-l", "warn", "-o", "json", "-f", "queue.log"])
        .unwrap();
    let mut config = DemoConfig::default();
    config.apply_args(&args);

    let settings = config.log_settings();
    assert_eq!(settings.level.as_deref(), Some("warn"));
    assert_eq!(settings.format.as_deref(), Some("json"));
    assert_eq!(settings.file.as_deref(), Some("queue.log"));
}
