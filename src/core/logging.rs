//! Logging initialisation on top of flexi_logger
//!
//! The library only uses the `log` facade; the binary calls [`init_logging`]
//! once at startup. Formats:
//! - `text`: timestamp, level and message
//! - `ext`: as `text`, plus the source location
//! - `json`: one compact JSON object per line

use std::sync::{Mutex, OnceLock};

// Dropping the handle would shut down file output
static LOGGER_HANDLE: OnceLock<Mutex<flexi_logger::LoggerHandle>> = OnceLock::new();

/// Log settings collected from the configuration file and command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    pub level: Option<String>,
    pub format: Option<String>,
    pub file: Option<String>,
    pub color: bool,
}

pub fn init_logging(settings: &LogSettings) -> Result<(), Box<dyn std::error::Error>> {
    use flexi_logger::{FileSpec, Logger};

    let level_str = settings.level.as_deref().unwrap_or("info");
    let mut logger = Logger::try_with_str(level_str)?;

    logger = match (settings.format.as_deref().unwrap_or("text"), settings.color) {
        ("json", _) => logger.format(json_format),
        ("ext", true) => logger.format(extended_color_format),
        ("ext", false) => logger.format(extended_format),
        (_, true) => logger.format(simple_color_format),
        (_, false) => logger.format(simple_format),
    };

    if let Some(file_path) = settings.file.as_deref() {
        let file_spec = FileSpec::try_from(std::path::Path::new(file_path))?;
        logger = logger.log_to_file(file_spec);
    }

    let handle = logger.start()?;
    let _ = LOGGER_HANDLE.set(Mutex::new(handle));

    Ok(())
}

fn level_abbr(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    }
}

fn level_colored(level: log::Level) -> colored::ColoredString {
    use colored::*;

    match level {
        log::Level::Error => "ERR".red().bold(),
        log::Level::Warn => "WRN".yellow(),
        log::Level::Info => "INF".green(),
        log::Level::Debug => "DBG".blue(),
        log::Level::Trace => "TRC".magenta(),
    }
}

// Format: "YYYY-MM-DD HH:mm:ss.fff INF message"
fn simple_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        record.args()
    )
}

fn simple_color_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::*;

    write!(
        w,
        "{} {} {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored(record.level()),
        record.args()
    )
}

// Format: "YYYY-MM-DD HH:mm:ss.fff INF message (queue/internal.rs:42)"
fn extended_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbr(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line())
    )
}

fn extended_color_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::*;

    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line()).dimmed()
    )
}

fn json_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use serde_json::{json, to_string};

    // Ordered: timestamp, level, message, metadata
    let json_obj = json!({
        "timestamp": now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        "level": level_abbr(record.level()),
        "message": record.args().to_string(),
        "target": format_target_as_path(record.target(), record.line())
    });

    match to_string(&json_obj) {
        Ok(json_string) => w.write_all(json_string.as_bytes()),
        Err(_) => w.write_all(b"{\"error\":\"Failed to serialize log message\"}"),
    }
}

// pubqueue::queue::internal -> queue/internal.rs:42
fn format_target_as_path(target: &str, line: Option<u32>) -> String {
    let path_like = match target.strip_prefix("pubqueue::") {
        Some(without_prefix) => without_prefix.replace("::", "/") + ".rs",
        None => target.replace("::", "/"),
    };

    match line {
        Some(line_num) => format!("{}:{}", path_like, line_num),
        None => path_like,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexi_logger::DeferredNow;
    use serial_test::serial;

    fn render(
        format: fn(
            &mut dyn std::io::Write,
            &mut DeferredNow,
            &log::Record,
        ) -> Result<(), std::io::Error>,
        level: log::Level,
        target: &str,
    ) -> String {
        let mut buffer = Vec::new();
        let mut now = DeferredNow::new();
        format(
            &mut buffer,
            &mut now,
            &log::Record::builder()
                .level(level)
                .target(target)
                .line(Some(42))
                .args(format_args!("Test message"))
                .build(),
        )
        .expect("format should succeed");
        String::from_utf8(buffer).expect("Output should be valid UTF-8")
    }

    #[test]
    fn test_target_formatted_as_source_path() {
        assert_eq!(
            format_target_as_path("pubqueue::queue::internal", Some(42)),
            "queue/internal.rs:42"
        );
        assert_eq!(format_target_as_path("flexi_logger::x", None), "flexi_logger/x");
    }

    #[test]
    fn test_simple_format_has_level_and_message_only() {
        let output = render(simple_format, log::Level::Info, "pubqueue::queue::internal");
        assert!(output.contains("INF Test message"), "got: {}", output);
        assert!(!output.contains("internal.rs"));
    }

    #[test]
    fn test_extended_format_includes_location() {
        let output = render(extended_format, log::Level::Warn, "pubqueue::app::demo");
        assert!(
            output.ends_with("WRN Test message (app/demo.rs:42)"),
            "got: {}",
            output
        );
    }

    #[test]
    fn test_json_format_is_single_object() {
        let output = render(json_format, log::Level::Error, "pubqueue::queue::ring");
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["level"], "ERR");
        assert_eq!(value["message"], "Test message");
        assert_eq!(value["target"], "queue/ring.rs:42");
        assert!(!output.contains('\n'));
    }

    #[test]
    #[serial]
    fn test_init_logging_accepts_every_format() {
        // Only the first successful start installs the global logger; later
        // attempts must fail cleanly rather than panic
        for format in ["text", "ext", "json"] {
            let settings = LogSettings {
                level: Some("debug".to_string()),
                format: Some(format.to_string()),
                file: None,
                color: false,
            };
            if let Err(e) = init_logging(&settings) {
                assert!(!e.to_string().is_empty());
            }
        }
        log::debug!("logging initialised for tests");
    }
}
