//! Log severity levels as consumed from `--log-level` rules.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

/// Parses a severity name, case-insensitively. Unknown names fail with
/// `InvalidLogLevel`.
pub fn severity_from_string(s: &str) -> Result<LogSeverity> {
    match s.to_ascii_uppercase().as_str() {
        "DEBUG" => Ok(LogSeverity::Debug),
        "INFO" => Ok(LogSeverity::Info),
        "WARN" | "WARNING" => Ok(LogSeverity::Warn),
        "ERROR" => Ok(LogSeverity::Error),
        "FATAL" => Ok(LogSeverity::Fatal),
        _ => Err(Error::InvalidLogLevel(s.to_string())),
    }
}

/// Splits a `--log-level` value into an optional logger name and a
/// severity: `debug` sets the default level, `my_logger:=debug` (written
/// here as `my_logger:debug`, the colon form used once the flag's own `=`
/// or space has already separated the flag from its value) sets a
/// per-logger level.
pub fn parse_log_level_rule(value: &str) -> Result<(Option<String>, LogSeverity)> {
    match value.split_once(':') {
        Some((logger, level)) if !logger.is_empty() => {
            Ok((Some(logger.to_string()), severity_from_string(level)?))
        }
        _ => Ok((None, severity_from_string(value)?)),
    }
}
