//! The argv → [`ParsedArguments`] pipeline (component E).

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::log::{self, LogSeverity};
use crate::parser::parse_remap_rule;
use crate::remap::RemapRule;
use crate::yaml::{self, ParameterTree};

/// Everything recovered from one process's argv: remap rules, parameter
/// overrides, logging configuration, and the argv indices that were not
/// claimed by any recognised flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArguments {
    pub remap_rules: Vec<RemapRule>,
    pub parameter_files: Vec<PathBuf>,
    pub parameter_overrides: ParameterTree,
    pub default_log_level: Option<LogSeverity>,
    pub logger_levels: IndexMap<String, LogSeverity>,
    pub external_log_config_file: Option<PathBuf>,
    pub stdout_disabled: bool,
    pub rosout_disabled: bool,
    pub ext_lib_disabled: bool,
    pub enclave: String,
    pub unparsed_ros: Vec<usize>,
    pub unparsed_app: Vec<usize>,
}

impl ParsedArguments {
    fn with_capacity(argc: usize) -> Self {
        Self {
            remap_rules: Vec::with_capacity(argc),
            parameter_files: Vec::with_capacity(argc),
            parameter_overrides: ParameterTree::new(),
            default_log_level: None,
            logger_levels: IndexMap::new(),
            external_log_config_file: None,
            stdout_disabled: false,
            rosout_disabled: false,
            ext_lib_disabled: false,
            enclave: "/".to_string(),
            unparsed_ros: Vec::with_capacity(argc),
            unparsed_app: Vec::with_capacity(argc),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    App,
    Ros,
}

/// Parses `argv` (including the process name at index 0) into a
/// [`ParsedArguments`]. On any error, the partially built value is simply
/// dropped and the error is returned; there is nothing left to roll back.
pub fn parse(argv: &[String]) -> Result<ParsedArguments> {
    if argv.is_empty() {
        return Ok(ParsedArguments::with_capacity(0));
    }

    let mut out = ParsedArguments::with_capacity(argv.len());
    out.unparsed_app.push(0);

    let mut mode = Mode::App;
    let mut i = 1;
    while i < argv.len() {
        let token = argv[i].as_str();
        match mode {
            Mode::App if token == "--ros-args" => {
                mode = Mode::Ros;
            }
            Mode::App => {
                if let Some(result) = try_deprecated_inline(token, &mut out) {
                    result?;
                    tracing::warn!(token, "deprecated inline ROS argument syntax");
                } else {
                    out.unparsed_app.push(i);
                }
            }
            Mode::Ros if token == "--" => {
                mode = Mode::App;
            }
            Mode::Ros => {
                dispatch_ros_flag(argv, &mut i, token, &mut out)?;
            }
        }
        i += 1;
    }

    Ok(out)
}

fn dispatch_ros_flag(argv: &[String], i: &mut usize, token: &str, out: &mut ParsedArguments) -> Result<()> {
    match token {
        "-r" | "--remap" => {
            let value = next_value(argv, i, token)?;
            let rule = parse_remap_rule(value)?;
            tracing::debug!(token, value, "remap rule");
            out.remap_rules.push(rule);
        }
        "-p" | "--param" => {
            let value = next_value(argv, i, token)?;
            let parts = crate::parser::parse_param_rule(value)?;
            let decoded = yaml::parse_inline_value(&parts.remaining)?;
            tracing::debug!(token, value, "parameter override");
            yaml::insert(&mut out.parameter_overrides, &parts.node_glob, &parts.parameter_path, decoded);
        }
        "--params-file" => {
            let value = next_value(argv, i, token)?;
            let path = PathBuf::from(value);
            let tree = yaml::parse_param_file(&path)?;
            tracing::debug!(token, path = value, "parameter file");
            yaml::merge(&mut out.parameter_overrides, tree);
            out.parameter_files.push(path);
        }
        "--log-level" => {
            let value = next_value(argv, i, token)?;
            let (logger, severity) = log::parse_log_level_rule(value)?;
            tracing::debug!(token, value, "log level");
            match logger {
                Some(name) => {
                    out.logger_levels.insert(name, severity);
                }
                None => out.default_log_level = Some(severity),
            }
        }
        "--external-log-config-file" => {
            let value = next_value(argv, i, token)?;
            tracing::debug!(token, value, "external log config file");
            out.external_log_config_file = Some(PathBuf::from(value));
        }
        "--enable-stdout-logs" => {
            tracing::debug!(token, "log sink toggle");
            out.stdout_disabled = false;
        }
        "--disable-stdout-logs" => {
            tracing::debug!(token, "log sink toggle");
            out.stdout_disabled = true;
        }
        "--enable-rosout-logs" => {
            tracing::debug!(token, "log sink toggle");
            out.rosout_disabled = false;
        }
        "--disable-rosout-logs" => {
            tracing::debug!(token, "log sink toggle");
            out.rosout_disabled = true;
        }
        "--enable-external-lib-logs" => {
            tracing::debug!(token, "log sink toggle");
            out.ext_lib_disabled = false;
        }
        "--disable-external-lib-logs" => {
            tracing::debug!(token, "log sink toggle");
            out.ext_lib_disabled = true;
        }
        "--enclave" => {
            let value = next_value(argv, i, token)?;
            tracing::debug!(token, value, "enclave");
            out.enclave = value.to_string();
        }
        _ => out.unparsed_ros.push(*i),
    }
    Ok(())
}

fn next_value<'a>(argv: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    match argv.get(*i + 1) {
        Some(value) => {
            *i += 1;
            Ok(value.as_str())
        }
        None => Err(Error::InvalidRosArgs(format!("'{flag}' requires a value"))),
    }
}

/// Attempts to interpret `token` as one of the deprecated inline forms that
/// are accepted outside `--ros-args`. Returns `None` when `token` matches
/// none of them, in which case the caller records it as unparsed.
fn try_deprecated_inline(token: &str, out: &mut ParsedArguments) -> Option<Result<()>> {
    if let Some(rest) = token.strip_prefix("__params:=") {
        return Some(
            yaml::parse_param_file(&PathBuf::from(rest)).map(|tree| {
                yaml::merge(&mut out.parameter_overrides, tree);
                out.parameter_files.push(PathBuf::from(rest));
            }),
        );
    }
    if let Some(rest) = token.strip_prefix("__log_level:=") {
        return Some(log::parse_log_level_rule(rest).map(|(logger, severity)| match logger {
            Some(name) => {
                out.logger_levels.insert(name, severity);
            }
            None => out.default_log_level = Some(severity),
        }));
    }
    if let Some(rest) = token.strip_prefix("__log_config_file:=") {
        out.external_log_config_file = Some(PathBuf::from(rest));
        return Some(Ok(()));
    }
    if let Some(rest) = token.strip_prefix("__disable_stdout_logs:=") {
        return Some(apply_bool(rest, &mut out.stdout_disabled));
    }
    if let Some(rest) = token.strip_prefix("__disable_rosout_logs:=") {
        return Some(apply_bool(rest, &mut out.rosout_disabled));
    }
    if let Some(rest) = token.strip_prefix("__disable_external_lib_logs:=") {
        return Some(apply_bool(rest, &mut out.ext_lib_disabled));
    }
    match parse_remap_rule(token) {
        Ok(rule) => Some(Ok(out.remap_rules.push(rule))),
        Err(_) => None,
    }
}

fn apply_bool(text: &str, field: &mut bool) -> Result<()> {
    match text {
        "true" | "1" => {
            *field = true;
            Ok(())
        }
        "false" | "0" => {
            *field = false;
            Ok(())
        }
        other => Err(Error::InvalidRosArgs(format!("expected a boolean, found '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_argv_has_no_process_name() {
        let parsed = parse(&[]).unwrap();
        assert!(parsed.unparsed_app.is_empty());
    }

    #[test]
    fn process_name_is_always_unparsed_app() {
        let parsed = parse(&argv(&["exe"])).unwrap();
        assert_eq!(parsed.unparsed_app, vec![0]);
    }

    #[test]
    fn ros_args_with_no_tokens_is_empty_ros_section() {
        let parsed = parse(&argv(&["exe", "--ros-args"])).unwrap();
        assert!(parsed.remap_rules.is_empty());
        assert!(parsed.unparsed_ros.is_empty());
    }

    #[test]
    fn namespace_remap_rule() {
        let parsed = parse(&argv(&["exe", "--ros-args", "-r", "__ns:=/foo/bar"])).unwrap();
        assert_eq!(parsed.remap_rules.len(), 1);
        assert_eq!(parsed.remap_rules[0].replacement, "/foo/bar");
        assert_eq!(parsed.unparsed_app, vec![0]);
        assert!(parsed.unparsed_ros.is_empty());
    }

    #[test]
    fn tokens_after_end_of_ros_sentinel_are_app_tokens() {
        let parsed = parse(&argv(&["exe", "--ros-args", "-r", "a:=b", "--", "-r"])).unwrap();
        assert_eq!(parsed.remap_rules.len(), 1);
        assert_eq!(parsed.unparsed_app, vec![0, 5]);
    }

    #[test]
    fn deprecated_inline_remap_is_accepted_with_warning() {
        let parsed = parse(&argv(&["exe", "-r", "foo:=bar"])).unwrap();
        assert_eq!(parsed.remap_rules.len(), 1);
    }

    #[test]
    fn parameter_override_is_recorded() {
        let parsed = parse(&argv(&["exe", "--ros-args", "-p", "n:foo.bar:=42"])).unwrap();
        assert_eq!(
            parsed.parameter_overrides["n"]["foo.bar"],
            yaml::ParameterValue::Int(42)
        );
    }

    #[test]
    fn malformed_remap_rule_fails_the_whole_parse() {
        let err = parse(&argv(&["exe", "--ros-args", "-r", "foo:=bar}baz"]));
        assert!(err.is_err());
    }

    #[test]
    fn unknown_ros_flag_is_recorded_as_unparsed() {
        let parsed = parse(&argv(&["exe", "--ros-args", "--wat"])).unwrap();
        assert_eq!(parsed.unparsed_ros, vec![2]);
    }

    #[test]
    fn trailing_flag_without_value_is_fatal() {
        let err = parse(&argv(&["exe", "--ros-args", "-r"]));
        assert!(matches!(err, Err(Error::InvalidRosArgs(_))));
    }
}
