//! Argument parsing, remap rule matching and name resolution for a
//! robotics middleware client library.
//!
//! The entry points are [`arguments::parse`] (argv → [`arguments::ParsedArguments`]),
//! [`context::Context::new`] (attaches process-wide configuration), and
//! [`remap::RemapResolver`] (applies remap rules to an expanded name).

pub mod arguments;
pub mod context;
pub mod error;
pub mod expand;
pub mod lexer;
pub mod log;
pub mod lookahead;
pub mod parser;
pub mod remap;
pub mod security;
pub mod validate;
pub mod yaml;

pub use arguments::{ParsedArguments, parse};
pub use context::Context;
pub use error::{Error, NameValidationError, Result};
pub use expand::expand_name;
pub use log::{LogSeverity, severity_from_string};
pub use remap::{RemapResolver, RemapRule, RemapRuleKind, RemapScope};
pub use yaml::{ParameterTree, ParameterValue};
