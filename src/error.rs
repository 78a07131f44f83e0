//! Error taxonomy for the argument-and-remap core.

use std::path::PathBuf;

/// A single, human-readable error produced anywhere in this crate.
///
/// Every fallible operation in this crate returns `Result<T, Error>`; there is
/// no shared "last error" side channel to reset between calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("allocation failed")]
    BadAlloc,

    #[error("already initialized")]
    AlreadyInit,

    #[error("not initialized")]
    NotInit,

    #[error("invalid ros arguments: {0}")]
    InvalidRosArgs(String),

    #[error("invalid remap rule at lexeme {index}: {message}")]
    InvalidRemapRule { index: usize, message: String },

    #[error("invalid parameter rule at lexeme {index}: {message}")]
    InvalidParamRule { index: usize, message: String },

    #[error("invalid parameter file {path}: {message}")]
    InvalidParamFile { path: PathBuf, message: String },

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("invalid log level rule: {0}")]
    InvalidLogLevelRule(String),

    #[error("topic name invalid at byte {index}: {reason}")]
    TopicNameInvalid { reason: NameValidationError, index: usize },

    #[error("service name invalid at byte {index}: {reason}")]
    ServiceNameInvalid { reason: NameValidationError, index: usize },

    #[error("node name invalid at byte {index}: {reason}")]
    NodeInvalidName { reason: NameValidationError, index: usize },

    #[error("node namespace invalid at byte {index}: {reason}")]
    NodeInvalidNamespace { reason: NameValidationError, index: usize },

    #[error("unknown substitution: {0}")]
    UnknownSubstitution(String),

    #[error("enclave name invalid at byte {index}: {reason}")]
    EnclaveInvalid { reason: NameValidationError, index: usize },

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("instance ids exhausted")]
    InstanceIdsExhausted,

    #[error("unspecified internal error: {0}")]
    Unspecified(String),
}

/// The reason a name failed syntactic validation.
///
/// Shared by topic, service, node-name, node-namespace and enclave
/// validation, since they are all built from the same token grammar; the
/// byte index of the first offending character always accompanies this
/// value inside the owning [`Error`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NameValidationError {
    #[error("name is an empty string")]
    IsEmptyString,
    #[error("name is not absolute")]
    NotAbsolute,
    #[error("name ends with a forward slash")]
    EndsWithForwardSlash,
    #[error("name contains repeated forward slashes")]
    ContainsRepeatedForwardSlash,
    #[error("name contains unallowed characters")]
    ContainsUnallowedCharacters,
    #[error("name token starts with a number")]
    NameTokenStartsWithNumber,
    #[error("name has an unmatched curly brace")]
    UnmatchedCurlyBrace,
    #[error("substitution contains unallowed characters")]
    SubstitutionContainsUnallowedCharacters,
    #[error("substitution starts with a number")]
    SubstitutionStartsWithNumber,
    #[error("a tilde appears somewhere other than a leading '~/'")]
    MisplacedTilde,
    #[error("a leading tilde is not followed by a forward slash")]
    TildeNotFollowedByForwardSlash,
    #[error("name exceeds the maximum allowed length")]
    TooLong,
}

pub type Result<T> = std::result::Result<T, Error>;
