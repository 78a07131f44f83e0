//! Enclave and security-option resolution (component H).

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::validate::validate_enclave_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityStrategy {
    Enforce,
    Permissive,
}

/// Security options derived from environment variables and the process's
/// chosen enclave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityOptions {
    pub enabled: bool,
    pub strategy: SecurityStrategy,
    /// The directory containing this enclave's keys and certificates, when
    /// security is enabled and the keystore root is known.
    pub keystore_dir: Option<PathBuf>,
}

/// Validates `enclave` and resolves [`SecurityOptions`] from the environment.
///
/// `ROS_SECURITY_ENCLAVE_OVERRIDE`, when set, replaces `enclave` for the
/// purpose of computing the keystore directory (but is not itself validated
/// as the argument's enclave value).
pub fn resolve_security_options(enclave: &str) -> Result<SecurityOptions> {
    validate_enclave_name(enclave).map_err(|(reason, index)| Error::EnclaveInvalid { reason, index })?;

    let enabled = env_flag("ROS_SECURITY_ENABLE");
    if !enabled {
        return Ok(SecurityOptions { enabled: false, strategy: SecurityStrategy::Permissive, keystore_dir: None });
    }

    let strategy = match std::env::var("ROS_SECURITY_STRATEGY").ok().as_deref() {
        Some("Enforce") => SecurityStrategy::Enforce,
        _ => SecurityStrategy::Permissive,
    };

    let effective_enclave =
        std::env::var("ROS_SECURITY_ENCLAVE_OVERRIDE").unwrap_or_else(|_| enclave.to_string());

    let keystore_dir = match std::env::var("ROS_SECURITY_KEYSTORE").ok() {
        Some(root) => {
            let dir = join_enclave_path(Path::new(&root), &effective_enclave);
            if !dir.is_dir() {
                tracing::debug!(path = %dir.display(), "security keystore directory does not exist");
            }
            Some(dir)
        }
        None => None,
    };

    Ok(SecurityOptions { enabled, strategy, keystore_dir })
}

fn join_enclave_path(root: &Path, enclave: &str) -> PathBuf {
    let mut dir = root.join("enclaves");
    for segment in enclave.split('/').filter(|s| !s.is_empty()) {
        dir.push(segment);
    }
    dir
}

fn env_flag(name: &str) -> bool {
    matches!(std::env::var(name).ok().as_deref(), Some("true") | Some("1"))
}
