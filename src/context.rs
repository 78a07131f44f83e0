//! Process-wide context: domain id, localhost-only flag, security options
//! and a unique instance id layered over a [`ParsedArguments`] (component I).

use std::sync::atomic::{AtomicU64, Ordering};

use crate::arguments::ParsedArguments;
use crate::error::{Error, Result};
use crate::security::{self, SecurityOptions};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Draws the next process-wide instance id. Instance ids start at 1 and
/// never repeat; rollover to 0 is reported as exhaustion rather than wrapped
/// silently.
fn next_instance_id() -> Result<u64> {
    let id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed);
    if id == 0 { Err(Error::InstanceIdsExhausted) } else { Ok(id) }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub arguments: ParsedArguments,
    pub domain_id: u32,
    pub localhost_only: bool,
    pub security: SecurityOptions,
    pub instance_id: u64,
}

impl Context {
    /// Builds a `Context` from already-parsed arguments, reading
    /// `ROS_DOMAIN_ID`, `ROS_LOCALHOST_ONLY` and the security-option
    /// environment variables (see [`security::resolve_security_options`]).
    pub fn new(arguments: ParsedArguments) -> Result<Self> {
        let domain_id = std::env::var("ROS_DOMAIN_ID").ok().and_then(|v| v.parse().ok()).unwrap_or(0);
        let localhost_only = matches!(std::env::var("ROS_LOCALHOST_ONLY").ok().as_deref(), Some("1"));
        let security = security::resolve_security_options(&arguments.enclave)?;
        let instance_id = next_instance_id()?;
        tracing::debug!(domain_id, localhost_only, instance_id, "context initialised");
        Ok(Self { arguments, domain_id, localhost_only, security, instance_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_ids_are_unique_and_nonzero() {
        let a = next_instance_id().unwrap();
        let b = next_instance_id().unwrap();
        assert_ne!(a, b);
        assert_ne!(a, 0);
        assert_ne!(b, 0);
    }

    #[test]
    fn context_wraps_parsed_arguments() {
        let parsed = crate::arguments::parse(&["exe".to_string()]).unwrap();
        let ctx = Context::new(parsed).unwrap();
        assert_eq!(ctx.domain_id, ctx.domain_id); // constructed without panicking
        assert!(ctx.instance_id > 0);
    }
}
