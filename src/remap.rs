//! Remap rule data model and the local-then-global matcher (component G).

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::error::{Error, Result};
use crate::expand::expand_name;
use crate::validate::validate_topic_name;

/// Which node a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemapScope {
    AnyNode,
    Node(SmolStr),
}

/// The kind of name a rule rewrites, as parsed. `TopicOrService` comes from
/// a rule with no `rostopic://`/`rosservice://` prefix, which matches
/// lookups of either kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemapRuleKind {
    Topic,
    Service,
    TopicOrService,
    NodeName,
    Namespace,
}

/// A bitmask over [`RemapRuleKind`], used at lookup time to ask "does this
/// rule apply to a topic lookup" without matching the rule's exact kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindMask(u8);

impl KindMask {
    pub const TOPIC: Self = Self(0b0001);
    pub const SERVICE: Self = Self(0b0010);
    pub const NODE_NAME: Self = Self(0b0100);
    pub const NAMESPACE: Self = Self(0b1000);

    fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl RemapRuleKind {
    fn mask(self) -> KindMask {
        match self {
            Self::Topic => KindMask::TOPIC,
            Self::Service => KindMask::SERVICE,
            Self::TopicOrService => KindMask(KindMask::TOPIC.0 | KindMask::SERVICE.0),
            Self::NodeName => KindMask::NODE_NAME,
            Self::Namespace => KindMask::NAMESPACE,
        }
    }
}

/// A single parsed remap rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapRule {
    pub scope: RemapScope,
    pub kind: RemapRuleKind,
    /// Absent for `__node`/`__ns` rules, which match any name of their kind.
    pub pattern: Option<String>,
    pub replacement: String,
}

impl RemapRule {
    /// A rule containing a `*` or `**` segment is syntactically accepted
    /// (forward compatibility) but never matches; wildcard expansion is not
    /// implemented.
    pub fn contains_wildcard(&self) -> bool {
        self.replacement.contains('*') || self.pattern.as_deref().is_some_and(|p| p.contains('*'))
    }
}

fn scope_matches(scope: &RemapScope, node_name: Option<&str>) -> bool {
    match scope {
        RemapScope::AnyNode => true,
        RemapScope::Node(n) => node_name.is_none_or(|nm| n.as_str() == nm),
    }
}

fn pattern_matches(pattern: &Option<String>, candidate: Option<&str>) -> bool {
    match pattern {
        None => true,
        Some(p) => candidate.is_none_or(|c| p == c),
    }
}

/// Returns the first rule in `rules` (in order) that applies to a lookup of
/// `kind_needed` for `node_name`/`candidate_name`.
pub fn first_match<'a>(
    rules: &'a [RemapRule],
    kind_needed: KindMask,
    node_name: Option<&str>,
    candidate_name: Option<&str>,
) -> Option<&'a RemapRule> {
    rules.iter().find(|rule| {
        rule.kind.mask().intersects(kind_needed)
            && !rule.contains_wildcard()
            && scope_matches(&rule.scope, node_name)
            && pattern_matches(&rule.pattern, candidate_name)
    })
}

/// Resolves names against a node's local rules first, falling back to
/// global rules only when `use_global` is set.
pub struct RemapResolver<'a> {
    pub local: &'a [RemapRule],
    pub global: &'a [RemapRule],
    pub use_global: bool,
}

impl<'a> RemapResolver<'a> {
    fn resolve(
        &self,
        kind_needed: KindMask,
        node_name: Option<&str>,
        candidate_name: Option<&str>,
    ) -> Option<&'a RemapRule> {
        if let Some(rule) = first_match(self.local, kind_needed, node_name, candidate_name) {
            tracing::trace!(replacement = %rule.replacement, "remap rule matched locally");
            return Some(rule);
        }
        if self.use_global {
            if let Some(rule) = first_match(self.global, kind_needed, node_name, candidate_name) {
                tracing::trace!(replacement = %rule.replacement, "remap rule matched globally");
                return Some(rule);
            }
        }
        None
    }

    /// Expands `input_name` then applies the topic remap rules, re-validating
    /// whichever name (remapped or not) is ultimately chosen.
    pub fn remap_topic_name(
        &self,
        node_name: &str,
        input_name: &str,
        node_namespace: &str,
        substitutions: &HashMap<String, String>,
    ) -> Result<String> {
        let expanded = expand_name(input_name, node_name, node_namespace, substitutions)?;
        let chosen = match self.resolve(KindMask::TOPIC, Some(node_name), Some(&expanded)) {
            Some(rule) => rule.replacement.clone(),
            None => expanded,
        };
        validate_topic_name(&chosen).map_err(|(reason, index)| Error::TopicNameInvalid { reason, index })?;
        Ok(chosen)
    }

    /// As [`Self::remap_topic_name`], but for service names.
    pub fn remap_service_name(
        &self,
        node_name: &str,
        input_name: &str,
        node_namespace: &str,
        substitutions: &HashMap<String, String>,
    ) -> Result<String> {
        let expanded = expand_name(input_name, node_name, node_namespace, substitutions)?;
        let chosen = match self.resolve(KindMask::SERVICE, Some(node_name), Some(&expanded)) {
            Some(rule) => rule.replacement.clone(),
            None => expanded,
        };
        validate_topic_name(&chosen).map_err(|(reason, index)| Error::ServiceNameInvalid { reason, index })?;
        Ok(chosen)
    }

    /// Looks up a `__node` rule for `node_name`. No expansion or
    /// re-validation: the replacement is returned verbatim, as upstream does.
    pub fn remap_node_name(&self, node_name: &str) -> Option<String> {
        self.resolve(KindMask::NODE_NAME, Some(node_name), None).map(|r| r.replacement.clone())
    }

    /// Looks up a `__ns` rule for `node_name`.
    pub fn remap_node_namespace(&self, node_name: &str) -> Option<String> {
        self.resolve(KindMask::NAMESPACE, Some(node_name), None).map(|r| r.replacement.clone())
    }
}
