//! Name expansion: tilde expansion, `{node}`/`{ns}`/`{namespace}` and
//! caller-supplied substitutions, then absolute-path prefixing.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::validate;

/// Expands `raw_name` relative to `node_name` and `node_namespace`.
///
/// Order of operations: validate the three inputs, expand a leading `~`
/// (alone) or `~/...`, repeatedly replace `{key}` substitutions (the
/// built-ins `node`, `ns` and `namespace` take precedence over
/// caller-supplied ones), then prefix with `node_namespace` if the result is
/// still relative.
pub fn expand_name(
    raw_name: &str,
    node_name: &str,
    node_namespace: &str,
    substitutions: &HashMap<String, String>,
) -> Result<String> {
    validate::validate_topic_name(raw_name)
        .map_err(|(reason, index)| Error::TopicNameInvalid { reason, index })?;
    validate::validate_node_name(node_name)
        .map_err(|(reason, index)| Error::NodeInvalidName { reason, index })?;
    validate::validate_namespace(node_namespace)
        .map_err(|(reason, index)| Error::NodeInvalidNamespace { reason, index })?;

    let mut current = if raw_name == "~" {
        join(node_namespace, node_name)
    } else if let Some(rest) = raw_name.strip_prefix("~/") {
        join(node_namespace, &format!("{node_name}/{rest}"))
    } else {
        raw_name.to_string()
    };

    while let Some(open) = current.find('{') {
        let close = current[open..]
            .find('}')
            .map(|p| p + open)
            .ok_or_else(|| Error::Unspecified("unbalanced substitution brace survived validation".into()))?;
        let key = &current[open + 1..close];
        let replacement = match key {
            "node" => node_name.to_string(),
            "ns" | "namespace" => node_namespace.to_string(),
            _ => substitutions
                .get(key)
                .cloned()
                .ok_or_else(|| Error::UnknownSubstitution(key.to_string()))?,
        };
        current.replace_range(open..=close, &replacement);
    }

    if !current.starts_with('/') {
        current = join(node_namespace, &current);
    }

    Ok(current)
}

fn join(namespace: &str, rest: &str) -> String {
    if namespace == "/" { format!("/{rest}") } else { format!("{namespace}/{rest}") }
}
