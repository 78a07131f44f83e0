//! Parameter file and inline-value ingestion into a [`ParameterTree`].

use std::path::Path;

use indexmap::IndexMap;
use yaml_rust2::{Yaml, YamlLoader, yaml::Hash};

use crate::error::{Error, Result};

/// A decoded parameter value. Sequences are homogeneous; the first element's
/// type pins the whole sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    BoolSeq(Vec<bool>),
    IntSeq(Vec<i64>),
    FloatSeq(Vec<f64>),
    StrSeq(Vec<String>),
}

/// `node_glob -> parameter_path -> value`, insertion-ordered so iteration
/// matches argv / file order.
pub type ParameterTree = IndexMap<String, IndexMap<String, ParameterValue>>;

/// Inserts `value` at `(node_glob, path)`, overwriting any prior value for
/// the same key within this tree.
pub fn insert(tree: &mut ParameterTree, node_glob: &str, path: &str, value: ParameterValue) {
    tree.entry(node_glob.to_string())
        .or_default()
        .insert(path.to_string(), value);
}

/// Merges `other` into `tree`, with `other`'s entries overwriting `tree`'s on
/// key collision. Used to apply `--params-file` in argv order, later files
/// overriding earlier ones.
pub fn merge(tree: &mut ParameterTree, other: ParameterTree) {
    for (node_glob, params) in other {
        let dest = tree.entry(node_glob).or_default();
        for (path, value) in params {
            dest.insert(path, value);
        }
    }
}

/// Parses a single inline value (the text following `:=` in a `-p` rule) as
/// a YAML scalar or homogeneous sequence.
pub fn parse_inline_value(text: &str) -> Result<ParameterValue> {
    let docs = YamlLoader::load_from_str(text)
        .map_err(|e| Error::InvalidParamRule { index: 0, message: e.to_string() })?;
    let doc = docs
        .first()
        .ok_or_else(|| Error::InvalidParamRule { index: 0, message: "empty parameter value".into() })?;
    yaml_to_value(doc).map_err(|message| Error::InvalidParamRule { index: 0, message })
}

/// Reads and parses a full YAML parameter file into a [`ParameterTree`].
pub fn parse_param_file(path: &Path) -> Result<ParameterTree> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::InvalidParamFile { path: path.to_path_buf(), message: e.to_string() })?;
    parse_param_text(&text)
        .map_err(|e| Error::InvalidParamFile { path: path.to_path_buf(), message: e.to_string() })
}

/// Parses the contents of a YAML parameter file (already read into memory).
pub fn parse_param_text(text: &str) -> Result<ParameterTree> {
    let docs = YamlLoader::load_from_str(text).map_err(|e| invalid_file(e.to_string()))?;
    let mut tree = ParameterTree::new();
    for doc in &docs {
        let top = as_hash(doc)?;
        for (key, value) in top {
            let key = as_key(key)?;
            walk_top_level(key, value, &mut tree)?;
        }
    }
    Ok(tree)
}

/// `TopLevel -> NodeNamespace -> NodeName -> "ros__parameters"`, with the
/// sentinel collapse: if the value reached directly under `key` already
/// contains `ros__parameters`, `key` itself is the node name and the
/// namespace is empty.
fn walk_top_level(key: &str, value: &Yaml, tree: &mut ParameterTree) -> Result<()> {
    let map = as_hash(value)?;
    if let Some(params) = map.get(&Yaml::String("ros__parameters".to_string())) {
        let node_name = format!("/{key}");
        walk_params(&node_name, "", params, tree)?;
        return Ok(());
    }
    for (inner_key, inner_value) in map {
        let inner_key = as_key(inner_key)?;
        let inner_map = as_hash(inner_value)?;
        let params = inner_map
            .get(&Yaml::String("ros__parameters".to_string()))
            .ok_or_else(|| invalid_file(format!("node '{inner_key}' is missing 'ros__parameters'")))?;
        let node_name = format!("/{key}/{inner_key}");
        walk_params(&node_name, "", params, tree)?;
    }
    Ok(())
}

/// Walks the `Params -> ParamNs` levels under `ros__parameters`, rejecting
/// nesting deeper than one additional namespace level.
fn walk_params(node_glob: &str, param_ns: &str, value: &Yaml, tree: &mut ParameterTree) -> Result<()> {
    let map = as_hash(value)?;
    for (key, value) in map {
        let key = as_key(key)?;
        if value.as_hash().is_some() {
            if !param_ns.is_empty() {
                return Err(invalid_file(format!(
                    "parameter namespace nesting exceeds one level at '{param_ns}.{key}'"
                )));
            }
            walk_params(node_glob, key, value, tree)?;
            continue;
        }
        let path = if param_ns.is_empty() { key.to_string() } else { format!("{param_ns}.{key}") };
        let decoded = yaml_to_value(value).map_err(invalid_file)?;
        insert(tree, node_glob, &path, decoded);
    }
    Ok(())
}

fn yaml_to_value(y: &Yaml) -> std::result::Result<ParameterValue, String> {
    match y {
        Yaml::Array(items) => array_to_value(items),
        other => scalar_to_value(other),
    }
}

fn scalar_to_value(y: &Yaml) -> std::result::Result<ParameterValue, String> {
    match y {
        Yaml::Boolean(b) => Ok(ParameterValue::Bool(*b)),
        Yaml::Integer(i) => Ok(ParameterValue::Int(*i)),
        Yaml::Real(s) => s
            .parse::<f64>()
            .map(ParameterValue::Float)
            .map_err(|_| format!("invalid floating point literal '{s}'")),
        Yaml::String(s) => Ok(ParameterValue::Str(s.clone())),
        Yaml::Null => Ok(ParameterValue::Str(String::new())),
        other => Err(format!("unsupported parameter value: {other:?}")),
    }
}

fn array_to_value(items: &[Yaml]) -> std::result::Result<ParameterValue, String> {
    let Some(first) = items.first() else {
        return Ok(ParameterValue::StrSeq(Vec::new()));
    };
    match scalar_to_value(first)? {
        ParameterValue::Bool(_) => Ok(ParameterValue::BoolSeq(collect_seq(items, "bool", |v| match v {
            ParameterValue::Bool(b) => Some(b),
            _ => None,
        })?)),
        ParameterValue::Int(_) => Ok(ParameterValue::IntSeq(collect_seq(items, "int", |v| match v {
            ParameterValue::Int(i) => Some(i),
            _ => None,
        })?)),
        ParameterValue::Float(_) => Ok(ParameterValue::FloatSeq(collect_seq(items, "float", |v| match v {
            ParameterValue::Float(f) => Some(f),
            _ => None,
        })?)),
        ParameterValue::Str(_) => Ok(ParameterValue::StrSeq(collect_seq(items, "string", |v| match v {
            ParameterValue::Str(s) => Some(s),
            _ => None,
        })?)),
        _ => unreachable!("scalar_to_value never returns a sequence"),
    }
}

fn collect_seq<T>(
    items: &[Yaml],
    kind: &str,
    extract: impl Fn(ParameterValue) -> Option<T>,
) -> std::result::Result<Vec<T>, String> {
    items
        .iter()
        .map(|item| {
            let value = scalar_to_value(item)?;
            extract(value).ok_or_else(|| format!("sequence mixes {kind} with a different element type"))
        })
        .collect()
}

fn as_hash(y: &Yaml) -> Result<&Hash> {
    y.as_hash()
        .ok_or_else(|| invalid_file("expected a YAML mapping at this level"))
}

fn as_key(y: &Yaml) -> Result<&str> {
    y.as_str().ok_or_else(|| invalid_file("expected a string key"))
}

fn invalid_file(message: impl Into<String>) -> Error {
    Error::InvalidParamFile { path: Path::new("<inline>").to_path_buf(), message: message.into() }
}
