//! Canonical form for structural comparison of resource specs.
//!
//! A spec is converted through its serde representation into a [`Node`]
//! tree. Records are keyed by a `BTreeMap`, so field order never matters;
//! sequence order, value types, presence of optional fields and numeric
//! values all do.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::decision::FieldPath;

/// Normalized value
#[derive(Clone, Debug)]
pub enum Node {
    Null,
    Bool(bool),
    Integer(i64),
    /// Unsigned integers above `i64::MAX`
    Unsigned(u64),
    Float(f64),
    String(String),
    Sequence(Vec<Node>),
    Record(BTreeMap<String, Node>),
}

impl Node {
    fn type_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Integer(_) => "integer",
            Node::Unsigned(_) => "unsigned",
            Node::Float(_) => "float",
            Node::String(_) => "string",
            Node::Sequence(_) => "sequence",
            Node::Record(_) => "record",
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Node::Unsigned(u)
                } else {
                    // serde_json numbers are always one of i64, u64 or finite f64
                    Node::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Object(fields) => Node::Record(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Convert any serializable value into its normalized tree.
pub fn normalize<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Node> {
    serde_json::to_value(value).map(Node::from)
}

/// Structural equality of two normalized trees.
pub fn structurally_equal(a: &Node, b: &Node) -> bool {
    first_difference(a, b, &FieldPath::root()).is_none()
}

/// Path of the first point at which `a` and `b` differ, relative to `base`.
///
/// Records are walked in key order, so the result is deterministic.
pub fn first_difference(a: &Node, b: &Node, base: &FieldPath) -> Option<FieldPath> {
    match (a, b) {
        (Node::Null, Node::Null) => None,
        (Node::Bool(x), Node::Bool(y)) => (x != y).then(|| base.clone()),
        (Node::Integer(x), Node::Integer(y)) => (x != y).then(|| base.clone()),
        (Node::Unsigned(x), Node::Unsigned(y)) => (x != y).then(|| base.clone()),
        (Node::Float(x), Node::Float(y)) => (x != y).then(|| base.clone()),
        (Node::String(x), Node::String(y)) => (x != y).then(|| base.clone()),
        (Node::Sequence(xs), Node::Sequence(ys)) => {
            if let Some(diff) = xs
                .iter()
                .zip(ys)
                .enumerate()
                .find_map(|(i, (x, y))| first_difference(x, y, &base.index(i)))
            {
                return Some(diff);
            }
            (xs.len() != ys.len()).then(|| base.index(xs.len().min(ys.len())))
        }
        (Node::Record(xs), Node::Record(ys)) => {
            // A key present on only one side differs at that key
            let keys: std::collections::BTreeSet<&String> = xs.keys().chain(ys.keys()).collect();
            keys.into_iter().find_map(|key| match (xs.get(key), ys.get(key)) {
                (Some(x), Some(y)) => first_difference(x, y, &base.child(key.as_str())),
                _ => Some(base.child(key.as_str())),
            })
        }
        (x, y) => {
            tracing::trace!(
                path = %base,
                left = x.type_name(),
                right = y.type_name(),
                "Type mismatch"
            );
            Some(base.clone())
        }
    }
}
