//! Stable path identifiers for positions in a source tree.
//!
//! A path records the traversal from the tree root: record-key accesses and
//! factory invocations with their stringified arguments. Two instances built
//! from drivers with isomorphic tree shape produce identical paths for
//! corresponding positions, which is what lets a log recorded against one
//! instance be replayed into another.

use crate::stream::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in a source tree, as a traversal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Path(String);

impl Path {
    /// The root of a structured tree. Renders as the empty string; segments
    /// are appended below it.
    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// The root of a tree that is itself a bare stream or factory.
    #[must_use]
    pub fn root() -> Self {
        Self(":root".to_string())
    }

    /// Descend through a record key.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        Self(format!("{}/{}", self.0, key))
    }

    /// Descend through a factory invocation.
    ///
    /// Arguments are rendered JS-style: strings bare, everything else as
    /// compact JSON, comma-joined. Two invocations whose arguments render
    /// identically alias the same path; this is a deliberate simplification
    /// and part of the replay contract.
    #[must_use]
    pub fn call(&self, name: &str, args: &[Value]) -> Self {
        let rendered: Vec<String> = args.iter().map(render_arg).collect();
        Self(format!("{}/{}({})", self.0, name, rendered.join(",")))
    }

    /// The raw traversal string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn render_arg(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
