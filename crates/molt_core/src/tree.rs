//! Kind-tagged recursive source trees.
//!
//! A driver hands the application a tree of sources: a bare stream, a record
//! of named sub-trees, a factory producing sub-trees on demand, an opaque
//! sequence, or nothing at all. Trees are self-referential (factories return
//! trees, records nest trees), so traversal is an explicit recursion over
//! this tagged union.

use crate::stream::{SourceRef, Value};
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// Record key identifying a sub-scope/namespace. Its value is metadata and
/// passes through instrumentation untouched.
pub const SCOPE_KEY: &str = "_scope";

/// A tree of reactive sources.
#[derive(Clone)]
pub enum SourceTree {
    /// A single push stream.
    Stream(SourceRef),
    /// A record of named sub-trees. Keys are unique; order is preserved but
    /// carries no meaning.
    Structured(IndexMap<String, SourceTree>),
    /// A factory producing a sub-tree per invocation.
    Factory(SourceFactory),
    /// An ordered list, opaque to the engine.
    Sequence(Vec<Value>),
    /// No value.
    Absent,
}

impl SourceTree {
    /// Build a structured record from `(key, sub-tree)` pairs.
    pub fn structured<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, SourceTree)>,
        K: Into<String>,
    {
        Self::Structured(
            entries
                .into_iter()
                .map(|(key, tree)| (key.into(), tree))
                .collect(),
        )
    }

    /// The stream behind this node, if it is one.
    #[must_use]
    pub fn as_stream(&self) -> Option<&SourceRef> {
        match self {
            Self::Stream(source) => Some(source),
            _ => None,
        }
    }

    /// The record behind this node, if it is one.
    #[must_use]
    pub fn as_structured(&self) -> Option<&IndexMap<String, SourceTree>> {
        match self {
            Self::Structured(map) => Some(map),
            _ => None,
        }
    }

    /// The factory behind this node, if it is one.
    #[must_use]
    pub fn as_factory(&self) -> Option<&SourceFactory> {
        match self {
            Self::Factory(factory) => Some(factory),
            _ => None,
        }
    }

    /// Look up a sub-tree by key on a structured node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SourceTree> {
        self.as_structured().and_then(|map| map.get(key))
    }
}

impl fmt::Debug for SourceTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(_) => f.write_str("Stream(..)"),
            Self::Structured(map) => f
                .debug_map()
                .entries(map.iter().map(|(k, v)| (k, v)))
                .finish(),
            Self::Factory(factory) => write!(f, "Factory({})", factory.name()),
            Self::Sequence(values) => f.debug_tuple("Sequence").field(values).finish(),
            Self::Absent => f.write_str("Absent"),
        }
    }
}

/// A named callable producing a [`SourceTree`] per invocation.
#[derive(Clone)]
pub struct SourceFactory {
    name: String,
    make: Rc<dyn Fn(&[Value]) -> SourceTree>,
}

impl SourceFactory {
    /// Create a factory from a name and a producer closure.
    pub fn new<F>(name: impl Into<String>, make: F) -> Self
    where
        F: Fn(&[Value]) -> SourceTree + 'static,
    {
        Self {
            name: name.into(),
            make: Rc::new(make),
        }
    }

    /// The factory's name, used as a path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the factory.
    #[must_use]
    pub fn invoke(&self, args: &[Value]) -> SourceTree {
        (self.make)(args)
    }
}

impl fmt::Debug for SourceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFactory")
            .field("name", &self.name)
            .finish()
    }
}
