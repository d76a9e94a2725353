//! Shape classification for source-tree values.
//!
//! Classification is total and unambiguous: the tree is a tagged union, so
//! every node carries exactly one kind and exhaustiveness is enforced at
//! compile time rather than through runtime handler tables.

use crate::tree::SourceTree;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The shape category of a source-tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// A push stream.
    Stream,
    /// A record of named sub-trees.
    Structured,
    /// A callable producing sub-trees.
    Factory,
    /// An opaque ordered list.
    Sequence,
    /// No value.
    Absent,
}

impl Kind {
    /// Every kind the engine recognizes.
    pub const ALL: [Kind; 5] = [
        Kind::Stream,
        Kind::Structured,
        Kind::Factory,
        Kind::Sequence,
        Kind::Absent,
    ];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stream => "stream",
            Self::Structured => "structured",
            Self::Factory => "factory",
            Self::Sequence => "sequence",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SourceTree {
    /// Classify this node.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Stream(_) => Kind::Stream,
            Self::Structured(_) => Kind::Structured,
            Self::Factory(_) => Kind::Factory,
            Self::Sequence(_) => Kind::Sequence,
            Self::Absent => Kind::Absent,
        }
    }
}
