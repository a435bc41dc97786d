//! ModelKind - The model registry.
//!
//! A closed enumeration of every model type the storage layer knows about.
//! Each variant maps to exactly one type tag and one collection name; the
//! exhaustive matches keep the mapping checkable at compile time. The
//! registry is populated here, once, and never mutated at runtime.

use serde::{Deserialize, Serialize};

/// Registered model types. One variant per type tag; one collection per
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    User,
}

impl ModelKind {
    /// Every registered kind. The transactional backend walks this list to
    /// establish collection namespaces before first use.
    pub const ALL: &'static [ModelKind] = &[ModelKind::User];

    /// The string type tag callers use to name this model.
    pub fn tag(self) -> &'static str {
        match self {
            ModelKind::User => "User",
        }
    }

    /// The collection name instances of this model are persisted under.
    pub fn collection(self) -> &'static str {
        match self {
            ModelKind::User => "users",
        }
    }

    /// Resolve a string type tag. Unknown tags yield None; callers treat
    /// that as a misconfiguration, not a runtime condition.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "User" => Some(ModelKind::User),
            _ => None,
        }
    }
}
