//! Models - Typed domain data persisted through the storage layer.
//!
//! A model is a serde-serializable struct with a stable string id, a
//! registered [`ModelKind`], and an explicit record factory. Serialization
//! produces a JSON record; rehydration goes through [`Model::from_record`],
//! which decodes field by field and reports missing required fields as a
//! structured [`ValidationError`] instead of blindly copying input.
//!
//! ## Example
//!
//! ```ignore
//! use shelfstore::{Storage, User};
//!
//! let storage = Storage::new();
//! let user = User::new("u1", "John Doe");
//! storage.save(&user).await?;
//! let loaded: Option<User> = storage.get("u1").await?;
//! ```

mod registry;
mod user;

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use registry::ModelKind;
pub use user::User;

/// A decoded record: field name to JSON value, as read back from a backend.
pub type Record = serde_json::Map<String, Value>;

/// Trait for types that can be stored as models.
pub trait Model: Serialize + Clone + Send + Sync + Sized {
    /// The registry entry for this model type. Resolves the type tag and
    /// the collection name records are persisted under.
    const KIND: ModelKind;

    /// Returns the unique identifier for this model instance.
    fn id(&self) -> &str;

    /// Audit metadata (creation/update stamps).
    fn audit(&self) -> &Audit;

    /// Mutable audit metadata, stamped by `Storage::update`.
    fn audit_mut(&mut self) -> &mut Audit;

    /// Rehydrate an instance from a decoded record, validating that every
    /// required field is present and well-typed.
    fn from_record(record: &Record) -> Result<Self, ValidationError>;

    /// Serialize this instance to its stored JSON record.
    fn to_record(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Creation and update stamps carried by every model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub created_on: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl Default for Audit {
    fn default() -> Self {
        Self::new()
    }
}

impl Audit {
    /// A fresh stamp: created now, never updated.
    pub fn new() -> Self {
        Audit {
            created_on: now_millis(),
            updated_on: None,
            updated_by: None,
        }
    }

    /// Stamp an update. The update stamp always lands after the creation
    /// stamp, even when both fall within the same millisecond.
    pub fn touch(&mut self, updated_by: Option<&str>) {
        self.updated_on = Some(now_millis().max(self.created_on + 1));
        if let Some(actor) = updated_by {
            self.updated_by = Some(actor.to_string());
        }
    }

    /// Decode stamps from a record. A record without a creation stamp gets
    /// one as of now.
    pub fn from_record(record: &Record) -> Self {
        Audit {
            created_on: record
                .get("created_on")
                .and_then(Value::as_u64)
                .unwrap_or_else(now_millis),
            updated_on: record.get("updated_on").and_then(Value::as_u64),
            updated_by: optional_str(record, "updated_by"),
        }
    }
}

/// Milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A record failed required-field validation during rehydration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ModelKind,
    pub missing: Vec<&'static str>,
}

impl ValidationError {
    pub fn new(kind: ModelKind, missing: Vec<&'static str>) -> Self {
        ValidationError { kind, missing }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} record: missing or invalid fields: {}",
            self.kind.tag(),
            self.missing.join(", ")
        )
    }
}

impl std::error::Error for ValidationError {}

/// Pull a required string field. Absent, non-string, or empty values count
/// as missing and are recorded in `missing`.
pub fn require_str(
    record: &Record,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match record.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => {
            missing.push(field);
            None
        }
    }
}

/// Pull an optional string field. Absent or empty values yield None.
pub fn optional_str(record: &Record, field: &str) -> Option<String> {
    match record.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_advances_past_creation() {
        let mut audit = Audit::new();
        audit.touch(None);
        assert!(audit.updated_on.unwrap() > audit.created_on);
    }

    #[test]
    fn touch_records_actor() {
        let mut audit = Audit::new();
        audit.touch(Some("admin"));
        assert_eq!(audit.updated_by.as_deref(), Some("admin"));
    }

    #[test]
    fn touch_keeps_prior_actor_when_none_given() {
        let mut audit = Audit::new();
        audit.touch(Some("admin"));
        audit.touch(None);
        assert_eq!(audit.updated_by.as_deref(), Some("admin"));
    }

    #[test]
    fn audit_from_record_defaults_missing_stamps() {
        let record = Record::new();
        let audit = Audit::from_record(&record);
        assert!(audit.created_on > 0);
        assert!(audit.updated_on.is_none());
        assert!(audit.updated_by.is_none());
    }

    #[test]
    fn require_str_rejects_empty_and_wrong_type() {
        let mut record = Record::new();
        record.insert("name".into(), Value::String(String::new()));
        record.insert("count".into(), Value::from(3));

        let mut missing = Vec::new();
        assert!(require_str(&record, "name", &mut missing).is_none());
        assert!(require_str(&record, "count", &mut missing).is_none());
        assert!(require_str(&record, "absent", &mut missing).is_none());
        assert_eq!(missing, vec!["name", "count", "absent"]);
    }
}
