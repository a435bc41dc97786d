//! User - A registered model with required id/name and optional email.

use serde::Serialize;

use super::{optional_str, require_str, Audit, Model, ModelKind, Record, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub audit: Audit,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        User {
            id: id.into(),
            name: name.into(),
            email: None,
            audit: Audit::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl Model for User {
    const KIND: ModelKind = ModelKind::User;

    fn id(&self) -> &str {
        &self.id
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn from_record(record: &Record) -> Result<Self, ValidationError> {
        let mut missing = Vec::new();
        let id = require_str(record, "id", &mut missing);
        let name = require_str(record, "name", &mut missing);

        match (id, name) {
            (Some(id), Some(name)) => Ok(User {
                id,
                name,
                email: optional_str(record, "email"),
                audit: Audit::from_record(record),
            }),
            _ => Err(ValidationError::new(ModelKind::User, missing)),
        }
    }
}
