/**
 * Collection Schema
 *
 * The note collection carries a schema that decides which field values the
 * store accepts. Both store backends run the same checks before touching
 * their storage, so a rejected create or update never changes the collection.
 *
 * # Rules
 *
 * - `id` is reserved and can never be supplied as a field
 * - a known field must hold a value of its declared kind, or null
 * - required fields must be present and non-null on create, and cannot be
 *   cleared by an update
 * - a strict schema rejects field names it does not know
 */

use std::collections::BTreeMap;

use crate::backend::error::{BackendError, BackendResult};
use crate::shared::{FieldValue, Fields};

/// Field name reserved for the store-assigned id
pub const RESERVED_ID_FIELD: &str = "id";

/// Value kind a schema field accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Text value
    Text,
    /// Integer or float
    Number,
    /// Boolean value
    Boolean,
    /// List of values
    List,
    /// Any value kind
    Any,
}

impl FieldKind {
    /// Whether a value is acceptable for this kind. Null is always accepted.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (_, FieldValue::Null) | (FieldKind::Any, _) => true,
            (FieldKind::Text, FieldValue::Text(_)) => true,
            (FieldKind::Number, FieldValue::Integer(_) | FieldValue::Float(_)) => true,
            (FieldKind::Boolean, FieldValue::Bool(_)) => true,
            (FieldKind::List, FieldValue::List(_)) => true,
            _ => false,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::List => "list",
            FieldKind::Any => "any",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FieldRule {
    kind: FieldKind,
    required: bool,
}

/// Schema of the note collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSchema {
    fields: BTreeMap<String, FieldRule>,
    strict: bool,
}

impl Default for NoteSchema {
    /// The sticky-note board: a title, a body, a position and a stacking order.
    fn default() -> Self {
        Self::open()
            .field("title", FieldKind::Text)
            .field("text", FieldKind::Text)
            .field("x", FieldKind::Number)
            .field("y", FieldKind::Number)
            .field("zIndex", FieldKind::Number)
    }
}

impl NoteSchema {
    /// Schema with no known fields that accepts anything except `id`
    pub fn open() -> Self {
        Self {
            fields: BTreeMap::new(),
            strict: false,
        }
    }

    /// Declare an optional field
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), FieldRule { kind, required: false });
        self
    }

    /// Declare a required field
    pub fn required(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), FieldRule { kind, required: true });
        self
    }

    /// Reject unknown field names
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Validate the fields of a note about to be created
    pub fn validate_new(&self, fields: &Fields) -> BackendResult<()> {
        self.validate_values(fields)?;
        for (name, rule) in &self.fields {
            let present = fields.get(name).is_some_and(|value| !value.is_null());
            if rule.required && !present {
                return Err(BackendError::validation(name.as_str(), "field is required"));
            }
        }
        Ok(())
    }

    /// Validate a partial patch
    pub fn validate_patch(&self, patch: &Fields) -> BackendResult<()> {
        self.validate_values(patch)?;
        for (name, value) in patch {
            let required = self.fields.get(name).is_some_and(|rule| rule.required);
            if required && value.is_null() {
                return Err(BackendError::validation(name.as_str(), "required field cannot be cleared"));
            }
        }
        Ok(())
    }

    fn validate_values(&self, fields: &Fields) -> BackendResult<()> {
        for (name, value) in fields {
            if name == RESERVED_ID_FIELD {
                return Err(BackendError::validation(name.as_str(), "field name is reserved"));
            }
            match self.fields.get(name) {
                Some(rule) if !rule.kind.accepts(value) => {
                    return Err(BackendError::validation(
                        name.as_str(),
                        format!("expected {}, got {}", rule.kind.name(), value.kind_name()),
                    ));
                }
                None if self.strict => {
                    return Err(BackendError::validation(name.as_str(), "unknown field"));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
