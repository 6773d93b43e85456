//! Form validation
//!
//! Validation errors are data: a mapping from field name to message, empty
//! when every field passes. Every field is checked; for one field the first
//! failing rule wins.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::schema::{FieldDescriptor, FieldKind, FormSchema};
use super::values::{self, FormValues};

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.len() {
            1 => write!(f, "1 field failed validation"),
            n => write!(f, "{} fields failed validation", n),
        }
    }
}

/// Validate `values` against every field of `schema`, in schema order
pub fn validate(schema: &FormSchema, values: &FormValues) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for field in schema.fields() {
        let value = values.get(&field.name).unwrap_or(&Value::Null);
        if let Some(message) = check_field(field, value) {
            errors.insert(field.name.clone(), message);
        }
    }
    errors
}

fn check_field(field: &FieldDescriptor, value: &Value) -> Option<String> {
    if field.required && values::is_empty(value) {
        return Some(format!("{} is required", field.label));
    }

    if let (Some(min), Value::String(text)) = (field.min_length, value) {
        if text.chars().count() < min {
            return Some(format!(
                "{} must be at least {} characters",
                field.label, min
            ));
        }
    }

    // Remaining rules only look at provided values
    if values::is_empty(value) {
        return None;
    }

    if field.kind == FieldKind::Email {
        match value.as_str() {
            Some(text) if values::is_email(text.trim()) => {}
            _ => return Some("Invalid email format".to_string()),
        }
    }

    if let (Some(pattern), Some(text)) = (field.pattern.as_deref(), value.as_str()) {
        match values::pattern_regex(pattern) {
            Some(re) if !re.is_match(text) => {
                return Some(format!("{} has an invalid format", field.label));
            }
            _ => {}
        }
    }

    if !values::is_well_formed(field.kind, value) {
        let message = match field.kind {
            FieldKind::Number => format!("{} must be a number", field.label),
            _ => format!("{} must be a valid date", field.label),
        };
        return Some(message);
    }

    None
}
