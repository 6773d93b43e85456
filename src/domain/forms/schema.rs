//! Form schema types
//!
//! Declarative description of a form: sections of field descriptors, each with
//! a kind, constraints and (for choice kinds) an ordered option list.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

// ============================================================================
// Field Kind
// ============================================================================

/// Input kind of a field
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    #[default]
    Text,
    Password,
    Email,
    Number,
    Date,
    Datetime,
    Select,
    Multiselect,
    Textarea,
    File,
    CheckboxGroup,
    /// Any `type` string the engine does not know. Rendered as plain text.
    #[serde(other)]
    Unknown,
}

impl FieldKind {
    /// Kinds whose value is an array
    pub fn is_multi_value(self) -> bool {
        matches!(self, FieldKind::Multiselect | FieldKind::CheckboxGroup)
    }

    /// Kinds that pick from `options`
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            FieldKind::Select | FieldKind::Multiselect | FieldKind::CheckboxGroup
        )
    }

    /// Wrap a lone scalar into an array for multi-value kinds
    pub fn coerce(self, value: Value) -> Value {
        match value {
            Value::Array(_) => value,
            Value::Null if self.is_multi_value() => Value::Array(Vec::new()),
            scalar if self.is_multi_value() => Value::Array(vec![scalar]),
            scalar => scalar,
        }
    }

    /// Value a field of this kind holds when nothing was supplied
    pub fn empty_value(self) -> Value {
        if self.is_multi_value() {
            Value::Array(Vec::new())
        } else {
            Value::String(String::new())
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Text => write!(f, "text"),
            FieldKind::Password => write!(f, "password"),
            FieldKind::Email => write!(f, "email"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Date => write!(f, "date"),
            FieldKind::Datetime => write!(f, "datetime"),
            FieldKind::Select => write!(f, "select"),
            FieldKind::Multiselect => write!(f, "multiselect"),
            FieldKind::Textarea => write!(f, "textarea"),
            FieldKind::File => write!(f, "file"),
            FieldKind::CheckboxGroup => write!(f, "checkbox-group"),
            FieldKind::Unknown => write!(f, "unknown"),
        }
    }
}

// ============================================================================
// Options
// ============================================================================

/// One selectable option. Bare scalars in the input (`"Mr."`, `42`) are
/// normalized so the scalar serves as both label and value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawOption")]
pub struct FieldOption {
    pub label: String,
    pub value: Value,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose label is its own value
    pub fn bare(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value: Value::String(value),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOption {
    Labeled { label: String, value: Value },
    Bare(Value),
}

impl From<RawOption> for FieldOption {
    fn from(raw: RawOption) -> Self {
        match raw {
            RawOption::Labeled { label, value } => Self { label, value },
            RawOption::Bare(Value::String(s)) => Self {
                label: s.clone(),
                value: Value::String(s),
            },
            RawOption::Bare(other) => Self {
                label: other.to_string(),
                value: other,
            },
        }
    }
}

// ============================================================================
// Field Descriptor
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            options: Vec::new(),
            default_value: None,
            min_length: None,
            pattern: None,
            placeholder: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = FieldOption>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Seed value used when no initial data is supplied for this field
    pub fn seed_value(&self) -> Value {
        match &self.default_value {
            Some(Value::Null) | None => self.kind.empty_value(),
            Some(v) => self.kind.coerce(v.clone()),
        }
    }
}

// ============================================================================
// Sections and Schema
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormSection {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl FormSection {
    pub fn new(title: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmitButton {
    pub label: String,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("duplicate field name '{0}'")]
    DuplicateField(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("malformed schema: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Ordered sections of fields. Field names are unique across the whole
/// schema because the submission payload is one flat mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub sections: Vec<FormSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_button: Option<SubmitButton>,
}

impl FormSchema {
    pub fn new(title: impl Into<String>, sections: Vec<FormSection>) -> Result<Self, SchemaError> {
        let schema = Self {
            title: Some(title.into()),
            sections,
            submit_button: None,
        };
        schema.check_unique_names()?;
        Ok(schema)
    }

    /// Parse a schema from its JSON form and check name uniqueness
    #[allow(dead_code)]
    pub fn from_json(value: Value) -> Result<Self, SchemaError> {
        let schema: Self = serde_json::from_value(value)?;
        schema.check_unique_names()?;
        Ok(schema)
    }

    pub fn with_submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_button = Some(SubmitButton {
            label: label.into(),
        });
        self
    }

    pub fn submit_label(&self) -> &str {
        self.submit_button
            .as_ref()
            .map(|b| b.label.as_str())
            .unwrap_or("Submit")
    }

    /// All fields in schema order, sections flattened
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields().find(|f| f.name == name)
    }

    /// Replace the option list of a choice field, e.g. subcategories once a
    /// category has been picked.
    pub fn set_options(
        &mut self,
        name: &str,
        options: Vec<FieldOption>,
    ) -> Result<(), SchemaError> {
        let field = self
            .sections
            .iter_mut()
            .flat_map(|s| s.fields.iter_mut())
            .find(|f| f.name == name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;
        field.options = options;
        Ok(())
    }

    fn check_unique_names(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for field in self.fields() {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn options_accept_bare_and_labeled_entries() {
        let field: FieldDescriptor = serde_json::from_value(json!({
            "name": "salutation",
            "label": "Salutation",
            "type": "select",
            "options": ["Mr.", {"label": "Yes", "value": true}, 7]
        }))
        .unwrap();

        assert_eq!(field.options[0], FieldOption::bare("Mr."));
        assert_eq!(field.options[1], FieldOption::new("Yes", true));
        assert_eq!(field.options[2], FieldOption::new("7", 7));
    }

    #[test]
    fn unknown_type_falls_back_to_unknown_kind() {
        let field: FieldDescriptor = serde_json::from_value(json!({
            "name": "skills",
            "label": "Skills",
            "type": "defult"
        }))
        .unwrap();
        assert_eq!(field.kind, FieldKind::Unknown);
        assert!(!field.kind.is_multi_value());
    }

    #[test]
    fn missing_type_is_text() {
        let field: FieldDescriptor =
            serde_json::from_value(json!({"name": "city", "label": "City"})).unwrap();
        assert_eq!(field.kind, FieldKind::Text);
    }

    #[test]
    fn duplicate_names_across_sections_are_rejected() {
        let result = FormSchema::new(
            "Dup",
            vec![
                FormSection::new("A", vec![FieldDescriptor::new("email", "Email", FieldKind::Email)]),
                FormSection::new("B", vec![FieldDescriptor::new("email", "Email", FieldKind::Text)]),
            ],
        );
        assert!(matches!(result, Err(SchemaError::DuplicateField(name)) if name == "email"));
    }

    #[test]
    fn from_json_reads_camel_case_schema() {
        let schema = FormSchema::from_json(json!({
            "title": "Work Details",
            "sections": [{
                "title": "Profession Info",
                "fields": [
                    {"label": "Hourly Rate", "name": "hourlyRate", "type": "number", "required": true, "minLength": 1},
                    {"label": "Days", "name": "days", "type": "checkbox-group", "defaultValue": "Mon", "options": ["Mon", "Tue"]}
                ]
            }],
            "submitButton": {"label": "Next: Availability"}
        }))
        .unwrap();

        assert_eq!(schema.submit_label(), "Next: Availability");
        let rate = schema.field("hourlyRate").unwrap();
        assert_eq!(rate.kind, FieldKind::Number);
        assert_eq!(rate.min_length, Some(1));
        assert_eq!(schema.field("days").unwrap().seed_value(), json!(["Mon"]));
    }

    #[test]
    fn set_options_replaces_in_place() {
        let mut schema = FormSchema::new(
            "Job",
            vec![FormSection::new(
                "Job Details",
                vec![FieldDescriptor::new("subcategoryId", "Subcategory", FieldKind::Select)],
            )],
        )
        .unwrap();

        schema
            .set_options("subcategoryId", vec![FieldOption::new("Fan Repair", 3)])
            .unwrap();
        assert_eq!(schema.field("subcategoryId").unwrap().options.len(), 1);
        assert!(matches!(
            schema.set_options("missing", Vec::new()),
            Err(SchemaError::UnknownField(_))
        ));
    }
}
