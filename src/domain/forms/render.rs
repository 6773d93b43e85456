//! Rendering contract
//!
//! Maps a schema and session onto a technology-neutral description of the
//! controls a client should draw. Each kind maps to exactly one control and
//! option lists keep their given order.

use serde::Serialize;
use serde_json::Value;

use super::schema::{FieldDescriptor, FieldKind, FormSchema};
use super::session::FormSession;
use super::validation::ValidationErrors;

const SELECT_PLACEHOLDER: &str = "Select a value";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    TextInput,
    PasswordInput,
    EmailInput,
    NumberInput,
    DatePicker,
    DateTimePicker,
    Select,
    MultiSelect,
    TextArea,
    FilePicker,
    CheckboxGroup,
}

impl Control {
    pub fn for_kind(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text | FieldKind::Unknown => Control::TextInput,
            FieldKind::Password => Control::PasswordInput,
            FieldKind::Email => Control::EmailInput,
            FieldKind::Number => Control::NumberInput,
            FieldKind::Date => Control::DatePicker,
            FieldKind::Datetime => Control::DateTimePicker,
            FieldKind::Select => Control::Select,
            FieldKind::Multiselect => Control::MultiSelect,
            FieldKind::Textarea => Control::TextArea,
            FieldKind::File => Control::FilePicker,
            FieldKind::CheckboxGroup => Control::CheckboxGroup,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderedOption {
    pub label: String,
    pub value: Value,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderedField {
    pub name: String,
    pub label: String,
    pub control: Control,
    pub required: bool,
    pub value: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<RenderedOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderedSection {
    pub title: String,
    pub fields: Vec<RenderedField>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderedForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub sections: Vec<RenderedSection>,
    pub submit_label: String,
}

pub fn render(
    schema: &FormSchema,
    session: &FormSession,
    errors: Option<&ValidationErrors>,
) -> RenderedForm {
    let sections = schema
        .sections
        .iter()
        .map(|section| RenderedSection {
            title: section.title.clone(),
            fields: section
                .fields
                .iter()
                .map(|field| render_field(field, session, errors))
                .collect(),
        })
        .collect();

    RenderedForm {
        title: schema.title.clone(),
        sections,
        submit_label: schema.submit_label().to_string(),
    }
}

fn render_field(
    field: &FieldDescriptor,
    session: &FormSession,
    errors: Option<&ValidationErrors>,
) -> RenderedField {
    let control = Control::for_kind(field.kind);
    let value = session
        .value(&field.name)
        .cloned()
        .unwrap_or_else(|| field.kind.empty_value());

    // Only choice kinds carry options
    let options = if field.kind.is_choice() {
        field
            .options
            .iter()
            .map(|opt| RenderedOption {
                label: opt.label.clone(),
                value: opt.value.clone(),
                selected: is_selected(&value, &opt.value),
            })
            .collect()
    } else {
        Vec::new()
    };

    let placeholder = match field.kind {
        FieldKind::Select | FieldKind::Multiselect => Some(
            field
                .placeholder
                .clone()
                .unwrap_or_else(|| SELECT_PLACEHOLDER.to_string()),
        ),
        _ => field.placeholder.clone(),
    };

    RenderedField {
        name: field.name.clone(),
        label: field.label.clone(),
        control,
        required: field.required,
        value,
        options,
        placeholder,
        error: errors.and_then(|e| e.get(&field.name)).map(str::to_string),
    }
}

fn is_selected(current: &Value, option: &Value) -> bool {
    match current {
        Value::Array(items) => items.contains(option),
        other => other == option,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forms::schema::{FieldOption, FormSection};
    use serde_json::json;

    #[test]
    fn every_kind_has_one_control_and_unknown_is_text() {
        assert_eq!(Control::for_kind(FieldKind::Unknown), Control::TextInput);
        assert_eq!(Control::for_kind(FieldKind::CheckboxGroup), Control::CheckboxGroup);
        assert_eq!(Control::for_kind(FieldKind::Datetime), Control::DateTimePicker);
    }

    #[test]
    fn select_options_keep_order_and_duplicates() {
        let schema = FormSchema::new(
            "Profile",
            vec![FormSection::new(
                "Personal",
                vec![
                    FieldDescriptor::new("gender", "Gender", FieldKind::Select).with_options(vec![
                        FieldOption::bare("Other"),
                        FieldOption::bare("Female"),
                        FieldOption::bare("Female"),
                    ]),
                    FieldDescriptor::new("category", "Category", FieldKind::Select),
                    FieldDescriptor::new("skills", "Skills", FieldKind::Unknown),
                ],
            )],
        )
        .unwrap();
        let mut session = FormSession::blank(&schema);
        session.set_field(&schema, "gender", json!("Female")).unwrap();

        let form = render(&schema, &session, None);
        let fields = &form.sections[0].fields;

        let labels: Vec<&str> = fields[0].options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Other", "Female", "Female"]);
        assert!(fields[0].options[1].selected);
        assert!(!fields[0].options[0].selected);

        assert!(fields[1].options.is_empty());
        assert_eq!(fields[1].placeholder.as_deref(), Some("Select a value"));

        assert_eq!(fields[2].control, Control::TextInput);
        assert_eq!(form.submit_label, "Submit");
    }

    #[test]
    fn errors_attach_inline() {
        let schema = FormSchema::new(
            "Login",
            vec![FormSection::new(
                "",
                vec![FieldDescriptor::new("email", "Email", FieldKind::Email).required()],
            )],
        )
        .unwrap();
        let session = FormSession::blank(&schema);
        let errors = session.validate(&schema);
        let form = render(&schema, &session, Some(&errors));
        assert_eq!(
            form.sections[0].fields[0].error.as_deref(),
            Some("Email is required")
        );
    }
}
