//! Form session: the controlled value mapping behind one rendered form

use serde_json::Value;
use std::future::Future;
use thiserror::Error;

use super::schema::{FieldKind, FormSchema, SchemaError};
use super::validation::{validate, ValidationErrors};
use super::values::{self, FormValues};

/// Observer notified after every field update with the field name and its new value
pub type FieldObserver = Box<dyn Fn(&str, &Value) + Send + Sync>;

#[derive(Debug, Error)]
pub enum SubmitError<E> {
    #[error("{0}")]
    Invalid(ValidationErrors),

    #[error("submit handler failed: {0}")]
    Handler(E),
}

pub struct FormSession {
    values: FormValues,
    initial_data: FormValues,
    observers: Vec<FieldObserver>,
}

impl std::fmt::Debug for FormSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormSession")
            .field("values", &self.values)
            .field("initial_data", &self.initial_data)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl FormSession {
    /// Seed every field from `initial_data`, then the field default, then the
    /// empty value of its kind.
    pub fn initialize(schema: &FormSchema, initial_data: &FormValues) -> Self {
        Self {
            values: seed(schema, initial_data),
            initial_data: initial_data.clone(),
            observers: Vec::new(),
        }
    }

    pub fn blank(schema: &FormSchema) -> Self {
        Self::initialize(schema, &FormValues::new())
    }

    /// Re-seed only when `initial_data` differs by value from the data the
    /// session was last seeded with. Returns whether a reset happened.
    #[allow(dead_code)]
    pub fn sync_initial_data(&mut self, schema: &FormSchema, initial_data: &FormValues) -> bool {
        if &self.initial_data == initial_data {
            return false;
        }
        self.initial_data = initial_data.clone();
        self.values = seed(schema, initial_data);
        tracing::debug!(fields = self.values.len(), "Form reset from new initial data");
        true
    }

    /// Discard edits and go back to the last seeded values
    #[allow(dead_code)]
    pub fn reset(&mut self, schema: &FormSchema) {
        self.values = seed(schema, &self.initial_data);
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn on_field_change<F>(&mut self, observer: F)
    where
        F: Fn(&str, &Value) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Update one field.
    ///
    /// Checkbox groups never take a whole new array: a scalar toggles that
    /// option (added when absent, removed when present) and an array toggles
    /// each of its entries. Multiselects wrap a lone scalar into an array.
    pub fn set_field(
        &mut self,
        schema: &FormSchema,
        name: &str,
        value: Value,
    ) -> Result<&Value, SchemaError> {
        let kind = schema
            .field(name)
            .map(|f| f.kind)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;

        let next = match kind {
            FieldKind::CheckboxGroup => {
                let mut current = self.array_value(name);
                let toggles = match value {
                    Value::Array(items) => items,
                    Value::Null => Vec::new(),
                    scalar => vec![scalar],
                };
                for option in toggles {
                    let checked = !current.contains(&option);
                    apply_toggle(&mut current, option, checked);
                }
                Value::Array(current)
            }
            FieldKind::Multiselect => kind.coerce(value),
            _ => value,
        };

        Ok(self.store(name, next))
    }

    /// Explicitly check or uncheck one option of a checkbox group
    pub fn toggle_option(
        &mut self,
        schema: &FormSchema,
        name: &str,
        option: Value,
        checked: bool,
    ) -> Result<&Value, SchemaError> {
        match schema.field(name) {
            Some(field) if field.kind == FieldKind::CheckboxGroup => {}
            Some(_) | None => return Err(SchemaError::UnknownField(name.to_string())),
        }
        let mut current = self.array_value(name);
        apply_toggle(&mut current, option, checked);
        Ok(self.store(name, Value::Array(current)))
    }

    /// Set a field back to the empty value of its kind
    pub fn clear_field(&mut self, schema: &FormSchema, name: &str) -> Result<&Value, SchemaError> {
        let kind = schema
            .field(name)
            .map(|f| f.kind)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;
        Ok(self.store(name, kind.empty_value()))
    }

    pub fn validate(&self, schema: &FormSchema) -> ValidationErrors {
        validate(schema, &self.values)
    }

    /// Validate and, when every field passes, produce the flat payload with
    /// committed values (ISO-8601 dates, numeric numbers).
    pub fn submit(&self, schema: &FormSchema) -> Result<FormValues, ValidationErrors> {
        let errors = self.validate(schema);
        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), "Form submission blocked by validation");
            return Err(errors);
        }

        let mut payload = FormValues::new();
        for field in schema.fields() {
            let value = self
                .values
                .get(&field.name)
                .cloned()
                .unwrap_or_else(|| field.kind.empty_value());
            payload.insert(field.name.clone(), values::commit(field.kind, &value));
        }
        Ok(payload)
    }

    /// Submit and hand the payload to an async handler. The handler's error
    /// is surfaced unchanged; nothing is retried.
    pub async fn submit_with<F, Fut, T, E>(
        &self,
        schema: &FormSchema,
        handler: F,
    ) -> Result<T, SubmitError<E>>
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let payload = self.submit(schema).map_err(SubmitError::Invalid)?;
        handler(payload).await.map_err(SubmitError::Handler)
    }

    fn array_value(&self, name: &str) -> Vec<Value> {
        match self.values.get(name) {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) if values::is_empty(other) => Vec::new(),
            Some(other) => vec![other.clone()],
        }
    }

    fn store(&mut self, name: &str, value: Value) -> &Value {
        self.values.insert(name.to_string(), value);
        let stored = &self.values[name];
        for observer in &self.observers {
            observer(name, stored);
        }
        stored
    }
}

fn apply_toggle(current: &mut Vec<Value>, option: Value, checked: bool) {
    if checked {
        if !current.contains(&option) {
            current.push(option);
        }
    } else {
        current.retain(|v| v != &option);
    }
}

fn seed(schema: &FormSchema, initial_data: &FormValues) -> FormValues {
    schema
        .fields()
        .map(|field| {
            let value = match initial_data.get(&field.name) {
                Some(Value::Null) | None => field.seed_value(),
                Some(Value::String(s)) if field.kind.is_multi_value() && s.trim().is_empty() => {
                    field.seed_value()
                }
                Some(v) => field.kind.coerce(v.clone()),
            };
            (field.name.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forms::schema::{FieldDescriptor, FieldOption, FormSection};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn map(v: Value) -> FormValues {
        v.as_object().cloned().unwrap()
    }

    fn schema() -> FormSchema {
        FormSchema::new(
            "Worker",
            vec![
                FormSection::new(
                    "Profile",
                    vec![
                        FieldDescriptor::new("profession", "Profession", FieldKind::Text).required(),
                        FieldDescriptor::new("hourlyRate", "Hourly Rate", FieldKind::Number)
                            .with_default(250),
                        FieldDescriptor::new("days", "Days", FieldKind::CheckboxGroup).with_options(
                            ["A", "B", "X"].into_iter().map(FieldOption::bare),
                        ),
                        FieldDescriptor::new("skills", "Skills", FieldKind::Multiselect),
                    ],
                ),
                FormSection::new(
                    "Schedule",
                    vec![
                        FieldDescriptor::new("startsAt", "Starts At", FieldKind::Datetime),
                        FieldDescriptor::new("photo", "Photo", FieldKind::File),
                    ],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn initialize_prefers_initial_data_then_default_then_empty() {
        let session = FormSession::initialize(&schema(), &map(json!({"profession": "Plumber"})));
        assert_eq!(session.value("profession"), Some(&json!("Plumber")));
        assert_eq!(session.value("hourlyRate"), Some(&json!(250)));
        assert_eq!(session.value("days"), Some(&json!([])));
        assert_eq!(session.value("skills"), Some(&json!([])));
        assert_eq!(session.value("startsAt"), Some(&json!("")));
    }

    #[test]
    fn multi_value_seeds_are_arrays() {
        let session = FormSession::initialize(
            &schema(),
            &map(json!({"days": "", "skills": "wiring"})),
        );
        assert_eq!(session.value("days"), Some(&json!([])));
        assert_eq!(session.value("skills"), Some(&json!(["wiring"])));
    }

    #[test]
    fn checkbox_group_union_and_difference() {
        let schema = schema();
        let mut session =
            FormSession::initialize(&schema, &map(json!({"days": ["A", "B"]})));

        session.set_field(&schema, "days", json!("X")).unwrap();
        let mut days: Vec<String> = serde_json::from_value(session.value("days").cloned().unwrap()).unwrap();
        days.sort();
        assert_eq!(days, vec!["A", "B", "X"]);

        session.set_field(&schema, "days", json!("A")).unwrap();
        assert_eq!(session.value("days"), Some(&json!(["B", "X"])));

        session.toggle_option(&schema, "days", json!("B"), true).unwrap();
        assert_eq!(session.value("days"), Some(&json!(["B", "X"])));
        session.toggle_option(&schema, "days", json!("B"), false).unwrap();
        assert_eq!(session.value("days"), Some(&json!(["X"])));
    }

    #[test]
    fn multiselect_wraps_scalars() {
        let schema = schema();
        let mut session = FormSession::blank(&schema);
        session.set_field(&schema, "skills", json!("wiring")).unwrap();
        assert_eq!(session.value("skills"), Some(&json!(["wiring"])));
        session.set_field(&schema, "skills", json!(["a", "b"])).unwrap();
        assert_eq!(session.value("skills"), Some(&json!(["a", "b"])));
    }

    #[test]
    fn unknown_field_is_an_error() {
        let schema = schema();
        let mut session = FormSession::blank(&schema);
        assert!(matches!(
            session.set_field(&schema, "nope", json!(1)),
            Err(SchemaError::UnknownField(_))
        ));
    }

    #[test]
    fn observers_see_the_new_value() {
        let schema = schema();
        let mut session = FormSession::initialize(&schema, &map(json!({"days": ["A"]})));
        let seen: Arc<Mutex<Vec<(String, Value)>>> = Arc::default();
        let sink = seen.clone();
        session.on_field_change(move |name, value| {
            sink.lock().unwrap().push((name.to_string(), value.clone()));
        });

        session.set_field(&schema, "days", json!("B")).unwrap();
        session.clear_field(&schema, "profession").unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], ("days".to_string(), json!(["A", "B"])));
        assert_eq!(seen[1], ("profession".to_string(), json!("")));
    }

    #[test]
    fn sync_resets_only_on_value_change() {
        let schema = schema();
        let initial = map(json!({"profession": "Electrician"}));
        let mut session = FormSession::initialize(&schema, &initial);
        session.set_field(&schema, "profession", json!("Carpenter")).unwrap();

        // Same data, new allocation: edits survive
        assert!(!session.sync_initial_data(&schema, &initial.clone()));
        assert_eq!(session.value("profession"), Some(&json!("Carpenter")));

        assert!(session.sync_initial_data(&schema, &map(json!({"profession": "Painter"}))));
        assert_eq!(session.value("profession"), Some(&json!("Painter")));
    }

    #[test]
    fn reset_restores_seed() {
        let schema = schema();
        let mut session = FormSession::blank(&schema);
        session.set_field(&schema, "hourlyRate", json!("900")).unwrap();
        session.reset(&schema);
        assert_eq!(session.value("hourlyRate"), Some(&json!(250)));
    }

    #[test]
    fn submit_commits_values() {
        let schema = schema();
        let mut session = FormSession::blank(&schema);
        assert_eq!(
            session.submit(&schema).unwrap_err().get("profession"),
            Some("Profession is required")
        );

        session.set_field(&schema, "profession", json!("Plumber")).unwrap();
        session.set_field(&schema, "hourlyRate", json!("300")).unwrap();
        session.set_field(&schema, "startsAt", json!("2025-10-12 15:00")).unwrap();
        session
            .set_field(&schema, "photo", json!({"name": "fan.jpg", "ref": "upload-7"}))
            .unwrap();

        let payload = session.submit(&schema).unwrap();
        assert_eq!(payload["profession"], json!("Plumber"));
        assert_eq!(payload["hourlyRate"], json!(300));
        assert_eq!(payload["startsAt"], json!("2025-10-12T15:00:00Z"));
        assert_eq!(payload["photo"], json!({"name": "fan.jpg", "ref": "upload-7"}));
        // session keeps the raw text until the caller resets it
        assert_eq!(session.value("startsAt"), Some(&json!("2025-10-12 15:00")));
    }

    #[test]
    fn email_form_submits_flat_payload() {
        let schema = FormSchema::new(
            "Login",
            vec![FormSection::new(
                "",
                vec![FieldDescriptor::new("email", "Email", FieldKind::Email).required()],
            )],
        )
        .unwrap();
        let mut session = FormSession::blank(&schema);
        session.set_field(&schema, "email", json!(" a@b.com ")).unwrap();
        assert_eq!(session.submit(&schema).unwrap(), map(json!({"email": "a@b.com"})));
    }

    #[tokio::test]
    async fn submit_with_runs_handler_only_when_valid() {
        let schema = schema();
        let mut session = FormSession::blank(&schema);

        let result = session
            .submit_with(&schema, |_| async { Ok::<_, String>("should not run") })
            .await;
        assert!(matches!(result, Err(SubmitError::Invalid(_))));

        session.set_field(&schema, "profession", json!("Plumber")).unwrap();
        let result = session
            .submit_with(&schema, |payload| async move {
                Ok::<_, String>(payload["profession"].clone())
            })
            .await;
        assert_eq!(result.unwrap(), json!("Plumber"));

        let result = session
            .submit_with(&schema, |_| async {
                Err::<(), _>("backend unavailable".to_string())
            })
            .await;
        assert!(matches!(result, Err(SubmitError::Handler(e)) if e == "backend unavailable"));
    }
}
