//! Form routes
//!
//! Serve the built-in schemas as rendered forms and run validation and
//! submission for them. Requests carry the client's current values plus an
//! optional list of edits applied in order.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::domain::forms::{
    render, FieldOption, FormSchema, FormSession, FormValues, RenderedForm, ValidationErrors,
};
use crate::error::{ApiError, ApiResult};
use crate::services::form_registry::dependent_fields;

// ============================================================================
// Request Types
// ============================================================================

/// One edit. With `checked` set, `value` is a single checkbox-group option
/// to check or uncheck explicitly instead of toggling it.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldChange {
    pub name: String,
    pub value: Value,
    #[serde(default)]
    pub checked: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormRequest {
    /// Entity being edited; empty for create flows
    pub initial_data: FormValues,
    /// Current values, overriding `initial_data`
    pub values: FormValues,
    /// Edits applied after seeding
    pub changes: Vec<FieldChange>,
    /// Option lists fetched by the client, by field name
    pub options: HashMap<String, Vec<FieldOption>>,
    /// Attach validation errors to the rendered form
    pub show_errors: bool,
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: ValidationErrors,
}

// ============================================================================
// Helpers
// ============================================================================

fn schema_for(state: &AppState, form_id: &str, options: HashMap<String, Vec<FieldOption>>) -> ApiResult<FormSchema> {
    let mut schema = state
        .forms
        .get(form_id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("Form '{}' not found", form_id)))?;
    for (name, opts) in options {
        schema.set_options(&name, opts)?;
    }
    Ok(schema)
}

/// Seed a session from the request and replay its edits. Changing a parent
/// field clears the fields that depend on it.
pub(crate) fn session_for(
    form_id: &str,
    schema: &FormSchema,
    request: FormRequest,
) -> ApiResult<FormSession> {
    let mut seed = request.initial_data;
    seed.extend(request.values);
    let mut session = FormSession::initialize(schema, &seed);

    let touched: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = touched.clone();
    session.on_field_change(move |name, value| {
        tracing::debug!(field = %name, value = %value, "Form field changed");
        sink.lock().push(name.to_string());
    });

    let dependents = dependent_fields(form_id);
    for change in request.changes {
        match change.checked {
            Some(checked) => session.toggle_option(schema, &change.name, change.value, checked)?,
            None => session.set_field(schema, &change.name, change.value)?,
        };
        let changed = std::mem::take(&mut *touched.lock());
        for (parent, child) in dependents {
            if changed.iter().any(|name| name == parent) {
                session.clear_field(schema, child)?;
            }
        }
    }
    Ok(session)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /forms
pub async fn list_forms(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ids: Vec<String> = state.forms.ids().into_iter().map(str::to_string).collect();
    DataResponse::new(ids)
}

/// GET /forms/:form_id
///
/// Blank form as a create screen would show it.
pub async fn get_form(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
) -> ApiResult<DataResponse<RenderedForm>> {
    let schema = schema_for(&state, &form_id, HashMap::new())?;
    let session = FormSession::blank(&schema);
    Ok(DataResponse::new(render(&schema, &session, None)))
}

/// POST /forms/:form_id/render
pub async fn render_form(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    Json(mut request): Json<FormRequest>,
) -> ApiResult<DataResponse<RenderedForm>> {
    let schema = schema_for(&state, &form_id, std::mem::take(&mut request.options))?;
    let show_errors = request.show_errors;
    let session = session_for(&form_id, &schema, request)?;

    let errors = show_errors.then(|| session.validate(&schema));
    Ok(DataResponse::new(render(&schema, &session, errors.as_ref())))
}

/// POST /forms/:form_id/validate
pub async fn validate_form(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    Json(mut request): Json<FormRequest>,
) -> ApiResult<impl IntoResponse> {
    let schema = schema_for(&state, &form_id, std::mem::take(&mut request.options))?;
    let session = session_for(&form_id, &schema, request)?;

    let errors = session.validate(&schema);
    Ok(DataResponse::new(ValidationResponse {
        valid: errors.is_empty(),
        errors,
    }))
}

/// POST /forms/:form_id/submit
///
/// Returns the flat payload; shaping it into an entity is up to the caller.
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    Json(mut request): Json<FormRequest>,
) -> ApiResult<impl IntoResponse> {
    let schema = schema_for(&state, &form_id, std::mem::take(&mut request.options))?;
    let session = session_for(&form_id, &schema, request)?;

    let payload = session.submit(&schema)?;
    tracing::info!(form = %form_id, fields = payload.len(), "Form submitted");
    Ok(DataResponse::new(payload))
}
