//! Schema-driven form engine
//!
//! A `FormSchema` describes sections of fields. A `FormSession` holds the
//! current values, `validate` turns them into per-field errors and
//! `FormSession::submit` produces the flat payload handed to callers.
//! The engine knows nothing about the entities its payloads describe.

pub mod render;
pub mod schema;
pub mod session;
pub mod validation;
pub mod values;

pub use render::{render, RenderedForm};
pub use schema::{FieldDescriptor, FieldKind, FieldOption, FormSchema, FormSection, SchemaError};
pub use session::{FormSession, SubmitError};
pub use validation::ValidationErrors;
pub use values::FormValues;
