//! Built-in form schemas, looked up by id
//!
//! Each create/edit screen gets its schema from here. Option lists that come
//! from the backend (roles, categories, subcategories) start empty and are
//! filled by the caller with `FormSchema::set_options`.

use std::collections::HashMap;

use crate::domain::forms::{FieldDescriptor, FieldKind, FieldOption, FormSchema, FormSection, SchemaError};

pub const USER_FORM: &str = "user";
pub const WORKER_DETAILS_FORM: &str = "worker-details";
pub const WORKER_AVAILABILITY_FORM: &str = "worker-availability";
pub const CATEGORY_FORM: &str = "category";
pub const SUBCATEGORY_FORM: &str = "subcategory";
pub const BOOKING_FORM: &str = "booking";

#[derive(Debug, Clone, Default)]
pub struct FormRegistry {
    schemas: HashMap<String, FormSchema>,
}

impl FormRegistry {
    pub fn builtin() -> Result<Self, SchemaError> {
        let mut registry = Self::default();
        registry.insert(USER_FORM, user_schema()?);
        registry.insert(WORKER_DETAILS_FORM, worker_details_schema()?);
        registry.insert(WORKER_AVAILABILITY_FORM, worker_availability_schema()?);
        registry.insert(CATEGORY_FORM, category_schema()?);
        registry.insert(SUBCATEGORY_FORM, subcategory_schema()?);
        registry.insert(BOOKING_FORM, booking_schema()?);
        Ok(registry)
    }

    pub fn insert(&mut self, id: impl Into<String>, schema: FormSchema) {
        self.schemas.insert(id.into(), schema);
    }

    pub fn get(&self, id: &str) -> Option<&FormSchema> {
        self.schemas.get(id)
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

/// `(parent, child)` pairs: changing the parent clears the child, whose
/// options depend on the parent's value.
pub fn dependent_fields(form_id: &str) -> &'static [(&'static str, &'static str)] {
    match form_id {
        USER_FORM => &[("categoryId", "subcategoryId")],
        _ => &[],
    }
}

fn bare_options(values: &[&str]) -> Vec<FieldOption> {
    values.iter().map(|v| FieldOption::bare(*v)).collect()
}

pub fn user_schema() -> Result<FormSchema, SchemaError> {
    Ok(FormSchema::new(
        "User Details",
        vec![
            FormSection::new(
                "Basic User Details",
                vec![
                    FieldDescriptor::new("employeeId", "Employee ID", FieldKind::Text).required(),
                    FieldDescriptor::new("salutation", "Salutation", FieldKind::Select)
                        .with_options(bare_options(&["Mr.", "Ms.", "Mrs.", "Dr."])),
                    FieldDescriptor::new("password", "Password", FieldKind::Password)
                        .required()
                        .min_length(6),
                    FieldDescriptor::new("firstName", "First Name", FieldKind::Text).required(),
                    FieldDescriptor::new("lastName", "Last Name", FieldKind::Text).required(),
                    FieldDescriptor::new("photo", "Photo", FieldKind::File),
                ],
            ),
            FormSection::new(
                "Personal Information",
                vec![
                    FieldDescriptor::new("birthDate", "Date of Birth", FieldKind::Date),
                    FieldDescriptor::new("gender", "Gender", FieldKind::Select)
                        .with_options(bare_options(&["Male", "Female", "Other"])),
                    FieldDescriptor::new("nationality", "Nationality", FieldKind::Text),
                ],
            ),
            FormSection::new(
                "Job Details",
                vec![
                    FieldDescriptor::new("categoryId", "Category", FieldKind::Select)
                        .required()
                        .placeholder("Select a Category"),
                    FieldDescriptor::new("subcategoryId", "Subcategory", FieldKind::Select)
                        .required()
                        .placeholder("Select a Subcategory"),
                    FieldDescriptor::new("skills", "Skills", FieldKind::Text)
                        .placeholder("Enter skills separated by commas"),
                ],
            ),
            FormSection::new(
                "Contact Details",
                vec![
                    FieldDescriptor::new("phone", "Phone Number", FieldKind::Text)
                        .pattern(r"^\+?[0-9][0-9 \-]{6,}$"),
                    FieldDescriptor::new("email", "Email", FieldKind::Email).required(),
                    FieldDescriptor::new("address", "Address", FieldKind::Text),
                    FieldDescriptor::new("city", "City", FieldKind::Text),
                    FieldDescriptor::new("state", "State", FieldKind::Text),
                    FieldDescriptor::new("country", "Country", FieldKind::Text),
                ],
            ),
            FormSection::new(
                "Role Assignment",
                vec![FieldDescriptor::new("roles", "Roles", FieldKind::Multiselect)],
            ),
        ],
    )?
    .with_submit_label("Next"))
}

pub fn worker_details_schema() -> Result<FormSchema, SchemaError> {
    Ok(FormSchema::new(
        "Work Details",
        vec![FormSection::new(
            "Profession Info",
            vec![
                FieldDescriptor::new("profession", "Profession", FieldKind::Text).required(),
                FieldDescriptor::new("experience", "Experience", FieldKind::Text).required(),
                FieldDescriptor::new("hourlyRate", "Hourly Rate", FieldKind::Number).required(),
            ],
        )],
    )?
    .with_submit_label("Next: Availability"))
}

pub fn worker_availability_schema() -> Result<FormSchema, SchemaError> {
    Ok(FormSchema::new(
        "Availability",
        vec![FormSection::new(
            "Work Area & Availability",
            vec![
                FieldDescriptor::new("serviceArea", "Service Area", FieldKind::Text).required(),
                FieldDescriptor::new("available", "Available", FieldKind::Select)
                    .required()
                    .with_options(vec![FieldOption::new("Yes", true), FieldOption::new("No", false)]),
                FieldDescriptor::new("workingDays", "Working Days", FieldKind::CheckboxGroup)
                    .with_options(bare_options(&["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"])),
            ],
        )],
    )?
    .with_submit_label("Submit Profile"))
}

pub fn category_schema() -> Result<FormSchema, SchemaError> {
    Ok(FormSchema::new(
        "Category",
        vec![FormSection::new(
            "Category Details",
            vec![
                FieldDescriptor::new("categoryName", "Category Name", FieldKind::Text)
                    .required()
                    .min_length(2),
                FieldDescriptor::new("description", "Description", FieldKind::Textarea),
            ],
        )],
    )?
    .with_submit_label("Save Category"))
}

pub fn subcategory_schema() -> Result<FormSchema, SchemaError> {
    Ok(FormSchema::new(
        "Subcategory",
        vec![FormSection::new(
            "Subcategory Details",
            vec![
                FieldDescriptor::new("categoryId", "Category", FieldKind::Select).required(),
                FieldDescriptor::new("subcategoryName", "Subcategory Name", FieldKind::Text)
                    .required()
                    .min_length(2),
                FieldDescriptor::new("description", "Description", FieldKind::Textarea),
            ],
        )],
    )?
    .with_submit_label("Save Subcategory"))
}

pub fn booking_schema() -> Result<FormSchema, SchemaError> {
    Ok(FormSchema::new(
        "Book Service",
        vec![
            FormSection::new(
                "Schedule",
                vec![
                    FieldDescriptor::new("scheduledStartTime", "Start Time", FieldKind::Datetime)
                        .required(),
                    FieldDescriptor::new("scheduledEndTime", "End Time", FieldKind::Datetime)
                        .required(),
                    FieldDescriptor::new("priority", "Priority", FieldKind::Select)
                        .with_options(vec![
                            FieldOption::new("Urgent", "URGENT"),
                            FieldOption::new("Scheduled", "SCHEDULED"),
                            FieldOption::new("Flexible", "FLEXIBLE"),
                        ])
                        .with_default("SCHEDULED"),
                ],
            ),
            FormSection::new(
                "Job",
                vec![
                    FieldDescriptor::new("serviceType", "Service Type", FieldKind::Select)
                        .required()
                        .with_options(bare_options(&["Plumbing", "Electrician", "Cleaning", "Other"])),
                    FieldDescriptor::new("address", "Address", FieldKind::Text).required(),
                    FieldDescriptor::new("description", "Description", FieldKind::Textarea),
                ],
            ),
            FormSection::new(
                "Payment",
                vec![
                    FieldDescriptor::new("estimatedPrice", "Estimated Price", FieldKind::Number)
                        .required(),
                    FieldDescriptor::new("paymentMethod", "Payment Method", FieldKind::Select)
                        .with_options(vec![
                            FieldOption::new("Cash", "CASH"),
                            FieldOption::new("UPI", "UPI"),
                            FieldOption::new("Card", "CARD"),
                        ])
                        .with_default("CASH"),
                    FieldDescriptor::new("couponCode", "Coupon Code", FieldKind::Text),
                ],
            ),
        ],
    )?
    .with_submit_label("Confirm Booking"))
}
