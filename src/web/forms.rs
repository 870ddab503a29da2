//! Form descriptors for the HTML pages.
//!
//! One static field table per record type drives the create/edit form,
//! the list table columns, and the conversion of a submitted
//! `application/x-www-form-urlencoded` body into the JSON object the
//! record type deserializes from (the same shape the REST API accepts).

use std::collections::HashMap;

use rusqlite::{params, Connection};
use serde_json::{Map, Value};

use crate::db::DatabaseError;
use crate::models::{BloodType, ConsultationStatus, EntityKind, Sex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choices {
    Sex,
    BloodType,
    ConsultationStatus,
}

impl Choices {
    /// `(code, label)` pairs in declaration order.
    pub fn options(self) -> Vec<(&'static str, &'static str)> {
        match self {
            Choices::Sex => Sex::ALL.iter().map(|v| (v.as_str(), v.label())).collect(),
            Choices::BloodType => BloodType::ALL
                .iter()
                .map(|v| (v.as_str(), v.label()))
                .collect(),
            Choices::ConsultationStatus => ConsultationStatus::ALL
                .iter()
                .map(|v| (v.as_str(), v.label()))
                .collect(),
        }
    }

    pub fn label_of(self, code: &str) -> Option<&'static str> {
        self.options()
            .into_iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Text { max: usize },
    TextArea,
    Email,
    Date,
    DateTime,
    Integer { min: i64, max: i64 },
    Price,
    Checkbox,
    Choice(Choices),
    Reference(EntityKind),
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub input: Input,
    pub required: bool,
    /// Shown as a column on the list page.
    pub listed: bool,
}

const fn field(name: &'static str, label: &'static str, input: Input, required: bool) -> Field {
    Field {
        name,
        label,
        input,
        required,
        listed: true,
    }
}

const fn detail(name: &'static str, label: &'static str, input: Input, required: bool) -> Field {
    Field {
        name,
        label,
        input,
        required,
        listed: false,
    }
}

static PATIENT: &[Field] = &[
    field("rut", "RUT", Input::Text { max: 12 }, true),
    field("name", "Name", Input::Text { max: 120 }, true),
    field("surname", "Surname", Input::Text { max: 120 }, true),
    field("birth_date", "Birth date", Input::Date, true),
    detail("sex", "Sex", Input::Choice(Choices::Sex), true),
    detail("blood_type", "Blood type", Input::Choice(Choices::BloodType), false),
    field("email", "Email", Input::Email, false),
    field("phone", "Phone", Input::Text { max: 30 }, false),
    detail("address", "Address", Input::Text { max: 200 }, false),
    field("active", "Active", Input::Checkbox, false),
];

static PHYSICIAN: &[Field] = &[
    field("name", "Name", Input::Text { max: 120 }, true),
    field("surname", "Surname", Input::Text { max: 120 }, true),
    field("rut", "RUT", Input::Text { max: 12 }, true),
    field("email", "Email", Input::Email, true),
    detail("phone", "Phone", Input::Text { max: 30 }, false),
    field("specialty_id", "Specialty", Input::Reference(EntityKind::Specialty), true),
    field("active", "Active", Input::Checkbox, false),
];

static SPECIALTY: &[Field] = &[
    field("name", "Name", Input::Text { max: 120 }, true),
    field("description", "Description", Input::TextArea, false),
];

static CONSULTATION: &[Field] = &[
    field("patient_id", "Patient", Input::Reference(EntityKind::Patient), true),
    field("physician_id", "Physician", Input::Reference(EntityKind::Physician), true),
    field("consulted_at", "Date and time", Input::DateTime, true),
    field("reason", "Reason", Input::Text { max: 200 }, true),
    detail("diagnosis", "Diagnosis", Input::Text { max: 200 }, false),
    field("status", "Status", Input::Choice(Choices::ConsultationStatus), true),
];

static TREATMENT: &[Field] = &[
    field("consultation_id", "Consultation", Input::Reference(EntityKind::Consultation), true),
    field("description", "Description", Input::TextArea, true),
    field("duration_days", "Duration (days)", Input::Integer { min: 0, max: 36_500 }, false),
    detail("notes", "Notes", Input::TextArea, false),
];

static MEDICATION: &[Field] = &[
    field("name", "Name", Input::Text { max: 120 }, true),
    field("laboratory", "Laboratory", Input::Text { max: 120 }, false),
    field("stock", "Stock", Input::Integer { min: 0, max: i32::MAX as i64 }, false),
    field("unit_price", "Unit price", Input::Price, false),
];

static PRESCRIPTION: &[Field] = &[
    field("treatment_id", "Treatment", Input::Reference(EntityKind::Treatment), true),
    field("medication_id", "Medication", Input::Reference(EntityKind::Medication), true),
    field("dosage", "Dosage", Input::Text { max: 60 }, true),
    field("frequency", "Frequency", Input::Text { max: 60 }, true),
    field("duration", "Duration", Input::Text { max: 60 }, true),
];

static INSURANCE_PLAN: &[Field] = &[
    field("name", "Insurer", Input::Text { max: 120 }, true),
    field("plan", "Plan", Input::Text { max: 120 }, false),
];

static ENROLLMENT: &[Field] = &[
    field("patient_id", "Patient", Input::Reference(EntityKind::Patient), true),
    field("plan_id", "Insurance plan", Input::Reference(EntityKind::InsurancePlan), true),
    field("policy_number", "Policy number", Input::Text { max: 60 }, false),
    field("coverage_percent", "Coverage (%)", Input::Integer { min: 0, max: 100 }, false),
    field("active", "Active", Input::Checkbox, false),
];

pub fn fields(kind: EntityKind) -> &'static [Field] {
    match kind {
        EntityKind::Patient => PATIENT,
        EntityKind::Physician => PHYSICIAN,
        EntityKind::Specialty => SPECIALTY,
        EntityKind::Consultation => CONSULTATION,
        EntityKind::Treatment => TREATMENT,
        EntityKind::Medication => MEDICATION,
        EntityKind::Prescription => PRESCRIPTION,
        EntityKind::InsurancePlan => INSURANCE_PLAN,
        EntityKind::Enrollment => ENROLLMENT,
    }
}

/// A submitted value that could not be read as its field's type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} must be a whole number")]
    NotInteger(&'static str),
    #[error("{0} must be a number")]
    NotNumber(&'static str),
}

/// Convert submitted form fields into the record's JSON object.
///
/// Unchecked checkboxes are absent from the body and become `false`;
/// blank optional values are left out so the record's defaults apply.
pub fn to_json(kind: EntityKind, form: &HashMap<String, String>) -> Result<Value, FormError> {
    let mut object = Map::new();
    for f in fields(kind) {
        if f.input == Input::Checkbox {
            object.insert(f.name.into(), Value::Bool(form.contains_key(f.name)));
            continue;
        }
        let raw = form.get(f.name).map(|s| s.trim()).unwrap_or_default();
        if raw.is_empty() {
            if f.required {
                return Err(FormError::Required(f.label));
            }
            if f.input == Input::Choice(Choices::BloodType) {
                object.insert(f.name.into(), Value::Null);
            } else if matches!(f.input, Input::Text { .. } | Input::TextArea | Input::Email) {
                object.insert(f.name.into(), Value::String(String::new()));
            }
            continue;
        }
        let value = match f.input {
            Input::Integer { .. } | Input::Reference(_) => raw
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| FormError::NotInteger(f.label))?,
            Input::Price => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::from)
                .ok_or(FormError::NotNumber(f.label))?,
            // `datetime-local` omits seconds
            Input::DateTime if raw.len() == 16 => Value::String(format!("{raw}:00")),
            _ => Value::String(raw.to_string()),
        };
        object.insert(f.name.into(), value);
    }
    Ok(Value::Object(object))
}

/// Stored record fields as the strings the form inputs show.
pub fn to_form_values(fields_json: &Value) -> HashMap<String, String> {
    let mut values = HashMap::new();
    if let Some(object) = fields_json.as_object() {
        for (key, value) in object {
            let text = match value {
                Value::Null => String::new(),
                Value::String(s) => s.clone(),
                Value::Bool(b) => if *b { "on".into() } else { String::new() },
                other => other.to_string(),
            };
            values.insert(key.clone(), text);
        }
    }
    values
}

/// `(id, label)` of every record of `kind`, for select boxes and list cells.
pub fn reference_options(
    conn: &Connection,
    kind: EntityKind,
) -> Result<Vec<(i64, String)>, DatabaseError> {
    let sql = format!(
        "SELECT t.id, {} FROM {} t ORDER BY t.id",
        kind.label_sql(),
        kind.table()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![], |row| {
        Ok((row.get(0)?, row.get::<_, Option<String>>(1)?.unwrap_or_default()))
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}
