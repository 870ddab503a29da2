//! HTML page handlers, one generic set mounted once per record type.

use std::collections::HashMap;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value;

use super::flash::Flash;
use super::forms::{self, Field, Input};
use super::pages::{self, ListRow};
use super::WebContext;
use crate::core_state::CoreError;
use crate::db::repository::{self, Table};
use crate::db::DatabaseError;
use crate::models::Record;

/// Failures that end the request with an error page.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Page not found")]
    NotFound,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound => {
                (StatusCode::NOT_FOUND, Html(pages::render_not_found())).into_response()
            }
            PageError::Internal(detail) => {
                tracing::error!(detail, "Page internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>Internal error</h1>".to_string()),
                )
                    .into_response()
            }
        }
    }
}

impl From<DatabaseError> for PageError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { .. } => PageError::NotFound,
            other => PageError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for PageError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Database(e) => e.into(),
            CoreError::LockPoisoned => PageError::Internal("lock poisoned".into()),
        }
    }
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        PageError::Internal(err.to_string())
    }
}

impl From<PathRejection> for PageError {
    fn from(_: PathRejection) -> Self {
        PageError::NotFound
    }
}

type IdPath = Result<Path<i64>, PathRejection>;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub flash: Option<String>,
}

pub async fn home() -> Html<String> {
    Html(pages::render_home())
}

pub async fn not_found() -> PageError {
    PageError::NotFound
}

pub async fn list<T: Table>(
    State(ctx): State<WebContext>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, PageError> {
    let flash = match query.flash {
        Some(token) => ctx.take_flash(&token)?,
        None => None,
    };

    let conn = ctx.core.open_db()?;
    let records = repository::list::<T>(&conn)?;
    let columns: Vec<&Field> = forms::fields(T::KIND).iter().filter(|f| f.listed).collect();
    let lookups = reference_lookups(&conn, columns.iter().copied())?;

    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        let json = serde_json::to_value(&record.fields)?;
        let cells = columns
            .iter()
            .map(|f| display_cell(f, &json[f.name], &lookups))
            .collect();
        rows.push(ListRow {
            id: record.id,
            cells,
        });
    }

    Ok(Html(pages::render_list(
        T::KIND,
        &columns,
        &rows,
        flash.as_ref(),
    )))
}

pub async fn new_form<T: Table>(State(ctx): State<WebContext>) -> Result<Html<String>, PageError> {
    let conn = ctx.core.open_db()?;
    let values: HashMap<String, String> = forms::fields(T::KIND)
        .iter()
        .filter(|f| f.input == Input::Checkbox)
        .map(|f| (f.name.to_string(), "on".to_string()))
        .collect();
    render_form::<T>(&conn, None, &values, None).map(Html)
}

pub async fn create<T: Table>(
    State(ctx): State<WebContext>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, PageError> {
    let conn = ctx.core.open_db()?;
    match submit::<T>(&conn, None, &form) {
        Ok(record) => {
            let label = record_label::<T>(&conn, record.id)?;
            redirect_with_flash::<T>(&ctx, Flash::success(format!("«{label}» created.")))
        }
        Err(SubmitError::Invalid(message)) => invalid_form::<T>(&conn, None, &form, &message),
        Err(SubmitError::Fatal(err)) => Err(err),
    }
}

pub async fn edit_form<T: Table>(
    State(ctx): State<WebContext>,
    id: IdPath,
) -> Result<Html<String>, PageError> {
    let Path(id) = id?;
    let conn = ctx.core.open_db()?;
    let record = repository::require::<T>(&conn, id)?;
    let values = forms::to_form_values(&serde_json::to_value(&record.fields)?);
    render_form::<T>(&conn, Some(id), &values, None).map(Html)
}

pub async fn update<T: Table>(
    State(ctx): State<WebContext>,
    id: IdPath,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, PageError> {
    let Path(id) = id?;
    let conn = ctx.core.open_db()?;
    match submit::<T>(&conn, Some(id), &form) {
        Ok(_) => {
            let label = record_label::<T>(&conn, id)?;
            redirect_with_flash::<T>(&ctx, Flash::success(format!("«{label}» updated.")))
        }
        Err(SubmitError::Invalid(message)) => invalid_form::<T>(&conn, Some(id), &form, &message),
        Err(SubmitError::Fatal(err)) => Err(err),
    }
}

pub async fn confirm_delete<T: Table>(
    State(ctx): State<WebContext>,
    id: IdPath,
) -> Result<Html<String>, PageError> {
    let Path(id) = id?;
    let conn = ctx.core.open_db()?;
    let check = ctx.core.deletion_policy().check(&conn, T::KIND, id)?;
    Ok(Html(pages::render_confirm_delete(&check)))
}

pub async fn delete<T: Table>(
    State(ctx): State<WebContext>,
    id: IdPath,
) -> Result<Response, PageError> {
    let Path(id) = id?;
    let mut conn = ctx.core.open_db()?;
    let flash = match ctx.core.deletion_policy().delete(&mut conn, T::KIND, id) {
        Ok(outcome) => {
            let mut text = format!("«{}» deleted.", outcome.label);
            for impact in &outcome.cascaded {
                text.push_str(&format!(
                    " {} related {} record(s) also deleted.",
                    impact.count,
                    impact.entity.title()
                ));
            }
            Flash::success(text)
        }
        Err(DatabaseError::ReferentialIntegrityViolation(violation)) => {
            Flash::error(violation.message())
        }
        Err(err) => return Err(err.into()),
    };
    redirect_with_flash::<T>(&ctx, flash)
}

// ── helpers ─────────────────────────────────────────────

/// A submission the user can fix, or a failure that ends the request.
enum SubmitError {
    Invalid(String),
    Fatal(PageError),
}

impl From<DatabaseError> for SubmitError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Validation(e) => SubmitError::Invalid(e.to_string()),
            DatabaseError::InvalidEnum { .. } | DatabaseError::Serialization(_) => {
                SubmitError::Invalid(err.to_string())
            }
            DatabaseError::ConstraintViolation(detail) if detail.contains("UNIQUE") => {
                SubmitError::Invalid(format!("A record with these values already exists ({detail})."))
            }
            DatabaseError::ConstraintViolation(detail) => SubmitError::Invalid(detail),
            DatabaseError::InvalidReference(_) => {
                SubmitError::Invalid("The selected related record does not exist.".into())
            }
            other => SubmitError::Fatal(other.into()),
        }
    }
}

fn submit<T: Table>(
    conn: &Connection,
    id: Option<i64>,
    form: &HashMap<String, String>,
) -> Result<Record<T>, SubmitError> {
    let json = forms::to_json(T::KIND, form).map_err(|e| SubmitError::Invalid(e.to_string()))?;
    let fields: T = serde_json::from_value(json).map_err(DatabaseError::from)?;
    let record = match id {
        Some(id) => repository::update(conn, id, &fields)?,
        None => repository::insert(conn, &fields)?,
    };
    Ok(record)
}

fn invalid_form<T: Table>(
    conn: &Connection,
    id: Option<i64>,
    form: &HashMap<String, String>,
    message: &str,
) -> Result<Response, PageError> {
    let html = render_form::<T>(conn, id, form, Some(message))?;
    Ok((StatusCode::BAD_REQUEST, Html(html)).into_response())
}

fn render_form<T: Table>(
    conn: &Connection,
    id: Option<i64>,
    values: &HashMap<String, String>,
    error: Option<&str>,
) -> Result<String, PageError> {
    let fields = forms::fields(T::KIND);
    let mut references = HashMap::new();
    for field in fields {
        if let Input::Reference(kind) = field.input {
            references.insert(field.name, forms::reference_options(conn, kind)?);
        }
    }
    Ok(pages::render_form(T::KIND, id, fields, values, &references, error))
}

fn record_label<T: Table>(conn: &Connection, id: i64) -> Result<String, PageError> {
    let label = crate::integrity::evaluator::display_label(conn, T::KIND, id)?;
    label.ok_or(PageError::NotFound)
}

fn redirect_with_flash<T: Table>(ctx: &WebContext, flash: Flash) -> Result<Response, PageError> {
    let token = ctx.issue_flash(flash)?;
    let url = format!("{}?flash={token}", pages::list_url(T::KIND));
    Ok(Redirect::to(&url).into_response())
}

type Lookups = HashMap<&'static str, HashMap<i64, String>>;

fn reference_lookups<'a>(
    conn: &Connection,
    columns: impl Iterator<Item = &'a Field>,
) -> Result<Lookups, PageError> {
    let mut lookups = HashMap::new();
    for field in columns {
        if let Input::Reference(kind) = field.input {
            let options = forms::reference_options(conn, kind)?;
            lookups.insert(field.name, options.into_iter().collect());
        }
    }
    Ok(lookups)
}

fn display_cell(field: &Field, value: &Value, lookups: &Lookups) -> String {
    match (field.input, value) {
        (_, Value::Null) => String::new(),
        (Input::Checkbox, Value::Bool(b)) => (if *b { "Yes" } else { "No" }).to_string(),
        (Input::Reference(_), Value::Number(n)) => n
            .as_i64()
            .and_then(|id| lookups.get(field.name).and_then(|m| m.get(&id)).cloned())
            .unwrap_or_else(|| n.to_string()),
        (Input::Choice(choices), Value::String(code)) => {
            choices.label_of(code).unwrap_or(code).to_string()
        }
        (Input::DateTime, Value::String(s)) => s.replacen('T', " ", 1),
        (_, Value::String(s)) => s.clone(),
        (_, other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityKind;

    #[test]
    fn cells_resolve_references_and_choices() {
        let mut lookups: Lookups = HashMap::new();
        lookups.insert("specialty_id", HashMap::from([(3, "Cardiology".to_string())]));
        let physician = forms::fields(EntityKind::Physician);
        let specialty = physician.iter().find(|f| f.name == "specialty_id").unwrap();
        let active = physician.iter().find(|f| f.name == "active").unwrap();
        assert_eq!(display_cell(specialty, &serde_json::json!(3), &lookups), "Cardiology");
        assert_eq!(display_cell(specialty, &serde_json::json!(4), &lookups), "4");
        assert_eq!(display_cell(active, &serde_json::json!(false), &lookups), "No");

        let consultation = forms::fields(EntityKind::Consultation);
        let status = consultation.iter().find(|f| f.name == "status").unwrap();
        let at = consultation.iter().find(|f| f.name == "consulted_at").unwrap();
        assert_eq!(display_cell(status, &serde_json::json!("CANC"), &lookups), "Cancelled");
        assert_eq!(
            display_cell(at, &serde_json::json!("2024-06-01T10:30:00"), &lookups),
            "2024-06-01 10:30:00"
        );
    }
}
