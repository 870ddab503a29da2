//! Server-rendered HTML pages.
//!
//! Every interpolated value goes through [`escape`].

use std::collections::HashMap;
use std::fmt::Write;

use super::flash::Flash;
use super::forms::{Field, Input};
use crate::config;
use crate::integrity::DeleteCheck;
use crate::models::EntityKind;

pub const BASE: &str = "/clinica";

/// Escape text for element content and double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn list_url(kind: EntityKind) -> String {
    format!("{BASE}/{}/", kind.prefix())
}

fn layout(title: &str, body: &str) -> String {
    let mut nav = String::new();
    for kind in EntityKind::ALL {
        let _ = write!(
            nav,
            r#"<a href="{}">{}</a>"#,
            list_url(kind),
            escape(kind.title())
        );
    }
    format!(
        r##"<!DOCTYPE html>
<html lang="es">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} · {app}</title>
<style>
*,*::before,*::after{{box-sizing:border-box}}
body{{margin:0;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:#f8fafc;color:#0f172a}}
header{{background:#0f766e;color:#fff;padding:12px 24px;display:flex;gap:16px;flex-wrap:wrap;align-items:center}}
header a{{color:#ccfbf1;text-decoration:none;font-size:.9rem}}
header .brand{{color:#fff;font-weight:700;font-size:1.1rem;margin-right:12px}}
main{{max-width:1100px;margin:24px auto;padding:0 24px}}
table{{width:100%;border-collapse:collapse;background:#fff}}
th,td{{padding:8px 10px;border-bottom:1px solid #e2e8f0;text-align:left;font-size:.9rem}}
.btn{{display:inline-block;padding:8px 14px;border-radius:8px;border:none;background:#0f766e;color:#fff;text-decoration:none;cursor:pointer;font-size:.9rem}}
.btn-secondary{{background:#e2e8f0;color:#0f172a}}
.btn-danger{{background:#b91c1c}}
.flash{{padding:12px 16px;border-radius:8px;margin-bottom:16px}}
.flash-success{{background:#dcfce7;color:#166534}}
.flash-error{{background:#fee2e2;color:#991b1b}}
.cards{{display:grid;grid-template-columns:repeat(auto-fill,minmax(200px,1fr));gap:16px}}
.card{{background:#fff;border-radius:12px;padding:20px;box-shadow:0 1px 4px rgba(0,0,0,.06)}}
label{{display:block;margin:12px 0 4px;font-weight:600;font-size:.9rem}}
input,select,textarea{{width:100%;padding:8px;border:1px solid #cbd5e1;border-radius:6px;font:inherit}}
input[type=checkbox]{{width:auto}}
</style>
</head>
<body>
<header><a class="brand" href="{base}/">{app}</a>{nav}</header>
<main>
{body}
</main>
</body>
</html>"##,
        title = escape(title),
        app = config::APP_NAME,
        base = BASE,
        nav = nav,
        body = body,
    )
}

pub fn render_home() -> String {
    let mut cards = String::new();
    for kind in EntityKind::ALL {
        let _ = write!(
            cards,
            r#"<div class="card"><h3>{title}</h3><a class="btn" href="{url}">Open</a> <a class="btn btn-secondary" href="{url}nuevo/">New</a></div>"#,
            title = escape(kind.title()),
            url = list_url(kind),
        );
    }
    layout(
        "Home",
        &format!(r#"<h1>{}</h1><div class="cards">{cards}</div>"#, config::APP_NAME),
    )
}

/// One list-page row: the record id and its already-formatted cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: i64,
    pub cells: Vec<String>,
}

pub fn render_list(kind: EntityKind, columns: &[&Field], rows: &[ListRow], flash: Option<&Flash>) -> String {
    let mut body = String::new();
    if let Some(flash) = flash {
        let _ = write!(
            body,
            r#"<div class="flash {}">{}</div>"#,
            flash.level.css_class(),
            escape(&flash.text)
        );
    }
    let url = list_url(kind);
    let _ = write!(
        body,
        r#"<h1>{}</h1><p><a class="btn" href="{url}nuevo/">New</a></p>"#,
        escape(kind.title())
    );

    if rows.is_empty() {
        body.push_str("<p>No records yet.</p>");
        return layout(kind.title(), &body);
    }

    body.push_str("<table><thead><tr><th>#</th>");
    for column in columns {
        let _ = write!(body, "<th>{}</th>", escape(column.label));
    }
    body.push_str("<th></th></tr></thead><tbody>");
    for row in rows {
        let _ = write!(body, "<tr><td>{}</td>", row.id);
        for cell in &row.cells {
            let _ = write!(body, "<td>{}</td>", escape(cell));
        }
        let _ = write!(
            body,
            r#"<td><a href="{url}{id}/editar/">Edit</a> · <a href="{url}{id}/eliminar/">Delete</a></td></tr>"#,
            id = row.id
        );
    }
    body.push_str("</tbody></table>");
    layout(kind.title(), &body)
}

fn render_input(
    field: &Field,
    value: &str,
    references: &HashMap<&'static str, Vec<(i64, String)>>,
) -> String {
    let name = field.name;
    let required = if field.required { " required" } else { "" };
    let value_attr = escape(value);
    match field.input {
        Input::Text { max } => format!(
            r#"<input type="text" id="{name}" name="{name}" maxlength="{max}" value="{value_attr}"{required}>"#
        ),
        Input::Email => format!(
            r#"<input type="email" id="{name}" name="{name}" value="{value_attr}"{required}>"#
        ),
        Input::TextArea => format!(
            r#"<textarea id="{name}" name="{name}" rows="4"{required}>{value_attr}</textarea>"#
        ),
        Input::Date => format!(
            r#"<input type="date" id="{name}" name="{name}" value="{value_attr}"{required}>"#
        ),
        Input::DateTime => format!(
            r#"<input type="datetime-local" id="{name}" name="{name}" value="{value_attr}"{required}>"#
        ),
        Input::Integer { min, max } => format!(
            r#"<input type="number" id="{name}" name="{name}" min="{min}" max="{max}" step="1" value="{value_attr}"{required}>"#
        ),
        Input::Price => format!(
            r#"<input type="number" id="{name}" name="{name}" min="0" step="0.01" value="{value_attr}"{required}>"#
        ),
        Input::Checkbox => {
            let checked = if value.is_empty() { "" } else { " checked" };
            format!(r#"<input type="checkbox" id="{name}" name="{name}"{checked}>"#)
        }
        Input::Choice(choices) => {
            let options = choices
                .options()
                .into_iter()
                .map(|(code, label)| (code.to_string(), label.to_string()));
            render_select(field, value, options)
        }
        Input::Reference(_) => {
            let options = references
                .get(name)
                .into_iter()
                .flatten()
                .map(|(id, label)| (id.to_string(), label.clone()));
            render_select(field, value, options)
        }
    }
}

fn render_select(field: &Field, value: &str, options: impl Iterator<Item = (String, String)>) -> String {
    let mut html = format!(
        r#"<select id="{name}" name="{name}"{required}>"#,
        name = field.name,
        required = if field.required { " required" } else { "" }
    );
    html.push_str(r#"<option value="">---------</option>"#);
    for (code, label) in options {
        let selected = if code == value { " selected" } else { "" };
        let _ = write!(
            html,
            r#"<option value="{}"{selected}>{}</option>"#,
            escape(&code),
            escape(&label)
        );
    }
    html.push_str("</select>");
    html
}

/// Create form when `id` is `None`, edit form otherwise.
pub fn render_form(
    kind: EntityKind,
    id: Option<i64>,
    fields: &[Field],
    values: &HashMap<String, String>,
    references: &HashMap<&'static str, Vec<(i64, String)>>,
    error: Option<&str>,
) -> String {
    let url = list_url(kind);
    let (heading, action) = match id {
        Some(id) => (format!("Edit {}", kind.title()), format!("{url}{id}/editar/")),
        None => (format!("New {}", kind.title()), format!("{url}nuevo/")),
    };
    let mut body = format!("<h1>{}</h1>", escape(&heading));
    if let Some(error) = error {
        let _ = write!(body, r#"<div class="flash flash-error">{}</div>"#, escape(error));
    }
    let _ = write!(body, r#"<form method="post" action="{action}">"#);
    for field in fields {
        let value = values.get(field.name).map(String::as_str).unwrap_or_default();
        let _ = write!(
            body,
            r#"<label for="{}">{}</label>{}"#,
            field.name,
            escape(field.label),
            render_input(field, value, references)
        );
    }
    let _ = write!(
        body,
        r#"<p><button class="btn" type="submit">Save</button> <a class="btn btn-secondary" href="{url}">Cancel</a></p></form>"#
    );
    layout(&heading, &body)
}

pub fn render_confirm_delete(check: &DeleteCheck) -> String {
    let url = list_url(check.entity);
    let mut body = format!(
        "<h1>Delete {}</h1><p>Record: <strong>{}</strong></p>",
        escape(check.entity.title()),
        escape(&check.label)
    );
    match check.reason() {
        Some(reason) => {
            let _ = write!(
                body,
                r#"<div class="flash flash-error">This record cannot be deleted. {}</div><p><a class="btn btn-secondary" href="{url}">Back</a></p>"#,
                escape(&reason)
            );
        }
        None => {
            for cascade in &check.cascades {
                let _ = write!(
                    body,
                    r#"<div class="flash flash-error">{} related {} record(s) will also be deleted.</div>"#,
                    cascade.count,
                    escape(cascade.entity.title())
                );
            }
            let _ = write!(
                body,
                r#"<p>Are you sure you want to delete this record?</p><form method="post" action="{url}{id}/eliminar/"><button class="btn btn-danger" type="submit">Confirm delete</button> <a class="btn btn-secondary" href="{url}">Cancel</a></form>"#,
                id = check.id
            );
        }
    }
    layout(&format!("Delete {}", check.entity.title()), &body)
}

pub fn render_not_found() -> String {
    layout(
        "Not found",
        &format!(
            r#"<h1>Page not found</h1><p>The page you requested does not exist.</p><p><a class="btn" href="{BASE}/">Home</a></p>"#
        ),
    )
}
