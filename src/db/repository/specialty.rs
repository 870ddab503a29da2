use rusqlite::types::Value;
use rusqlite::Row;

use super::Table;
use crate::models::Specialty;

impl Table for Specialty {
    const COLUMNS: &'static [&'static str] = &["name", "description"];
    const ORDER_BY: &'static str = "id ASC";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Specialty {
            name: row.get(1)?,
            description: row.get(2)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.description.clone()),
        ]
    }
}
