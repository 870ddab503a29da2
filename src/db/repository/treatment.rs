use rusqlite::types::Value;
use rusqlite::Row;

use super::Table;
use crate::models::Treatment;

impl Table for Treatment {
    const COLUMNS: &'static [&'static str] =
        &["consultation_id", "description", "duration_days", "notes"];
    const ORDER_BY: &'static str = "id DESC";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Treatment {
            consultation_id: row.get(1)?,
            description: row.get(2)?,
            duration_days: row.get(3)?,
            notes: row.get(4)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.consultation_id),
            Value::Text(self.description.clone()),
            Value::Integer(i64::from(self.duration_days)),
            Value::Text(self.notes.clone()),
        ]
    }
}
