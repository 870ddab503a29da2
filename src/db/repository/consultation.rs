use rusqlite::types::Value;
use rusqlite::Row;

use super::Table;
use crate::models::Consultation;

impl Table for Consultation {
    const COLUMNS: &'static [&'static str] = &[
        "patient_id",
        "physician_id",
        "consulted_at",
        "reason",
        "diagnosis",
        "status",
    ];
    const ORDER_BY: &'static str = "consulted_at DESC, id DESC";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Consultation {
            patient_id: row.get(1)?,
            physician_id: row.get(2)?,
            consulted_at: row.get(3)?,
            reason: row.get(4)?,
            diagnosis: row.get(5)?,
            status: row.get(6)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.patient_id),
            Value::Integer(self.physician_id),
            // Fixed-width text keeps ORDER BY chronological.
            Value::Text(self.consulted_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            Value::Text(self.reason.clone()),
            Value::Text(self.diagnosis.clone()),
            Value::Text(self.status.as_str().into()),
        ]
    }
}
