use rusqlite::types::Value;
use rusqlite::Row;

use super::Table;
use crate::models::Prescription;

impl Table for Prescription {
    const COLUMNS: &'static [&'static str] = &[
        "treatment_id",
        "medication_id",
        "dosage",
        "frequency",
        "duration",
    ];
    const ORDER_BY: &'static str = "id DESC";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Prescription {
            treatment_id: row.get(1)?,
            medication_id: row.get(2)?,
            dosage: row.get(3)?,
            frequency: row.get(4)?,
            duration: row.get(5)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.treatment_id),
            Value::Integer(self.medication_id),
            Value::Text(self.dosage.clone()),
            Value::Text(self.frequency.clone()),
            Value::Text(self.duration.clone()),
        ]
    }
}
