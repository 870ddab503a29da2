use rusqlite::types::Value;
use rusqlite::Row;

use super::Table;
use crate::models::Medication;

impl Table for Medication {
    const COLUMNS: &'static [&'static str] = &["name", "laboratory", "stock", "unit_price"];
    const ORDER_BY: &'static str = "name ASC, id ASC";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Medication {
            name: row.get(1)?,
            laboratory: row.get(2)?,
            stock: row.get(3)?,
            unit_price: row.get(4)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.laboratory.clone()),
            Value::Integer(i64::from(self.stock)),
            Value::Real(self.unit_price),
        ]
    }
}
