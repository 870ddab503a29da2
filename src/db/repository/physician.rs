use rusqlite::types::Value;
use rusqlite::Row;

use super::Table;
use crate::models::Physician;

impl Table for Physician {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "surname",
        "rut",
        "email",
        "phone",
        "active",
        "specialty_id",
    ];
    const ORDER_BY: &'static str = "id ASC";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Physician {
            name: row.get(1)?,
            surname: row.get(2)?,
            rut: row.get(3)?,
            email: row.get(4)?,
            phone: row.get(5)?,
            active: row.get(6)?,
            specialty_id: row.get(7)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.surname.clone()),
            Value::Text(self.rut.clone()),
            Value::Text(self.email.clone()),
            Value::Text(self.phone.clone()),
            Value::Integer(i64::from(self.active)),
            Value::Integer(self.specialty_id),
        ]
    }
}
