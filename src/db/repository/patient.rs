use rusqlite::types::Value;
use rusqlite::Row;

use super::Table;
use crate::models::Patient;

impl Table for Patient {
    const COLUMNS: &'static [&'static str] = &[
        "rut",
        "name",
        "surname",
        "birth_date",
        "sex",
        "blood_type",
        "email",
        "phone",
        "address",
        "active",
    ];
    const ORDER_BY: &'static str = "id ASC";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Patient {
            rut: row.get(1)?,
            name: row.get(2)?,
            surname: row.get(3)?,
            birth_date: row.get(4)?,
            sex: row.get(5)?,
            blood_type: row.get(6)?,
            email: row.get(7)?,
            phone: row.get(8)?,
            address: row.get(9)?,
            active: row.get(10)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.rut.clone()),
            Value::Text(self.name.clone()),
            Value::Text(self.surname.clone()),
            Value::Text(self.birth_date.format("%Y-%m-%d").to_string()),
            Value::Text(self.sex.as_str().into()),
            self.blood_type
                .map(|b| Value::Text(b.as_str().into()))
                .unwrap_or(Value::Null),
            Value::Text(self.email.clone()),
            Value::Text(self.phone.clone()),
            Value::Text(self.address.clone()),
            Value::Integer(i64::from(self.active)),
        ]
    }
}
