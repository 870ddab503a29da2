use rusqlite::types::Value;
use rusqlite::Row;

use super::Table;
use crate::models::{Enrollment, InsurancePlan};

impl Table for InsurancePlan {
    const COLUMNS: &'static [&'static str] = &["name", "plan"];
    const ORDER_BY: &'static str = "name ASC, plan ASC";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(InsurancePlan {
            name: row.get(1)?,
            plan: row.get(2)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![Value::Text(self.name.clone()), Value::Text(self.plan.clone())]
    }
}

impl Table for Enrollment {
    const COLUMNS: &'static [&'static str] = &[
        "patient_id",
        "plan_id",
        "policy_number",
        "coverage_percent",
        "active",
    ];
    const ORDER_BY: &'static str = "id DESC";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Enrollment {
            patient_id: row.get(1)?,
            plan_id: row.get(2)?,
            policy_number: row.get(3)?,
            coverage_percent: row.get(4)?,
            active: row.get(5)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.patient_id),
            Value::Integer(self.plan_id),
            Value::Text(self.policy_number.clone()),
            Value::Integer(i64::from(self.coverage_percent)),
            Value::Integer(i64::from(self.active)),
        ]
    }
}
