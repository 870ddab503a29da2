//! Repository layer: entity-scoped database operations.
//!
//! Each record type implements [`Table`] in its own sub-module; the CRUD
//! operations below are written once against that trait. Deletion is not
//! here: it goes through [`crate::integrity::DeletionPolicy`].

mod consultation;
mod insurance;
mod medication;
mod patient;
mod physician;
mod prescription;
mod specialty;
mod treatment;

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{classify_write_error, DatabaseError};
use crate::models::{Entity, Record};

/// SQL mapping for one record type.
///
/// `COLUMNS` lists the stored columns in field order, excluding `id`;
/// `from_row` reads them starting at index 1 (index 0 is always `id`).
pub trait Table: Entity {
    const COLUMNS: &'static [&'static str];
    const ORDER_BY: &'static str;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
    fn to_values(&self) -> Vec<Value>;
}

fn select_sql<T: Table>() -> String {
    format!(
        "SELECT id, {} FROM {}",
        T::COLUMNS.join(", "),
        T::KIND.table()
    )
}

fn record_from_row<T: Table>(row: &Row<'_>) -> rusqlite::Result<Record<T>> {
    Ok(Record {
        id: row.get(0)?,
        fields: T::from_row(row)?,
    })
}

/// Validate and insert; returns the stored record with its new id.
pub fn insert<T: Table>(conn: &Connection, fields: &T) -> Result<Record<T>, DatabaseError> {
    fields.validate()?;
    let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        T::KIND.table(),
        T::COLUMNS.join(", "),
        placeholders.join(", ")
    );
    conn.execute(&sql, params_from_iter(fields.to_values()))
        .map_err(classify_write_error)?;
    let id = conn.last_insert_rowid();
    tracing::debug!(entity = %T::KIND, id, "Record created");
    Ok(Record {
        id,
        fields: fields.clone(),
    })
}

pub fn get<T: Table>(conn: &Connection, id: i64) -> Result<Option<Record<T>>, DatabaseError> {
    let sql = format!("{} WHERE id = ?1", select_sql::<T>());
    let record = conn
        .query_row(&sql, params![id], record_from_row::<T>)
        .optional()?;
    Ok(record)
}

/// Like [`get`], but a missing row is `DatabaseError::NotFound`.
pub fn require<T: Table>(conn: &Connection, id: i64) -> Result<Record<T>, DatabaseError> {
    get::<T>(conn, id)?.ok_or_else(|| DatabaseError::not_found(T::KIND.name(), id))
}

/// All records in the type's listing order.
pub fn list<T: Table>(conn: &Connection) -> Result<Vec<Record<T>>, DatabaseError> {
    let sql = format!("{} ORDER BY {}", select_sql::<T>(), T::ORDER_BY);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], record_from_row::<T>)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Full replacement of every field.
pub fn update<T: Table>(conn: &Connection, id: i64, fields: &T) -> Result<Record<T>, DatabaseError> {
    fields.validate()?;
    let assignments: Vec<String> = T::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{col} = ?{}", i + 1))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?{}",
        T::KIND.table(),
        assignments.join(", "),
        T::COLUMNS.len() + 1
    );
    let mut values = fields.to_values();
    values.push(Value::Integer(id));
    let changed = conn
        .execute(&sql, params_from_iter(values))
        .map_err(classify_write_error)?;
    if changed == 0 {
        return Err(DatabaseError::not_found(T::KIND.name(), id));
    }
    tracing::debug!(entity = %T::KIND, id, "Record updated");
    Ok(Record {
        id,
        fields: fields.clone(),
    })
}

/// Partial replacement: `patch` keys overwrite the current fields, absent
/// keys keep their stored value. `id` in the patch is ignored.
pub fn patch<T: Table>(
    conn: &Connection,
    id: i64,
    patch: &serde_json::Value,
) -> Result<Record<T>, DatabaseError> {
    let current = require::<T>(conn, id)?;
    let merged = merge_fields(&current.fields, patch)?;
    update(conn, id, &merged)
}

pub(crate) fn merge_fields<T: Entity>(
    current: &T,
    patch: &serde_json::Value,
) -> Result<T, DatabaseError> {
    let changes = patch.as_object().ok_or_else(|| {
        DatabaseError::Serialization(serde::de::Error::custom("patch body must be a JSON object"))
    })?;
    let mut merged = serde_json::to_value(current)?;
    if let Some(target) = merged.as_object_mut() {
        for (key, value) in changes {
            if key != "id" {
                target.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(serde_json::from_value(merged)?)
}

pub fn count<T: Table>(conn: &Connection) -> Result<i64, DatabaseError> {
    let sql = format!("SELECT COUNT(*) FROM {}", T::KIND.table());
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::*;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn cardiology() -> Specialty {
        Specialty {
            name: "Cardiology".into(),
            description: "Heart and vessels".into(),
        }
    }

    fn physician(specialty_id: i64, rut: &str) -> Physician {
        Physician {
            name: "Alicia".into(),
            surname: "Bravo".into(),
            rut: rut.into(),
            email: "abravo@clinic.cl".into(),
            phone: String::new(),
            active: true,
            specialty_id,
        }
    }

    fn patient(rut: &str) -> Patient {
        Patient {
            rut: rut.into(),
            name: "Pedro".into(),
            surname: "Soto".into(),
            birth_date: NaiveDate::from_ymd_opt(1985, 3, 2).unwrap(),
            sex: Sex::Male,
            blood_type: Some(BloodType::OPositive),
            email: String::new(),
            phone: "+56 9 1234 5678".into(),
            address: "Av. Siempre Viva 742".into(),
            active: true,
        }
    }

    #[test]
    fn specialty_insert_and_retrieve() {
        let conn = test_db();
        let created = insert(&conn, &cardiology()).unwrap();
        let fetched = require::<Specialty>(&conn, created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.fields.name, "Cardiology");
    }

    #[test]
    fn get_missing_returns_none() {
        let conn = test_db();
        assert!(get::<Patient>(&conn, 42).unwrap().is_none());
        assert!(matches!(
            require::<Patient>(&conn, 42),
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[test]
    fn patient_round_trips_enums_and_dates() {
        let conn = test_db();
        let created = insert(&conn, &patient("12345678-9")).unwrap();
        let fetched = require::<Patient>(&conn, created.id).unwrap();
        assert_eq!(fetched.fields.sex, Sex::Male);
        assert_eq!(fetched.fields.blood_type, Some(BloodType::OPositive));
        assert_eq!(
            fetched.fields.birth_date,
            NaiveDate::from_ymd_opt(1985, 3, 2).unwrap()
        );
    }

    #[test]
    fn duplicate_rut_is_constraint_violation() {
        let conn = test_db();
        insert(&conn, &patient("12345678-9")).unwrap();
        let err = insert(&conn, &patient("12345678-9")).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn missing_parent_is_invalid_reference() {
        let conn = test_db();
        let err = insert(&conn, &physician(999, "1-9")).unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidReference(_)));
    }

    #[test]
    fn invalid_fields_never_reach_the_store() {
        let conn = test_db();
        let err = insert(&conn, &Specialty { name: " ".into(), description: String::new() })
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
        assert_eq!(count::<Specialty>(&conn).unwrap(), 0);
    }

    #[test]
    fn update_replaces_all_fields() {
        let conn = test_db();
        let created = insert(&conn, &cardiology()).unwrap();
        let updated = update(
            &conn,
            created.id,
            &Specialty { name: "Cardiología".into(), description: String::new() },
        )
        .unwrap();
        let fetched = require::<Specialty>(&conn, created.id).unwrap();
        assert_eq!(fetched, updated);
        assert_eq!(fetched.fields.description, "");
    }

    #[test]
    fn update_missing_is_not_found() {
        let conn = test_db();
        let err = update(&conn, 7, &cardiology()).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn patch_keeps_untouched_fields() {
        let conn = test_db();
        let cardio = insert(&conn, &cardiology()).unwrap();
        let doc = insert(&conn, &physician(cardio.id, "9-9")).unwrap();
        let patched = patch::<Physician>(
            &conn,
            doc.id,
            &serde_json::json!({ "active": false, "id": 555 }),
        )
        .unwrap();
        assert_eq!(patched.id, doc.id);
        assert!(!patched.fields.active);
        assert_eq!(patched.fields.rut, "9-9");
        assert_eq!(patched.fields.specialty_id, cardio.id);
    }

    #[test]
    fn patch_with_wrong_type_is_rejected() {
        let conn = test_db();
        let cardio = insert(&conn, &cardiology()).unwrap();
        let err = patch::<Specialty>(&conn, cardio.id, &serde_json::json!({ "name": 5 }))
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Serialization(_)));
        let err = patch::<Specialty>(&conn, cardio.id, &serde_json::json!(["name"])).unwrap_err();
        assert!(matches!(err, DatabaseError::Serialization(_)));
    }

    #[test]
    fn consultations_list_newest_first() {
        let conn = test_db();
        let cardio = insert(&conn, &cardiology()).unwrap();
        let doc = insert(&conn, &physician(cardio.id, "9-9")).unwrap();
        let pat = insert(&conn, &patient("1-1")).unwrap();
        for (day, reason) in [(1, "first"), (3, "third"), (2, "second")] {
            insert(
                &conn,
                &Consultation {
                    patient_id: pat.id,
                    physician_id: doc.id,
                    consulted_at: NaiveDateTime::parse_from_str(
                        &format!("2024-05-0{day} 09:30:00"),
                        "%Y-%m-%d %H:%M:%S",
                    )
                    .unwrap(),
                    reason: reason.into(),
                    diagnosis: String::new(),
                    status: ConsultationStatus::Pending,
                },
            )
            .unwrap();
        }
        let reasons: Vec<_> = list::<Consultation>(&conn)
            .unwrap()
            .into_iter()
            .map(|c| c.fields.reason)
            .collect();
        assert_eq!(reasons, ["third", "second", "first"]);
    }

    #[test]
    fn medications_list_by_name() {
        let conn = test_db();
        for name in ["Paracetamol", "Amoxicilina", "Losartán"] {
            insert(
                &conn,
                &Medication {
                    name: name.into(),
                    laboratory: "Chile".into(),
                    stock: 10,
                    unit_price: 1990.0,
                },
            )
            .unwrap();
        }
        let names: Vec<_> = list::<Medication>(&conn)
            .unwrap()
            .into_iter()
            .map(|m| m.fields.name)
            .collect();
        assert_eq!(names, ["Amoxicilina", "Losartán", "Paracetamol"]);
    }

    #[test]
    fn insurance_plan_pair_is_unique() {
        let conn = test_db();
        let fonasa_b = InsurancePlan { name: "Fonasa".into(), plan: "B".into() };
        insert(&conn, &fonasa_b).unwrap();
        insert(&conn, &InsurancePlan { name: "Fonasa".into(), plan: "C".into() }).unwrap();
        let err = insert(&conn, &fonasa_b).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn enrollment_is_unique_per_patient_and_plan() {
        let conn = test_db();
        let pat = insert(&conn, &patient("1-1")).unwrap();
        let plan = insert(&conn, &InsurancePlan { name: "Isapre Colmena".into(), plan: "Oro".into() })
            .unwrap();
        let enrollment = Enrollment {
            patient_id: pat.id,
            plan_id: plan.id,
            policy_number: "POL-1".into(),
            coverage_percent: 70,
            active: true,
        };
        insert(&conn, &enrollment).unwrap();
        let err = insert(&conn, &enrollment).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn merge_fields_applies_only_given_keys() {
        let merged = merge_fields(
            &cardiology(),
            &serde_json::json!({ "description": "Cardiovascular care" }),
        )
        .unwrap();
        assert_eq!(merged.name, "Cardiology");
        assert_eq!(merged.description, "Cardiovascular care");
    }
}
