//! End-to-end deletion scenarios against a file database.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};

use salud_vital::db::repository::{get, insert, list};
use salud_vital::db::{open_database, DatabaseError};
use salud_vital::integrity::{DeletionPolicy, RELATIONS};
use salud_vital::models::*;

fn open() -> (Connection, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let conn = open_database(&tmp.path().join("clinic.db")).unwrap();
    (conn, tmp)
}

fn specialty(conn: &Connection, name: &str) -> i64 {
    insert(
        conn,
        &Specialty {
            name: name.into(),
            description: String::new(),
        },
    )
    .unwrap()
    .id
}

fn patient(conn: &Connection, rut: &str) -> i64 {
    insert(
        conn,
        &Patient {
            rut: rut.into(),
            name: "Pedro".into(),
            surname: "Pérez".into(),
            birth_date: NaiveDate::from_ymd_opt(1960, 3, 14).unwrap(),
            sex: Sex::Male,
            blood_type: None,
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            active: true,
        },
    )
    .unwrap()
    .id
}

#[test]
fn cardiology_scenario() {
    let (mut conn, _tmp) = open();
    let policy = DeletionPolicy::default();

    let cardiology = specialty(&conn, "Cardiology");
    let physician = insert(
        &conn,
        &Physician {
            name: "A".into(),
            surname: "B".into(),
            rut: "15-4".into(),
            email: "a.b@clinic.cl".into(),
            phone: String::new(),
            active: true,
            specialty_id: cardiology,
        },
    )
    .unwrap()
    .id;

    let err = policy
        .delete(&mut conn, EntityKind::Specialty, cardiology)
        .unwrap_err();
    match err {
        DatabaseError::ReferentialIntegrityViolation(violation) => {
            assert_eq!(violation.label, "Cardiology");
            assert!(violation.reason().contains("physicians"));
        }
        other => panic!("expected violation, got {other:?}"),
    }
    assert!(get::<Specialty>(&conn, cardiology).unwrap().is_some());

    policy
        .delete(&mut conn, EntityKind::Physician, physician)
        .unwrap();
    policy
        .delete(&mut conn, EntityKind::Specialty, cardiology)
        .unwrap();
    assert!(list::<Specialty>(&conn).unwrap().is_empty());
}

#[test]
fn patient_with_enrollment_scenario() {
    let (mut conn, _tmp) = open();
    let policy = DeletionPolicy::default();

    let p = patient(&conn, "10-8");
    let plan = insert(
        &conn,
        &InsurancePlan {
            name: "Fonasa".into(),
            plan: "B".into(),
        },
    )
    .unwrap()
    .id;
    insert(
        &conn,
        &Enrollment {
            patient_id: p,
            plan_id: plan,
            policy_number: String::new(),
            coverage_percent: 80,
            active: true,
        },
    )
    .unwrap();

    let check = policy.check(&conn, EntityKind::Patient, p).unwrap();
    assert!(check.is_safe());
    assert_eq!(check.cascades.len(), 1);

    let outcome = policy.delete(&mut conn, EntityKind::Patient, p).unwrap();
    assert_eq!(outcome.cascaded[0].count, 1);

    let remaining: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM patient_insurance WHERE patient_id = ?1",
            params![p],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(remaining, 0);
    // The plan itself is untouched.
    assert!(get::<InsurancePlan>(&conn, plan).unwrap().is_some());
}

#[test]
fn repeated_delete_is_not_found_never_violation() {
    let (mut conn, _tmp) = open();
    let policy = DeletionPolicy::default();
    let p = patient(&conn, "11-6");

    policy.delete(&mut conn, EntityKind::Patient, p).unwrap();
    for _ in 0..2 {
        let err = policy.delete(&mut conn, EntityKind::Patient, p).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }), "{err:?}");
    }
}

#[test]
fn consultation_blocks_both_parents() {
    let (mut conn, _tmp) = open();
    let policy = DeletionPolicy::default();

    let general = specialty(&conn, "General");
    let physician = insert(
        &conn,
        &Physician {
            name: "Rosa".into(),
            surname: "Díaz".into(),
            rut: "20-1".into(),
            email: "rosa@clinic.cl".into(),
            phone: String::new(),
            active: true,
            specialty_id: general,
        },
    )
    .unwrap()
    .id;
    let p = patient(&conn, "12-4");
    let consultation = insert(
        &conn,
        &Consultation {
            patient_id: p,
            physician_id: physician,
            consulted_at: NaiveDateTime::parse_from_str("2024-01-15 09:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            reason: "Checkup".into(),
            diagnosis: String::new(),
            status: ConsultationStatus::Pending,
        },
    )
    .unwrap()
    .id;

    for (kind, id) in [(EntityKind::Patient, p), (EntityKind::Physician, physician)] {
        let check = policy.check(&conn, kind, id).unwrap();
        assert!(!check.is_safe());
        assert!(policy.delete(&mut conn, kind, id).is_err());
    }

    policy
        .delete(&mut conn, EntityKind::Consultation, consultation)
        .unwrap();
    for (kind, id) in [(EntityKind::Patient, p), (EntityKind::Physician, physician)] {
        assert!(policy.check(&conn, kind, id).unwrap().is_safe());
        policy.delete(&mut conn, kind, id).unwrap();
    }
}

#[test]
fn fresh_patient_has_nothing_to_report() {
    let (conn, _tmp) = open();
    let policy = DeletionPolicy::new(RELATIONS);
    let p = patient(&conn, "13-2");
    let check = policy.check(&conn, EntityKind::Patient, p).unwrap();
    assert_eq!(check.label, "Pedro Pérez");
    assert!(check.blockers.is_empty());
    assert!(check.cascades.is_empty());
}

#[test]
fn child_added_after_check_still_blocks_delete() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("clinic.db");
    let mut conn = open_database(&path).unwrap();
    let policy = DeletionPolicy::default();

    let neurology = specialty(&conn, "Neurology");
    assert!(policy.check(&conn, EntityKind::Specialty, neurology).unwrap().is_safe());

    // Another request attaches a physician before the delete arrives.
    let other = open_database(&path).unwrap();
    insert(
        &other,
        &Physician {
            name: "Luis".into(),
            surname: "Soto".into(),
            rut: "30-2".into(),
            email: "luis.soto@clinic.cl".into(),
            phone: String::new(),
            active: true,
            specialty_id: neurology,
        },
    )
    .unwrap();
    drop(other);

    let err = policy
        .delete(&mut conn, EntityKind::Specialty, neurology)
        .unwrap_err();
    match err {
        DatabaseError::ReferentialIntegrityViolation(violation) => {
            assert_eq!(violation.label, "Neurology");
            assert!(violation.reason().contains("physicians"));
        }
        other => panic!("expected violation, got {other:?}"),
    }
    assert!(get::<Specialty>(&conn, neurology).unwrap().is_some());
}
