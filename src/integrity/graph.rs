//! Foreign-key ownership rules between record types.
//!
//! One entry per foreign key, child → parent. The SQLite schema declares the
//! same policies (`ON DELETE RESTRICT` / `ON DELETE CASCADE`); the test at the
//! bottom keeps the two in lockstep.

use serde::Serialize;

use crate::models::EntityKind;

/// What deleting the parent does to children referencing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum OnDelete {
    /// Parent delete is refused while a child exists; `reason` explains why.
    Restrict { reason: &'static str },
    /// Children are deleted together with the parent.
    Cascade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub child: EntityKind,
    pub foreign_key: &'static str,
    pub parent: EntityKind,
    pub on_delete: OnDelete,
}

impl Relation {
    pub fn is_restrict(&self) -> bool {
        matches!(self.on_delete, OnDelete::Restrict { .. })
    }

    pub fn is_cascade(&self) -> bool {
        matches!(self.on_delete, OnDelete::Cascade)
    }
}

const fn restrict(
    child: EntityKind,
    foreign_key: &'static str,
    parent: EntityKind,
    reason: &'static str,
) -> Relation {
    Relation {
        child,
        foreign_key,
        parent,
        on_delete: OnDelete::Restrict { reason },
    }
}

pub static RELATIONS: &[Relation] = &[
    restrict(
        EntityKind::Physician,
        "specialty_id",
        EntityKind::Specialty,
        "There are physicians with this specialty.",
    ),
    restrict(
        EntityKind::Consultation,
        "patient_id",
        EntityKind::Patient,
        "Has registered medical consultations.",
    ),
    restrict(
        EntityKind::Consultation,
        "physician_id",
        EntityKind::Physician,
        "Has assigned medical consultations.",
    ),
    restrict(
        EntityKind::Treatment,
        "consultation_id",
        EntityKind::Consultation,
        "Has associated treatments.",
    ),
    restrict(
        EntityKind::Prescription,
        "treatment_id",
        EntityKind::Treatment,
        "Has associated prescriptions.",
    ),
    restrict(
        EntityKind::Prescription,
        "medication_id",
        EntityKind::Medication,
        "Is referenced by medical prescriptions.",
    ),
    Relation {
        child: EntityKind::Enrollment,
        foreign_key: "patient_id",
        parent: EntityKind::Patient,
        on_delete: OnDelete::Cascade,
    },
    restrict(
        EntityKind::Enrollment,
        "plan_id",
        EntityKind::InsurancePlan,
        "Has patient enrollments.",
    ),
];

/// Relations whose parent is `parent`, in declaration order.
pub fn relations_to(
    relations: &'static [Relation],
    parent: EntityKind,
) -> impl Iterator<Item = &'static Relation> {
    relations.iter().filter(move |r| r.parent == parent)
}

pub fn restricting(
    relations: &'static [Relation],
    parent: EntityKind,
) -> impl Iterator<Item = &'static Relation> {
    relations_to(relations, parent).filter(|r| r.is_restrict())
}

pub fn cascading(
    relations: &'static [Relation],
    parent: EntityKind,
) -> impl Iterator<Item = &'static Relation> {
    relations_to(relations, parent).filter(|r| r.is_cascade())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn patient_has_one_restrict_and_one_cascade() {
        let restrict: Vec<_> = restricting(RELATIONS, EntityKind::Patient).collect();
        let cascade: Vec<_> = cascading(RELATIONS, EntityKind::Patient).collect();
        assert_eq!(restrict.len(), 1);
        assert_eq!(restrict[0].child, EntityKind::Consultation);
        assert_eq!(cascade.len(), 1);
        assert_eq!(cascade[0].child, EntityKind::Enrollment);
    }

    #[test]
    fn leaf_records_protect_nothing() {
        assert_eq!(relations_to(RELATIONS, EntityKind::Prescription).count(), 0);
        assert_eq!(relations_to(RELATIONS, EntityKind::Enrollment).count(), 0);
    }

    #[test]
    fn only_enrollment_cascades() {
        let cascades: Vec<_> = RELATIONS.iter().filter(|r| r.is_cascade()).collect();
        assert_eq!(cascades.len(), 1);
        assert_eq!(cascades[0].parent, EntityKind::Patient);
    }

    #[test]
    fn schema_declares_the_same_policies() {
        let conn = open_memory_database().unwrap();
        let mut declared = Vec::new();
        for kind in EntityKind::ALL {
            let mut stmt = conn
                .prepare(&format!("PRAGMA foreign_key_list({})", kind.table()))
                .unwrap();
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>("table")?,
                        row.get::<_, String>("from")?,
                        row.get::<_, String>("on_delete")?,
                    ))
                })
                .unwrap();
            for row in rows {
                let (parent_table, column, on_delete) = row.unwrap();
                declared.push((kind.table().to_string(), column, parent_table, on_delete));
            }
        }
        declared.sort();

        let mut expected: Vec<_> = RELATIONS
            .iter()
            .map(|r| {
                (
                    r.child.table().to_string(),
                    r.foreign_key.to_string(),
                    r.parent.table().to_string(),
                    if r.is_cascade() { "CASCADE" } else { "RESTRICT" }.to_string(),
                )
            })
            .collect();
        expected.sort();

        assert_eq!(declared, expected);
    }
}
