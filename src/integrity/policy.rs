//! Deletion enforcement.
//!
//! The store is the enforcer: a RESTRICT child makes SQLite reject the
//! parent `DELETE` with `SQLITE_CONSTRAINT_FOREIGNKEY`. The policy turns
//! that rejection into an [`IntegrityViolation`] carrying the evaluator's
//! reasons, and deletes CASCADE children inside the same transaction.

use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use serde::Serialize;

use super::evaluator::{self, CascadeImpact, DeleteCheck};
use super::graph::{self, Relation, RELATIONS};
use crate::db::{is_delete_refusal, DatabaseError};
use crate::models::EntityKind;

/// Shown when the store refused but no RESTRICT child is visible any more.
pub const FALLBACK_REASON: &str = "Related records exist.";

/// A delete refused because RESTRICT children still reference the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityViolation {
    pub entity: EntityKind,
    pub id: i64,
    pub label: String,
    pub reasons: Vec<String>,
}

impl IntegrityViolation {
    /// Reasons combined into one display string.
    pub fn reason(&self) -> String {
        if self.reasons.is_empty() {
            FALLBACK_REASON.to_string()
        } else {
            self.reasons.join(" ")
        }
    }

    pub fn message(&self) -> String {
        format!("Cannot delete «{}». {}", self.label, self.reason())
    }
}

impl std::fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub entity: EntityKind,
    pub id: i64,
    pub label: String,
    pub cascaded: Vec<CascadeImpact>,
}

/// Safe-delete behavior shared by the REST and HTML delete handlers.
#[derive(Debug, Clone, Copy)]
pub struct DeletionPolicy {
    relations: &'static [Relation],
}

impl Default for DeletionPolicy {
    fn default() -> Self {
        Self::new(RELATIONS)
    }
}

impl DeletionPolicy {
    pub fn new(relations: &'static [Relation]) -> Self {
        Self { relations }
    }

    pub fn relations(&self) -> &'static [Relation] {
        self.relations
    }

    /// Advisory check for the confirm page.
    pub fn check(
        &self,
        conn: &Connection,
        kind: EntityKind,
        id: i64,
    ) -> Result<DeleteCheck, DatabaseError> {
        evaluator::inspect(conn, self.relations, kind, id)
    }

    /// Delete the record and its CASCADE children atomically.
    ///
    /// - missing row → `NotFound` (also for a second delete of the same id)
    /// - RESTRICT child present → `ReferentialIntegrityViolation`, nothing deleted
    pub fn delete(
        &self,
        conn: &mut Connection,
        kind: EntityKind,
        id: i64,
    ) -> Result<DeleteOutcome, DatabaseError> {
        // IMMEDIATE takes the write lock up front: no child can be inserted
        // between the existence checks and the delete.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let label = evaluator::display_label(&tx, kind, id)?
            .ok_or_else(|| DatabaseError::not_found(kind.name(), id))?;

        match self.delete_rows(&tx, kind, id) {
            Ok(cascaded) => {
                tx.commit()?;
                for impact in &cascaded {
                    tracing::info!(
                        entity = %kind,
                        id,
                        child = %impact.entity,
                        count = impact.count,
                        "Cascaded delete"
                    );
                }
                tracing::info!(entity = %kind, id, "Record deleted");
                Ok(DeleteOutcome {
                    entity: kind,
                    id,
                    label,
                    cascaded,
                })
            }
            Err(e) if is_delete_refusal(&e) => {
                let reasons = evaluator::deletion_blockers(&tx, self.relations, kind, id)?;
                tx.rollback()?;
                let violation = IntegrityViolation {
                    entity: kind,
                    id,
                    label,
                    reasons: reasons.into_iter().map(String::from).collect(),
                };
                tracing::warn!(entity = %kind, id, reason = %violation.reason(), "Delete refused");
                Err(DatabaseError::ReferentialIntegrityViolation(violation))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn delete_rows(
        &self,
        tx: &Transaction<'_>,
        kind: EntityKind,
        id: i64,
    ) -> rusqlite::Result<Vec<CascadeImpact>> {
        let mut cascaded = Vec::new();
        for relation in graph::cascading(self.relations, kind) {
            let sql = format!(
                "DELETE FROM {} WHERE {} = ?1",
                relation.child.table(),
                relation.foreign_key
            );
            let count = tx.execute(&sql, params![id])?;
            if count > 0 {
                cascaded.push(CascadeImpact {
                    entity: relation.child,
                    count: count as i64,
                });
            }
        }
        tx.execute(
            &format!("DELETE FROM {} WHERE id = ?1", kind.table()),
            params![id],
        )?;
        Ok(cascaded)
    }
}
