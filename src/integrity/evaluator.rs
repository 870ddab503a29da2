//! Deletion-safety evaluator: advisory existence checks over the graph.
//!
//! Nothing here enforces anything; the store refuses the delete itself
//! (see `policy`). These answers feed the confirm page and the message of
//! a refused delete.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use super::graph::{self, OnDelete, Relation};
use crate::db::DatabaseError;
use crate::models::EntityKind;

/// Children a delete would remove along with the parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeImpact {
    pub entity: EntityKind,
    pub count: i64,
}

/// What the confirm-delete page needs to know about one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteCheck {
    pub entity: EntityKind,
    pub id: i64,
    pub label: String,
    pub blockers: Vec<&'static str>,
    pub cascades: Vec<CascadeImpact>,
}

impl DeleteCheck {
    pub fn is_safe(&self) -> bool {
        self.blockers.is_empty()
    }

    /// Blockers joined for display, `None` when the delete is allowed.
    pub fn reason(&self) -> Option<String> {
        (!self.blockers.is_empty()).then(|| self.blockers.join(" "))
    }
}

/// Does at least one `relation.child` row reference `parent_id`?
pub fn has_children(
    conn: &Connection,
    relation: &Relation,
    parent_id: i64,
) -> Result<bool, DatabaseError> {
    let sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1)",
        relation.child.table(),
        relation.foreign_key
    );
    Ok(conn.query_row(&sql, params![parent_id], |row| row.get(0))?)
}

pub fn count_children(
    conn: &Connection,
    relation: &Relation,
    parent_id: i64,
) -> Result<i64, DatabaseError> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE {} = ?1",
        relation.child.table(),
        relation.foreign_key
    );
    Ok(conn.query_row(&sql, params![parent_id], |row| row.get(0))?)
}

/// One reason per RESTRICT relation that currently has a child referencing
/// the record, in declaration order. Empty means the delete would succeed.
pub fn deletion_blockers(
    conn: &Connection,
    relations: &'static [Relation],
    kind: EntityKind,
    id: i64,
) -> Result<Vec<&'static str>, DatabaseError> {
    let mut reasons = Vec::new();
    for relation in graph::restricting(relations, kind) {
        if let OnDelete::Restrict { reason } = relation.on_delete {
            if has_children(conn, relation, id)? {
                reasons.push(reason);
            }
        }
    }
    Ok(reasons)
}

/// Display label of the record, `None` when no such row exists.
pub fn display_label(
    conn: &Connection,
    kind: EntityKind,
    id: i64,
) -> Result<Option<String>, DatabaseError> {
    let sql = format!(
        "SELECT {} FROM {} t WHERE t.id = ?1",
        kind.label_sql(),
        kind.table()
    );
    let label = conn
        .query_row(&sql, params![id], |row| row.get::<_, Option<String>>(0))
        .optional()?;
    Ok(label.map(|l| l.unwrap_or_default()))
}

/// Full advisory picture for one record: label, blockers and cascades.
pub fn inspect(
    conn: &Connection,
    relations: &'static [Relation],
    kind: EntityKind,
    id: i64,
) -> Result<DeleteCheck, DatabaseError> {
    let label = display_label(conn, kind, id)?
        .ok_or_else(|| DatabaseError::not_found(kind.name(), id))?;
    let blockers = deletion_blockers(conn, relations, kind, id)?;
    let mut cascades = Vec::new();
    for relation in graph::cascading(relations, kind) {
        let count = count_children(conn, relation, id)?;
        if count > 0 {
            cascades.push(CascadeImpact {
                entity: relation.child,
                count,
            });
        }
    }
    Ok(DeleteCheck {
        entity: kind,
        id,
        label,
        blockers,
        cascades,
    })
}
