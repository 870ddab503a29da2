//! Referential integrity guard.
//!
//! - [`graph`]: static child → parent relations with their delete policy
//! - [`evaluator`]: advisory "is it safe to delete, and if not why" checks
//! - [`policy`]: transactional delete enforcing RESTRICT and applying CASCADE

pub mod evaluator;
pub mod graph;
pub mod policy;

pub use evaluator::{CascadeImpact, DeleteCheck};
pub use graph::{OnDelete, Relation, RELATIONS};
pub use policy::{DeleteOutcome, DeletionPolicy, IntegrityViolation, FALLBACK_REASON};
