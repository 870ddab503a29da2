pub mod enums;
pub mod kind;
pub mod validation;

mod consultation;
mod insurance;
mod medication;
mod patient;
mod physician;
mod prescription;
mod specialty;
mod treatment;

pub use consultation::*;
pub use enums::*;
pub use insurance::*;
pub use kind::EntityKind;
pub use medication::*;
pub use patient::*;
pub use physician::*;
pub use prescription::*;
pub use specialty::*;
pub use treatment::*;
pub use validation::ValidationError;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A stored row: the store-assigned identity plus the entity's fields.
///
/// Serializes flat, e.g. `{"id": 3, "name": "Cardiology", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: i64,
    #[serde(flatten)]
    pub fields: T,
}

/// The user-editable fields of one record type.
///
/// The same struct serves create (POST), full replacement (PUT) and,
/// after merging, partial replacement (PATCH).
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn validate(&self) -> Result<(), ValidationError>;
}

pub(crate) fn default_true() -> bool {
    true
}
