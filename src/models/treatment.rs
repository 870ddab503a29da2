use serde::{Deserialize, Serialize};

use super::validation::{required, ValidationError};
use super::{Entity, EntityKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    pub consultation_id: i64,
    pub description: String,
    #[serde(default)]
    pub duration_days: u32,
    #[serde(default)]
    pub notes: String,
}

impl Entity for Treatment {
    const KIND: EntityKind = EntityKind::Treatment;

    fn validate(&self) -> Result<(), ValidationError> {
        required("description", &self.description, 10_000)
    }
}
