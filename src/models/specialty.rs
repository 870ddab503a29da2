use serde::{Deserialize, Serialize};

use super::validation::{required, ValidationError};
use super::{Entity, EntityKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialty {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Entity for Specialty {
    const KIND: EntityKind = EntityKind::Specialty;

    fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, 120)
    }
}
