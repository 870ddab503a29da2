use serde::{Deserialize, Serialize};

use super::validation::{email, max_len, required, ValidationError};
use super::{default_true, Entity, EntityKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Physician {
    pub name: String,
    pub surname: String,
    /// National id, unique across physicians.
    pub rut: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "default_true")]
    pub active: bool,
    pub specialty_id: i64,
}

impl Entity for Physician {
    const KIND: EntityKind = EntityKind::Physician;

    fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, 120)?;
        required("surname", &self.surname, 120)?;
        required("rut", &self.rut, 12)?;
        email("email", &self.email, false)?;
        max_len("phone", &self.phone, 30)
    }
}
