use serde::{Deserialize, Serialize};

use super::validation::{required, ValidationError};
use super::{Entity, EntityKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub treatment_id: i64,
    pub medication_id: i64,
    /// e.g. "500 mg"
    pub dosage: String,
    /// e.g. "every 8 hours"
    pub frequency: String,
    /// e.g. "7 days"
    pub duration: String,
}

impl Entity for Prescription {
    const KIND: EntityKind = EntityKind::Prescription;

    fn validate(&self) -> Result<(), ValidationError> {
        required("dosage", &self.dosage, 60)?;
        required("frequency", &self.frequency, 60)?;
        required("duration", &self.duration, 60)
    }
}
