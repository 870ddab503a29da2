use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::ConsultationStatus;
use super::validation::{max_len, required, ValidationError};
use super::{Entity, EntityKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub patient_id: i64,
    pub physician_id: i64,
    pub consulted_at: NaiveDateTime,
    pub reason: String,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub status: ConsultationStatus,
}

impl Entity for Consultation {
    const KIND: EntityKind = EntityKind::Consultation;

    fn validate(&self) -> Result<(), ValidationError> {
        required("reason", &self.reason, 200)?;
        max_len("diagnosis", &self.diagnosis, 200)
    }
}
