use serde::{Deserialize, Serialize};

use super::validation::{in_range, max_len, required, ValidationError};
use super::{default_true, Entity, EntityKind};

/// Catalog entry: public (Fonasa) or private (Isapre) insurer and plan.
/// Unique as a (name, plan) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsurancePlan {
    pub name: String,
    #[serde(default)]
    pub plan: String,
}

impl Entity for InsurancePlan {
    const KIND: EntityKind = EntityKind::InsurancePlan;

    fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, 120)?;
        max_len("plan", &self.plan, 120)
    }
}

/// A patient's affiliation to an insurance plan. Unique per (patient, plan).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub patient_id: i64,
    pub plan_id: i64,
    #[serde(default)]
    pub policy_number: String,
    #[serde(default)]
    pub coverage_percent: u32,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Entity for Enrollment {
    const KIND: EntityKind = EntityKind::Enrollment;

    fn validate(&self) -> Result<(), ValidationError> {
        max_len("policy_number", &self.policy_number, 60)?;
        in_range("coverage_percent", i64::from(self.coverage_percent), 0, 100)
    }
}
