use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{BloodType, Sex};
use super::validation::{email, max_len, required, ValidationError};
use super::{default_true, Entity, EntityKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// National id, unique across patients.
    pub rut: String,
    pub name: String,
    pub surname: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default)]
    pub blood_type: Option<BloodType>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Entity for Patient {
    const KIND: EntityKind = EntityKind::Patient;

    fn validate(&self) -> Result<(), ValidationError> {
        required("rut", &self.rut, 12)?;
        required("name", &self.name, 120)?;
        required("surname", &self.surname, 120)?;
        email("email", &self.email, true)?;
        max_len("phone", &self.phone, 30)?;
        max_len("address", &self.address, 200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_fields() {
        let patient: Patient = serde_json::from_value(serde_json::json!({
            "rut": "11111111-1",
            "name": "Ana",
            "surname": "Rojas",
            "birth_date": "1990-04-12",
        }))
        .unwrap();
        assert_eq!(patient.sex, Sex::Unspecified);
        assert_eq!(patient.blood_type, None);
        assert!(patient.active);
        assert!(patient.validate().is_ok());
    }

    #[test]
    fn blank_email_is_allowed_but_malformed_is_not() {
        let mut patient: Patient = serde_json::from_value(serde_json::json!({
            "rut": "11111111-1",
            "name": "Ana",
            "surname": "Rojas",
            "birth_date": "1990-04-12",
            "email": "ana(at)mail",
        }))
        .unwrap();
        assert_eq!(
            patient.validate(),
            Err(ValidationError::InvalidEmail { field: "email" })
        );
        patient.email.clear();
        assert!(patient.validate().is_ok());
    }
}
