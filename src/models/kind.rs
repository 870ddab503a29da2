use serde::{Deserialize, Serialize};

/// Every record type the clinic stores.
///
/// The kind is the type tag the integrity graph, repositories and both
/// HTTP surfaces dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Patient,
    Physician,
    Specialty,
    Consultation,
    Treatment,
    Medication,
    Prescription,
    InsurancePlan,
    Enrollment,
}

impl EntityKind {
    /// Navigation order of the home menu.
    pub const ALL: [EntityKind; 9] = [
        Self::Patient,
        Self::Physician,
        Self::Specialty,
        Self::Consultation,
        Self::Treatment,
        Self::Medication,
        Self::Prescription,
        Self::InsurancePlan,
        Self::Enrollment,
    ];

    pub fn table(self) -> &'static str {
        match self {
            Self::Patient => "patients",
            Self::Physician => "physicians",
            Self::Specialty => "specialties",
            Self::Consultation => "consultations",
            Self::Treatment => "treatments",
            Self::Medication => "medications",
            Self::Prescription => "prescriptions",
            Self::InsurancePlan => "insurance_plans",
            Self::Enrollment => "patient_insurance",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Physician => "Physician",
            Self::Specialty => "Specialty",
            Self::Consultation => "Consultation",
            Self::Treatment => "Treatment",
            Self::Medication => "Medication",
            Self::Prescription => "Prescription",
            Self::InsurancePlan => "InsurancePlan",
            Self::Enrollment => "Enrollment",
        }
    }

    /// URL segment shared by `/api/{prefix}` and `/clinica/{prefix}/`.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Patient => "pacientes",
            Self::Physician => "medicos",
            Self::Specialty => "especialidades",
            Self::Consultation => "consultas",
            Self::Treatment => "tratamientos",
            Self::Medication => "medicamentos",
            Self::Prescription => "recetas",
            Self::InsurancePlan => "seguros",
            Self::Enrollment => "afiliaciones",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Patient => "Patients",
            Self::Physician => "Physicians",
            Self::Specialty => "Specialties",
            Self::Consultation => "Consultations",
            Self::Treatment => "Treatments",
            Self::Medication => "Medications",
            Self::Prescription => "Prescriptions",
            Self::InsurancePlan => "Insurance plans",
            Self::Enrollment => "Enrollments",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.prefix() == prefix)
    }

    /// SQL expression (over alias `t`) producing the record's display label.
    pub(crate) fn label_sql(self) -> &'static str {
        match self {
            Self::Patient | Self::Physician => "t.name || ' ' || t.surname",
            Self::Specialty | Self::Medication => "t.name",
            Self::Consultation => {
                "'Consultation ' || t.id || ' - ' || \
                 (SELECT p.name || ' ' || p.surname FROM patients p WHERE p.id = t.patient_id)"
            }
            Self::Treatment => "'Treatment ' || t.id",
            Self::Prescription => {
                "'Prescription ' || t.id || ' - ' || \
                 (SELECT m.name FROM medications m WHERE m.id = t.medication_id)"
            }
            Self::InsurancePlan => "TRIM(t.name || ' ' || t.plan)",
            Self::Enrollment => {
                "(SELECT p.name || ' ' || p.surname FROM patients p WHERE p.id = t.patient_id) \
                 || ' - ' || \
                 (SELECT TRIM(s.name || ' ' || s.plan) FROM insurance_plans s WHERE s.id = t.plan_id)"
            }
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
