use crate::db::DatabaseError;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Macro to generate enum with as_str + label + std::str::FromStr pattern.
///
/// The stored code is used both in SQLite and on the JSON wire.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal : $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Human-readable label for HTML pages.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: DatabaseError| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

str_enum!(Sex {
    Male => "M" : "Male",
    Female => "F" : "Female",
    Unspecified => "X" : "Not specified",
});

impl Default for Sex {
    fn default() -> Self {
        Self::Unspecified
    }
}

str_enum!(BloodType {
    OPositive => "O+" : "O+",
    ONegative => "O-" : "O-",
    APositive => "A+" : "A+",
    ANegative => "A-" : "A-",
    BPositive => "B+" : "B+",
    BNegative => "B-" : "B-",
    AbPositive => "AB+" : "AB+",
    AbNegative => "AB-" : "AB-",
});

str_enum!(ConsultationStatus {
    Pending => "PEND" : "Pending",
    Attended => "ATEN" : "Attended",
    Cancelled => "CANC" : "Cancelled",
    NoShow => "NOAS" : "No-show",
});

impl Default for ConsultationStatus {
    fn default() -> Self {
        Self::Pending
    }
}
