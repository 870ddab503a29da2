use serde::{Deserialize, Deserializer, Serialize};

use super::validation::{max_len, price, required, ValidationError};
use super::{Entity, EntityKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    #[serde(default)]
    pub laboratory: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default, deserialize_with = "decimal_price")]
    pub unit_price: f64,
}

/// Accept `150.5` as well as the decimal string form `"150.50"`.
fn decimal_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid decimal price: {s:?}"))),
    }
}

impl Entity for Medication {
    const KIND: EntityKind = EntityKind::Medication;

    fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, 120)?;
        max_len("laboratory", &self.laboratory, 120)?;
        price("unit_price", self.unit_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn price_accepts_number_or_decimal_string() {
        let m: Medication =
            serde_json::from_value(json!({"name": "Ibuprofeno", "unit_price": "150.50"})).unwrap();
        assert_eq!(m.unit_price, 150.5);

        let m: Medication =
            serde_json::from_value(json!({"name": "Ibuprofeno", "unit_price": 990})).unwrap();
        assert_eq!(m.unit_price, 990.0);

        let m: Medication = serde_json::from_value(json!({"name": "Ibuprofeno"})).unwrap();
        assert_eq!(m.unit_price, 0.0);

        assert!(serde_json::from_value::<Medication>(
            json!({"name": "Ibuprofeno", "unit_price": "caro"})
        )
        .is_err());
    }
}
