//! Patient records as returned by the remote data service.
//!
//! The service returns loosely typed JSON, so every attribute is decoded
//! leniently: a value of the wrong shape becomes `None` instead of failing the
//! record, and consumers substitute their defaults.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A patient-like record. Every attribute is optional; consumers substitute defaults.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct PatientRecord {
    #[serde(
        default,
        alias = "patientId",
        alias = "patient_id",
        deserialize_with = "lenient_identifier"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<u32>,
    #[serde(default, alias = "reportDate", deserialize_with = "lenient_text")]
    pub report_date: Option<String>,
    #[serde(default, alias = "riskScore", deserialize_with = "lenient_number")]
    pub risk_score: Option<f64>,
}

impl PatientRecord {
    /// Live risk score used for tier classification, `0` when absent.
    pub fn risk_score_or_default(&self) -> f64 {
        self.risk_score.unwrap_or(0.0)
    }
}

fn number_from(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn lenient_identifier<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_from(&Value::deserialize(deserializer)?))
}

// Fractional ages are truncated; negative or out-of-range ages are dropped.
fn lenient_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_from(&Value::deserialize(deserializer)?)
        .filter(|age| *age >= 0.0 && *age <= f64::from(u32::MAX))
        .map(|age| age.trunc() as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> PatientRecord {
        serde_json::from_str(json).expect("record parses")
    }

    #[test]
    fn accepts_camel_case_and_nulls() {
        let record = parse(
            r#"{"patientId":"p-1","name":null,"reportDate":"2024-03-02","riskScore":55.5}"#,
        );

        assert_eq!(record.id.as_deref(), Some("p-1"));
        assert_eq!(record.name, None);
        assert_eq!(record.age, None);
        assert_eq!(record.report_date.as_deref(), Some("2024-03-02"));
        assert_eq!(record.risk_score_or_default(), 55.5);
    }

    #[test]
    fn empty_object_is_a_valid_record() {
        let record = parse("{}");
        assert_eq!(record, PatientRecord::default());
        assert_eq!(record.risk_score_or_default(), 0.0);
    }

    #[test]
    fn numeric_identifier_becomes_text() {
        assert_eq!(parse(r#"{"id":42}"#).id.as_deref(), Some("42"));
    }

    #[test]
    fn float_ages_are_coerced() {
        assert_eq!(parse(r#"{"age":45.0}"#).age, Some(45));
        assert_eq!(parse(r#"{"age":45.5}"#).age, Some(45));
        assert_eq!(parse(r#"{"age":"52"}"#).age, Some(52));
        assert_eq!(parse(r#"{"age":-3}"#).age, None);
    }

    #[test]
    fn string_risk_score_is_parsed() {
        assert_eq!(parse(r#"{"riskScore":"72"}"#).risk_score, Some(72.0));
        assert_eq!(parse(r#"{"risk_score":"high"}"#).risk_score, None);
    }

    #[test]
    fn wrong_shapes_fall_back_to_none() {
        let record = parse(r#"{"id":{"x":1},"name":7,"age":true,"reportDate":[],"riskScore":{}}"#);
        assert_eq!(record, PatientRecord::default());
    }
}
