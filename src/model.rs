//! The health report view-model derived from a fetched patient record.
//!
//! A [`HealthReport`] is a flat, render-ready copy of the record plus the ordered
//! lists shown in the findings, recommendations and next-steps sections. It is
//! created once per successful fetch and is never mutated afterwards; the builder
//! style `with_*` methods consume the value and return a new one.

use crate::record::PatientRecord;

/// Name shown when the record carries none.
pub const UNKNOWN_PATIENT_NAME: &str = "Unknown";

/// Findings listed on every report.
pub const DEFAULT_FINDINGS: [&str; 4] = [
    "Liver enzyme levels (ALT/AST) are within the normal range",
    "Mild hepatic steatosis detected on ultrasound imaging",
    "No signs of advanced fibrosis or cirrhosis",
    "Bilirubin and albumin levels are normal",
];

/// Recommendations listed on every report.
pub const DEFAULT_RECOMMENDATIONS: [&str; 4] = [
    "Maintain a balanced diet low in saturated fats and added sugars",
    "Engage in at least 150 minutes of moderate exercise per week",
    "Limit alcohol consumption",
    "Work towards and maintain a healthy body weight",
];

/// Next steps listed on every report.
pub const DEFAULT_NEXT_STEPS: [&str; 4] = [
    "Schedule a follow-up liver function test in 6 months",
    "Consult a hepatologist if symptoms such as fatigue or jaundice develop",
    "Repeat ultrasound imaging in 12 months",
    "Continue monitoring blood glucose and lipid levels",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Display-ready copy of a patient's liver health report.
#[derive(Clone, Debug, PartialEq)]
pub struct HealthReport {
    patient_name: String,
    age: u32,
    assessment_date: String,
    risk_score: f64,
    findings: Vec<String>,
    recommendations: Vec<String>,
    next_steps: Vec<String>,
}

impl HealthReport {
    /// Maps a record into a report, substituting defaults for missing attributes.
    ///
    /// This never fails: a record without any attributes yields a report for an
    /// `"Unknown"` patient aged `0` with an empty date and a risk score of `0`.
    pub fn from_record(record: &PatientRecord) -> Self {
        Self {
            patient_name: record
                .name
                .clone()
                .unwrap_or_else(|| UNKNOWN_PATIENT_NAME.to_owned()),
            age: record.age.unwrap_or(0),
            assessment_date: record.report_date.clone().unwrap_or_default(),
            risk_score: record.risk_score_or_default(),
            findings: owned(&DEFAULT_FINDINGS),
            recommendations: owned(&DEFAULT_RECOMMENDATIONS),
            next_steps: owned(&DEFAULT_NEXT_STEPS),
        }
    }

    /// Returns the patient name.
    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    /// Returns the patient age in years.
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Returns the assessment date exactly as delivered by the data service.
    pub fn assessment_date(&self) -> &str {
        &self.assessment_date
    }

    /// Returns the risk score captured at fetch time.
    pub fn risk_score(&self) -> f64 {
        self.risk_score
    }

    /// Returns the key findings in display order.
    pub fn findings(&self) -> &[String] {
        &self.findings
    }

    /// Returns the recommendations in display order.
    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    /// Returns the next steps in display order.
    pub fn next_steps(&self) -> &[String] {
        &self.next_steps
    }

    /// Replaces the findings and returns the updated report.
    pub fn with_findings<I, S>(mut self, findings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.findings = findings.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the recommendations and returns the updated report.
    pub fn with_recommendations<I, S>(mut self, recommendations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommendations = recommendations.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the next steps and returns the updated report.
    pub fn with_next_steps<I, S>(mut self, next_steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.next_steps = next_steps.into_iter().map(Into::into).collect();
        self
    }
}
