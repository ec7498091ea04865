//! Three-tier classification of the numeric risk score.

use std::fmt;

use genpdf::style::Color;

/// Scores strictly above this value are high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 70.0;
/// Scores strictly above this value (and not high) are medium risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 40.0;

/// Risk band derived from a score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Classifies a score. Both thresholds are exclusive, so `40` is low and `70` is medium.
    pub fn classify(score: f64) -> Self {
        if score > HIGH_RISK_THRESHOLD {
            RiskTier::High
        } else if score > MEDIUM_RISK_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Short label shown next to the score.
    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
        }
    }

    /// Color used when the score is displayed.
    pub fn color(self) -> Color {
        match self {
            RiskTier::Low => Color::Rgb(22, 163, 74),
            RiskTier::Medium => Color::Rgb(202, 138, 4),
            RiskTier::High => Color::Rgb(220, 38, 38),
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
