//! Pure rendering of the report page into a visual tree.
//!
//! [`render_screen`] maps the page state to one of three screens. The report
//! screen is a [`ReportView`]: an identity block, a color-coded risk badge and
//! three [`TitledList`] sections built by the same constructor. `Display`
//! implementations lay the tree out as plain text for the terminal.

use std::fmt;

use crate::loader::LoadState;
use crate::model::HealthReport;
use crate::record::PatientRecord;
use crate::richtext::Span;
use crate::risk::RiskTier;

/// Title of the findings section.
pub const FINDINGS_TITLE: &str = "Key Findings";
/// Title of the recommendations section.
pub const RECOMMENDATIONS_TITLE: &str = "Recommendations";
/// Title of the next-steps section.
pub const NEXT_STEPS_TITLE: &str = "Next Steps";

/// Heading shown when no report could be loaded.
pub const NOT_FOUND_TITLE: &str = "Report Not Found";
const NOT_FOUND_MESSAGE: &str =
    "We couldn't find a liver health report for this patient. Please try again later.";

const FINDINGS_MARKER: &str = "•";
const RECOMMENDATIONS_MARKER: &str = "✓";
const NEXT_STEPS_MARKER: &str = "→";

/// Patient identity shown at the top of the report.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentityBlock {
    pub name: String,
    pub age: u32,
    pub assessment_date: String,
}

/// Risk score with its tier and a styled label.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskBadge {
    pub score: f64,
    pub tier: RiskTier,
    pub label: Span,
}

/// A titled, ordered list of strings prefixed with a decorative marker.
#[derive(Clone, Debug, PartialEq)]
pub struct TitledList {
    title: Span,
    items: Vec<String>,
    marker: &'static str,
}

impl TitledList {
    /// Creates a list section.
    pub fn new(title: impl Into<String>, items: &[String], marker: &'static str) -> Self {
        Self {
            title: Span::new(title).bold(),
            items: items.to_vec(),
            marker,
        }
    }

    /// Returns the section title.
    pub fn title(&self) -> &str {
        self.title.text()
    }

    /// Returns the items in display order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Returns the marker drawn in front of every item.
    pub fn marker(&self) -> &str {
        self.marker
    }
}

impl fmt::Display for TitledList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for item in &self.items {
            writeln!(f, "  {} {}", self.marker, item)?;
        }
        Ok(())
    }
}

/// Visual tree of a loaded report.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportView {
    pub identity: IdentityBlock,
    pub risk: RiskBadge,
    pub sections: Vec<TitledList>,
}

impl fmt::Display for ReportView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Liver Health Report")?;
        writeln!(f)?;
        writeln!(f, "Patient Name:    {}", self.identity.name)?;
        writeln!(f, "Age:             {}", self.identity.age)?;
        writeln!(f, "Assessment Date: {}", self.identity.assessment_date)?;
        writeln!(f, "Risk Score:      {}% ({})", self.risk.score, self.risk.label)?;
        for section in &self.sections {
            writeln!(f)?;
            write!(f, "{}", section)?;
        }
        Ok(())
    }
}

/// Everything the page can show.
#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Loading,
    NotFound,
    Report(ReportView),
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Loading => writeln!(f, "Loading report..."),
            Screen::NotFound => {
                writeln!(f, "{}", NOT_FOUND_TITLE)?;
                writeln!(f, "{}", NOT_FOUND_MESSAGE)
            }
            Screen::Report(view) => write!(f, "{}", view),
        }
    }
}

/// Builds the visual tree for `report`.
///
/// The tier comes from the raw record's live score rather than the copy held by
/// the report; a record without a score classifies as low.
pub fn render_report(report: &HealthReport, record: &PatientRecord) -> ReportView {
    let tier = RiskTier::classify(record.risk_score_or_default());

    ReportView {
        identity: IdentityBlock {
            name: report.patient_name().to_owned(),
            age: report.age(),
            assessment_date: report.assessment_date().to_owned(),
        },
        risk: RiskBadge {
            score: report.risk_score(),
            tier,
            label: Span::new(tier.label()).bold().colored(tier.color()),
        },
        sections: vec![
            TitledList::new(FINDINGS_TITLE, report.findings(), FINDINGS_MARKER),
            TitledList::new(
                RECOMMENDATIONS_TITLE,
                report.recommendations(),
                RECOMMENDATIONS_MARKER,
            ),
            TitledList::new(NEXT_STEPS_TITLE, report.next_steps(), NEXT_STEPS_MARKER),
        ],
    }
}

/// Maps the page state to a screen. A found report without its record is treated as not found.
pub fn render_screen(state: &LoadState, record: Option<&PatientRecord>) -> Screen {
    match (state, record) {
        (LoadState::Loading, _) => Screen::Loading,
        (LoadState::Found(report), Some(record)) => Screen::Report(render_report(report, record)),
        (LoadState::Found(_), None) | (LoadState::NotFound, _) => Screen::NotFound,
    }
}
