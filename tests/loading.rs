use std::cell::Cell;

use liver_report::error::SourceError;
use liver_report::loader::{Applied, LoadState, ReportPage};
use liver_report::record::PatientRecord;
use liver_report::render::{render_screen, Screen};
use liver_report::risk::RiskTier;
use liver_report::session::{Navigation, PatientId, Session};
use liver_report::source::{decode_records, FilePatientSource, PatientSource};

/// Source returning a canned response and counting fetches.
struct StubSource {
    calls: Cell<usize>,
    response: fn() -> Result<Vec<PatientRecord>, SourceError>,
}

impl StubSource {
    fn new(response: fn() -> Result<Vec<PatientRecord>, SourceError>) -> Self {
        Self {
            calls: Cell::new(0),
            response,
        }
    }
}

impl PatientSource for &StubSource {
    fn fetch(&self, _: &PatientId) -> Result<Vec<PatientRecord>, SourceError> {
        self.calls.set(self.calls.get() + 1);
        (self.response)()
    }
}

fn session(id: &str) -> Session {
    Session::for_patient(PatientId::parse(id).expect("valid id"))
}

#[test]
fn missing_session_redirects_without_fetching() {
    let source = StubSource::new(|| Ok(vec![PatientRecord::default()]));
    let mut page = ReportPage::new(&source, Session::anonymous());

    assert_eq!(page.load().unwrap_err(), Navigation::Login);
    assert_eq!(source.calls.get(), 0);
    assert!(!page.is_mounted());
}

#[test]
fn empty_result_ends_in_not_found() {
    let source = StubSource::new(|| Ok(Vec::new()));
    let mut page = ReportPage::new(&source, session("p-1"));

    let state = page.load().expect("patient in session");
    assert_eq!(state, &LoadState::NotFound);
    assert!(state.is_terminal());
    assert_eq!(source.calls.get(), 1);
    assert_eq!(render_screen(page.state(), page.record()), Screen::NotFound);
}

#[test]
fn fetch_failure_ends_in_not_found() {
    let source = StubSource::new(|| Err(SourceError::Connection("http://localhost:1".into())));
    let mut page = ReportPage::new(&source, session("p-1"));

    assert_eq!(page.load().unwrap(), &LoadState::NotFound);
    assert!(page.report().is_none());
}

#[test]
fn parse_failure_ends_in_not_found() {
    let source = StubSource::new(|| decode_records("<html>oops</html>"));
    let mut page = ReportPage::new(&source, session("p-1"));

    assert_eq!(page.load().unwrap(), &LoadState::NotFound);
}

#[test]
fn record_without_optional_fields_uses_defaults() {
    let source = StubSource::new(|| decode_records(r#"[{"id":"p-1"}]"#));
    let mut page = ReportPage::new(&source, session("p-1"));
    page.load().unwrap();

    let report = page.report().expect("report loaded");
    assert_eq!(report.patient_name(), "Unknown");
    assert_eq!(report.age(), 0);
    assert_eq!(report.assessment_date(), "");
    assert_eq!(report.risk_score(), 0.0);

    match render_screen(page.state(), page.record()) {
        Screen::Report(view) => assert_eq!(view.risk.tier, RiskTier::Low),
        other => panic!("expected report screen, got {:?}", other),
    }
}

#[test]
fn result_arriving_after_unmount_is_ignored() {
    let source = StubSource::new(|| Ok(vec![PatientRecord::default()]));
    let mut page = ReportPage::new(&source, session("p-1"));

    let ticket = page.begin_load().unwrap();
    let result = page.fetch(&ticket);
    page.unmount();

    assert_eq!(page.complete_load(&ticket, result), Applied::Stale);
    assert_eq!(page.state(), &LoadState::Loading);
    assert!(page.report().is_none());
}

#[test]
fn high_risk_record_renders_high_tier() {
    let source =
        StubSource::new(|| decode_records(r#"[{"id":"p-7","name":"Lin","riskScore":71}]"#));
    let mut page = ReportPage::new(&source, session("p-7"));
    page.load().unwrap();

    let Screen::Report(view) = render_screen(page.state(), page.record()) else {
        panic!("expected report screen");
    };
    assert_eq!(view.identity.name, "Lin");
    assert_eq!(view.risk.tier, RiskTier::High);
}

#[test]
fn loosely_typed_record_still_loads() {
    let dir = tempfile::tempdir().expect("temp dir");
    let records = dir.path().join("patients.json");
    std::fs::write(
        &records,
        r#"[{"id":"p-1","name":"Ann","age":45.5,"reportDate":"2024-02-01","riskScore":"72"}]"#,
    )
    .expect("write records");

    let mut page = ReportPage::new(FilePatientSource::new(&records), session("p-1"));
    page.load().expect("patient in session");

    let report = page.report().expect("report loaded");
    assert_eq!(report.age(), 45);
    assert_eq!(report.risk_score(), 72.0);
    let Screen::Report(view) = render_screen(page.state(), page.record()) else {
        panic!("expected report screen");
    };
    assert_eq!(view.risk.tier, RiskTier::High);
}

#[test]
fn numeric_identifier_matches_session() {
    let dir = tempfile::tempdir().expect("temp dir");
    let records = dir.path().join("patients.json");
    std::fs::write(&records, r#"[{"id":42,"name":"Ann"}]"#).expect("write records");

    let mut page = ReportPage::new(FilePatientSource::new(&records), session("42"));
    page.load().expect("patient in session");

    assert_eq!(page.report().map(|r| r.patient_name()), Some("Ann"));
}

#[test]
fn wrongly_typed_fields_use_defaults() {
    let source = StubSource::new(|| {
        decode_records(r#"[{"name":12,"age":"old","reportDate":false,"riskScore":[1]}]"#)
    });
    let mut page = ReportPage::new(&source, session("p-1"));
    page.load().unwrap();

    let report = page.report().expect("report loaded");
    assert_eq!(report.patient_name(), "Unknown");
    assert_eq!(report.age(), 0);
    assert_eq!(report.assessment_date(), "");
    assert_eq!(report.risk_score(), 0.0);
}

#[test]
fn malformed_second_element_keeps_first_record() {
    let source = StubSource::new(|| decode_records(r#"[{"name":"First"},"oops"]"#));
    let mut page = ReportPage::new(&source, session("p-1"));
    page.load().unwrap();

    assert_eq!(page.report().map(|r| r.patient_name()), Some("First"));
}
