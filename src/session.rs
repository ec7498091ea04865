//! Session context identifying which patient's report to load.

use std::env;
use std::fmt;

/// Environment variable the CLI reads the current patient identifier from.
pub const PATIENT_ID_VAR: &str = "LIVER_REPORT_PATIENT_ID";

/// Route the page navigates to when no patient is selected.
pub const LOGIN_ROUTE: &str = "/login";

/// A non-empty, trimmed patient identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PatientId(String);

impl PatientId {
    /// Parses an identifier, rejecting blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the page sends the user instead of loading a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Authentication entry point, see [`LOGIN_ROUTE`].
    Login,
}

impl Navigation {
    /// Returns the route path of the navigation target.
    pub fn route(self) -> &'static str {
        match self {
            Navigation::Login => LOGIN_ROUTE,
        }
    }
}

/// Session-scoped state handed to the report page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    patient_id: Option<PatientId>,
}

impl Session {
    /// Creates a session for the given patient.
    pub fn for_patient(patient_id: PatientId) -> Self {
        Self {
            patient_id: Some(patient_id),
        }
    }

    /// Creates a session without a selected patient.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Reads the current patient from [`PATIENT_ID_VAR`].
    pub fn from_env() -> Self {
        Self {
            patient_id: env::var(PATIENT_ID_VAR)
                .ok()
                .and_then(|raw| PatientId::parse(&raw)),
        }
    }

    /// Returns the current patient identifier, if any.
    pub fn patient_id(&self) -> Option<&PatientId> {
        self.patient_id.as_ref()
    }

    /// Returns the current patient or the navigation target when none is selected.
    pub fn require_patient(&self) -> Result<&PatientId, Navigation> {
        self.patient_id.as_ref().ok_or(Navigation::Login)
    }
}
