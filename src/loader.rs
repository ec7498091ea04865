//! The report page: reads the session, fetches the record and tracks load state.
//!
//! Loading is split into [`ReportPage::begin_load`], which hands out a
//! [`LoadTicket`], and [`ReportPage::complete_load`], which applies a fetch result
//! for that ticket. A ticket becomes stale once the page is unmounted or a newer
//! load starts, and results for stale tickets are dropped. [`ReportPage::load`]
//! runs both halves back to back for synchronous callers.

use log::{debug, error, warn};

use crate::error::SourceError;
use crate::model::HealthReport;
use crate::record::PatientRecord;
use crate::session::{Navigation, PatientId, Session};
use crate::source::PatientSource;

/// Display state of the page.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
    /// A fetch is in flight.
    Loading,
    /// The fetch returned at least one record.
    Found(HealthReport),
    /// The fetch failed or returned nothing.
    NotFound,
}

impl LoadState {
    /// Returns the loaded report, if any.
    pub fn report(&self) -> Option<&HealthReport> {
        match self {
            LoadState::Found(report) => Some(report),
            LoadState::Loading | LoadState::NotFound => None,
        }
    }

    /// Returns `true` once the state can no longer change without a new load.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoadState::Loading)
    }
}

/// Handle for one in-flight load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    patient_id: PatientId,
    generation: u64,
}

impl LoadTicket {
    /// Returns the identifier the load was started for.
    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }
}

/// What happened to a fetch result handed to [`ReportPage::complete_load`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The result moved the page into a terminal state.
    Applied,
    /// The ticket was stale and the result was discarded.
    Stale,
}

/// A report page bound to a data source and a session.
pub struct ReportPage<S> {
    source: S,
    session: Session,
    state: LoadState,
    record: Option<PatientRecord>,
    generation: u64,
    mounted: bool,
}

impl<S: PatientSource> ReportPage<S> {
    /// Creates an unmounted page in the loading state.
    pub fn new(source: S, session: Session) -> Self {
        Self {
            source,
            session,
            state: LoadState::Loading,
            record: None,
            generation: 0,
            mounted: false,
        }
    }

    /// Returns the current display state.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Returns the loaded report, if any.
    pub fn report(&self) -> Option<&HealthReport> {
        self.state.report()
    }

    /// Returns the raw record the report was derived from.
    pub fn record(&self) -> Option<&PatientRecord> {
        self.record.as_ref()
    }

    /// Returns the session the page was created with.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns whether the page is currently mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Switches the page to another session. The next load uses the new identifier.
    pub fn set_session(&mut self, session: Session) {
        self.session = session;
    }

    /// Mounts the page and starts a load for the session's patient.
    ///
    /// Returns [`Navigation::Login`] without touching the source when the session has
    /// no patient. Any report from an earlier load is discarded.
    pub fn begin_load(&mut self) -> Result<LoadTicket, Navigation> {
        let patient_id = match self.session.require_patient() {
            Ok(patient_id) => patient_id.clone(),
            Err(navigation) => {
                debug!(
                    "No patient in session; navigating to {}",
                    navigation.route()
                );
                return Err(navigation);
            }
        };

        self.mounted = true;
        self.generation += 1;
        self.state = LoadState::Loading;
        self.record = None;

        Ok(LoadTicket {
            patient_id,
            generation: self.generation,
        })
    }

    /// Performs the fetch for `ticket` without changing page state.
    pub fn fetch(&self, ticket: &LoadTicket) -> Result<Vec<PatientRecord>, SourceError> {
        self.source.fetch(&ticket.patient_id)
    }

    /// Applies a fetch result for `ticket`.
    ///
    /// Only the first record is used. Failures and empty results end in
    /// [`LoadState::NotFound`]; failures are logged and otherwise swallowed.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Vec<PatientRecord>, SourceError>,
    ) -> Applied {
        if !self.mounted || ticket.generation != self.generation {
            debug!(
                "Dropping stale result for patient {} (generation {}, current {})",
                ticket.patient_id, ticket.generation, self.generation
            );
            return Applied::Stale;
        }

        match result {
            Ok(records) => match records.into_iter().next() {
                Some(record) => {
                    debug!("Loaded report for patient {}", ticket.patient_id);
                    self.state = LoadState::Found(HealthReport::from_record(&record));
                    self.record = Some(record);
                }
                None => {
                    warn!("No record found for patient {}", ticket.patient_id);
                    self.state = LoadState::NotFound;
                }
            },
            Err(err) => {
                error!(
                    "Failed to fetch report for patient {}: {}",
                    ticket.patient_id, err
                );
                self.state = LoadState::NotFound;
            }
        }

        Applied::Applied
    }

    /// Mounts the page and runs a full load synchronously.
    pub fn load(&mut self) -> Result<&LoadState, Navigation> {
        let ticket = self.begin_load()?;
        let result = self.fetch(&ticket);
        self.complete_load(&ticket, result);
        Ok(&self.state)
    }

    /// Unmounts the page, invalidating outstanding tickets and discarding the report.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
        self.state = LoadState::Loading;
        self.record = None;
    }
}
