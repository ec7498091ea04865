//! Error types shared by the loader, the exporter and the configuration layer.

use std::io;

use thiserror::Error;

/// Failures raised while requesting patient records from a [`crate::source::PatientSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("patient data service is not reachable at {0}")]
    Connection(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("patient data service returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("malformed patient records: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failures raised while rendering or writing the PDF report.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to render PDF document: {0}")]
    Pdf(#[from] genpdf::error::Error),

    #[error("failed to write report file: {0}")]
    Io(#[from] io::Error),
}

/// Invalid values supplied through the environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidEndpoint { var: &'static str, value: String },
}
