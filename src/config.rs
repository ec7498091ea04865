//! Runtime configuration for the report loader and exporter.
//!
//! Values start from built-in defaults and may be overridden through environment variables.
//! Command line flags take precedence over both and are applied by the binary.

use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable holding the patient data endpoint.
pub const ENDPOINT_VAR: &str = "LIVER_REPORT_ENDPOINT";
/// Environment variable holding the HTTP timeout in seconds.
pub const TIMEOUT_VAR: &str = "LIVER_REPORT_TIMEOUT_SECS";
/// Environment variable holding the directory exported reports are written to.
pub const OUTPUT_DIR_VAR: &str = "LIVER_REPORT_OUTPUT_DIR";

/// Endpoint used when no override is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/patients";
/// Request timeout used when no override is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings consumed by [`crate::source::HttpPatientSource`] and [`crate::export::ReportExporter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    /// Read endpoint that accepts a `patient_id` query parameter.
    pub endpoint: String,
    /// Timeout applied to the single fetch.
    pub timeout_secs: u64,
    /// Directory the PDF report is saved into.
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ReportConfig {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup. Blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(endpoint) = read(ENDPOINT_VAR) {
            config.endpoint = validate_endpoint(ENDPOINT_VAR, endpoint)?;
        }

        if let Some(raw) = read(TIMEOUT_VAR) {
            config.timeout_secs = match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        var: TIMEOUT_VAR,
                        value: raw,
                    })
                }
            };
        }

        if let Some(dir) = read(OUTPUT_DIR_VAR) {
            config.output_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

/// Checks that `value` looks like an http(s) URL and strips trailing slashes.
pub fn validate_endpoint(var: &'static str, value: String) -> Result<String, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.trim_end_matches('/').to_owned())
    } else {
        Err(ConfigError::InvalidEndpoint { var, value })
    }
}
