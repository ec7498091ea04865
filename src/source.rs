//! Data sources the report page reads patient records from.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use serde_json::Value;

use crate::config::ReportConfig;
use crate::error::SourceError;
use crate::record::PatientRecord;
use crate::session::PatientId;

/// Query parameter carrying the patient identifier.
pub const PATIENT_QUERY_PARAM: &str = "patient_id";

/// A read-only provider of patient records scoped by identifier.
pub trait PatientSource {
    /// Returns every record matching `patient_id`. Callers only use the first one.
    fn fetch(&self, patient_id: &PatientId) -> Result<Vec<PatientRecord>, SourceError>;
}

impl<T: PatientSource + ?Sized> PatientSource for Box<T> {
    fn fetch(&self, patient_id: &PatientId) -> Result<Vec<PatientRecord>, SourceError> {
        (**self).fetch(patient_id)
    }
}

/// Decodes a JSON array of records.
///
/// The body must be an array. Elements that are not records (strings, numbers,
/// nested arrays) are skipped with a warning so they cannot hide valid ones.
pub fn decode_records(body: &str) -> Result<Vec<PatientRecord>, SourceError> {
    let values: Vec<Value> =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Skipping malformed patient record at index {}: {}", index, err);
                None
            }
        })
        .collect())
}

/// Remote data service reached over HTTP.
pub struct HttpPatientSource {
    endpoint: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpPatientSource {
    /// Creates a client for the endpoint and timeout in `config`.
    pub fn new(config: &ReportConfig) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))?;

        Ok(Self::with_client(&config.endpoint, client, config.timeout_secs))
    }

    fn with_client(endpoint: &str, client: reqwest::blocking::Client, timeout_secs: u64) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            client,
            timeout_secs,
        }
    }

    /// Returns the endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PatientSource for HttpPatientSource {
    fn fetch(&self, patient_id: &PatientId) -> Result<Vec<PatientRecord>, SourceError> {
        debug!("Requesting patient {} from {}", patient_id, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[(PATIENT_QUERY_PARAM, patient_id.as_str())])
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    SourceError::Connection(self.endpoint.clone())
                } else if e.is_timeout() {
                    SourceError::Timeout(self.timeout_secs)
                } else {
                    SourceError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .map_err(|e| SourceError::Http(e.to_string()))?;
        decode_records(&body)
    }
}

/// Records stored as a JSON array on disk, filtered by identifier on every fetch.
pub struct FilePatientSource {
    path: PathBuf,
}

impl FilePatientSource {
    /// Creates a source reading from `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PatientSource for FilePatientSource {
    fn fetch(&self, patient_id: &PatientId) -> Result<Vec<PatientRecord>, SourceError> {
        let body = fs::read_to_string(&self.path)?;
        let records = decode_records(&body)?;
        Ok(records
            .into_iter()
            .filter(|record| record.id.as_deref().map(str::trim) == Some(patient_id.as_str()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use super::*;
    use crate::loader::{LoadState, ReportPage};
    use crate::session::Session;

    /// Serves one HTTP response on a loopback port and returns the request line it received.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let endpoint = format!(
            "http://{}/api/patients",
            listener.local_addr().expect("local addr")
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("request line");
            loop {
                let mut header = String::new();
                let read = reader.read_line(&mut header).expect("header line");
                if read == 0 || header == "\r\n" {
                    break;
                }
            }

            write!(
                stream,
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            )
            .expect("write response");
            request_line.trim_end().to_owned()
        });

        (endpoint, handle)
    }

    fn loopback_source(endpoint: &str) -> HttpPatientSource {
        let client = reqwest::blocking::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("client builds");
        HttpPatientSource::with_client(endpoint, client, 5)
    }

    fn patient(id: &str) -> PatientId {
        PatientId::parse(id).expect("valid id")
    }

    #[test]
    fn http_fetch_sends_patient_query_and_decodes_array() {
        let (endpoint, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"[{"id":7,"name":"Ann","age":45.5,"riskScore":"72"}]"#,
        );

        let records = loopback_source(&endpoint)
            .fetch(&patient("p-1"))
            .expect("fetch succeeds");

        assert_eq!(
            server.join().expect("server thread"),
            "GET /api/patients?patient_id=p-1 HTTP/1.1"
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_deref(), Some("7"));
        assert_eq!(records[0].age, Some(45));
        assert_eq!(records[0].risk_score, Some(72.0));
    }

    #[test]
    fn http_error_status_maps_to_status_error() {
        let (endpoint, server) = serve_once("HTTP/1.1 404 Not Found", r#"{"error":"missing"}"#);

        let err = loopback_source(&endpoint)
            .fetch(&patient("p-404"))
            .unwrap_err();
        server.join().expect("server thread");

        match err {
            SourceError::Status { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("missing"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[test]
    fn http_body_drives_page_state() {
        let (endpoint, server) = serve_once("HTTP/1.1 200 OK", r#"[{"name":"Ann"}]"#);
        let mut page = ReportPage::new(
            loopback_source(&endpoint),
            Session::for_patient(patient("p-1")),
        );
        page.load().expect("patient in session");
        server.join().expect("server thread");
        assert_eq!(page.report().map(|r| r.patient_name()), Some("Ann"));

        let (endpoint, server) = serve_once("HTTP/1.1 404 Not Found", "");
        let mut page = ReportPage::new(
            loopback_source(&endpoint),
            Session::for_patient(patient("p-1")),
        );
        page.load().expect("patient in session");
        server.join().expect("server thread");
        assert_eq!(page.state(), &LoadState::NotFound);
    }

    #[test]
    fn decode_skips_elements_that_are_not_records() {
        let records =
            decode_records(r#"[{"id":"p-1","name":"First"},"junk",42,{"id":"p-1"}]"#)
                .expect("decodes");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.as_deref(), Some("First"));
    }

    #[test]
    fn decode_tolerates_loosely_typed_fields() {
        let records = decode_records(r#"[{"id":42,"age":45.0,"riskScore":"72"}]"#)
            .expect("decodes");
        assert_eq!(records[0].id.as_deref(), Some("42"));
        assert_eq!(records[0].age, Some(45));
        assert_eq!(records[0].risk_score, Some(72.0));
    }

    #[test]
    fn decode_rejects_non_array_payloads() {
        let err = decode_records(r#"{"id":"p-1"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn decode_accepts_partial_records() {
        let records = decode_records(r#"[{"id":"p-1"},{"name":"Second"}]"#).expect("decodes");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name.as_deref(), Some("Second"));
    }

    #[test]
    fn file_source_filters_by_identifier() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[{{"id":"p-1","name":"One"}},{{"id":"p-2","name":"Two"}}]"#
        )
        .expect("write records");

        let source = FilePatientSource::new(file.path());
        let records = source
            .fetch(&PatientId::parse("p-2").unwrap())
            .expect("fetch");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("Two"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let source = FilePatientSource::new("/nonexistent/patients.json");
        let err = source.fetch(&PatientId::parse("p-1").unwrap()).unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[test]
    fn http_source_normalizes_endpoint() {
        let config = ReportConfig {
            endpoint: "http://127.0.0.1:9/api/patients/".into(),
            ..ReportConfig::default()
        };
        let source = HttpPatientSource::new(&config).expect("client builds");
        assert_eq!(source.endpoint(), "http://127.0.0.1:9/api/patients");
    }
}
