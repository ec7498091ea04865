//! Loads a patient's liver health report, renders it and exports it as a PDF.
//!
//! The pipeline runs in one direction: a [`loader::ReportPage`] fetches the
//! record for the session's patient through a [`source::PatientSource`] and
//! derives a [`model::HealthReport`]; [`render`] turns that into a visual tree;
//! [`export::ReportExporter`] writes the fixed-layout PDF.

pub mod builder;
pub mod config;
pub mod elements;
pub mod error;
pub mod export;
pub mod fonts;
pub mod loader;
pub mod model;
pub mod record;
pub mod render;
pub mod richtext;
pub mod risk;
pub mod session;
pub mod source;
