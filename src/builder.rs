//! Document construction for the PDF exporter.

use std::path::PathBuf;

use genpdf::error::Error;
use genpdf::{self, PaperSize};

use crate::fonts;

/// Builder for `genpdf::Document` instances pre-configured for the report.
///
/// Without an explicit font directory the fonts are resolved through
/// [`fonts::default_font_family`]. Pages are always A4, matching the page bottom
/// the layout plans against, and carry no decorator, so element positions are
/// measured from the top-left corner of the paper.
#[derive(Default)]
pub struct ReportDocumentBuilder {
    title: Option<String>,
    fonts_dir: Option<PathBuf>,
}

impl ReportDocumentBuilder {
    /// Creates a new builder instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Loads fonts from `dir` instead of searching the default locations.
    pub fn with_fonts_dir(mut self, dir: impl Into<Option<PathBuf>>) -> Self {
        self.fonts_dir = dir.into();
        self
    }

    /// Builds a fully configured `genpdf::Document` instance.
    pub fn build(self) -> Result<genpdf::Document, Error> {
        let font_family = match self.fonts_dir {
            Some(dir) => fonts::font_family_from_dir(&dir)?,
            None => fonts::default_font_family()?,
        };

        let mut document = genpdf::Document::new(font_family);
        document.set_paper_size(PaperSize::A4);

        if let Some(title) = self.title {
            document.set_title(title);
        }

        Ok(document)
    }
}
