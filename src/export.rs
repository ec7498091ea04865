//! PDF export of a loaded report.
//!
//! Export happens in two steps. [`ReportLayout::plan`] walks the report with a
//! running vertical cursor and produces fixed-position lines grouped into pages;
//! [`render_pdf`] prints those lines through [`ReportSheet`]. All coordinates are
//! millimetres measured from the top-left corner of an A4 page.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::builder::ReportDocumentBuilder;
use crate::config::ReportConfig;
use crate::elements::ReportSheet;
use crate::error::ExportError;
use crate::loader::ReportPage;
use crate::model::HealthReport;
use crate::render::{FINDINGS_TITLE, NEXT_STEPS_TITLE, RECOMMENDATIONS_TITLE};
use crate::richtext::Span;
use crate::session::PatientId;
use crate::source::PatientSource;

/// Title printed at the top of the document.
pub const REPORT_TITLE: &str = "Liver Health Report";

/// Prefix of every exported file name.
pub const FILE_NAME_PREFIX: &str = "liver-health-report-";
/// Stem used when no patient identifier is available.
pub const FALLBACK_FILE_STEM: &str = "report";

const LEFT_MM: f64 = 20.0;
const ITEM_LEFT_MM: f64 = 25.0;
const TITLE_TOP_MM: f64 = 20.0;
const FIELDS_TOP_MM: f64 = 40.0;
const SECTIONS_TOP_MM: f64 = 90.0;
/// Cursor advance after every emitted line.
pub const LINE_HEIGHT_MM: f64 = 10.0;
/// Extra cursor advance after each section.
pub const SECTION_GAP_MM: f64 = 10.0;
/// Height of the A4 paper the document is rendered on.
pub const PAGE_HEIGHT_MM: f64 = 297.0;
/// Lowest cursor position that still fits on an A4 page.
pub const PAGE_BOTTOM_MM: f64 = PAGE_HEIGHT_MM - 20.0;
const CONTINUATION_TOP_MM: f64 = 20.0;

const TITLE_FONT_SIZE: u8 = 20;
const HEADING_FONT_SIZE: u8 = 16;
const BODY_FONT_SIZE: u8 = 12;

/// Kind of a planned line, which determines its font.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineRole {
    Title,
    Field,
    Heading,
    Item,
}

impl LineRole {
    fn font_size(self) -> u8 {
        match self {
            LineRole::Title => TITLE_FONT_SIZE,
            LineRole::Heading => HEADING_FONT_SIZE,
            LineRole::Field | LineRole::Item => BODY_FONT_SIZE,
        }
    }

    fn is_bold(self) -> bool {
        matches!(self, LineRole::Title | LineRole::Heading)
    }
}

/// A single line of text at a fixed position.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    pub role: LineRole,
    pub text: String,
    pub x_mm: f64,
    pub y_mm: f64,
}

impl PlacedLine {
    /// Returns the styled span the line is printed with.
    pub fn to_span(&self) -> Span {
        let span = Span::new(self.text.clone()).sized(self.role.font_size());
        if self.role.is_bold() {
            span.bold()
        } else {
            span
        }
    }
}

/// Lines belonging to one PDF page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlannedPage {
    lines: Vec<PlacedLine>,
}

impl PlannedPage {
    /// Returns the lines in emission order.
    pub fn lines(&self) -> &[PlacedLine] {
        &self.lines
    }
}

struct Cursor {
    pages: Vec<PlannedPage>,
    y_mm: f64,
    bottom_mm: f64,
}

impl Cursor {
    fn new(bottom_mm: f64) -> Self {
        Self {
            pages: vec![PlannedPage::default()],
            y_mm: TITLE_TOP_MM,
            bottom_mm,
        }
    }

    fn move_to(&mut self, y_mm: f64) {
        self.y_mm = y_mm;
    }

    fn emit(&mut self, role: LineRole, x_mm: f64, text: String) {
        if self.y_mm > self.bottom_mm {
            self.pages.push(PlannedPage::default());
            self.y_mm = CONTINUATION_TOP_MM;
        }

        let page = self.pages.last_mut().expect("cursor always holds a page");
        page.lines.push(PlacedLine {
            role,
            text,
            x_mm,
            y_mm: self.y_mm,
        });
        self.y_mm += LINE_HEIGHT_MM;
    }

    fn gap(&mut self) {
        self.y_mm += SECTION_GAP_MM;
    }
}

/// Fixed-position layout of a report, split into pages.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportLayout {
    pages: Vec<PlannedPage>,
}

impl ReportLayout {
    /// Plans `report` on A4 pages, starting a new page whenever the cursor passes
    /// [`PAGE_BOTTOM_MM`].
    pub fn plan(report: &HealthReport) -> Self {
        let mut cursor = Cursor::new(PAGE_BOTTOM_MM);

        cursor.emit(LineRole::Title, LEFT_MM, REPORT_TITLE.to_owned());

        cursor.move_to(FIELDS_TOP_MM);
        let fields = [
            format!("Patient Name: {}", report.patient_name()),
            format!("Age: {}", report.age()),
            format!("Assessment Date: {}", report.assessment_date()),
            format!("Risk Score: {}%", report.risk_score()),
        ];
        for field in fields {
            cursor.emit(LineRole::Field, LEFT_MM, field);
        }

        cursor.move_to(SECTIONS_TOP_MM);
        let sections = [
            (FINDINGS_TITLE, report.findings()),
            (RECOMMENDATIONS_TITLE, report.recommendations()),
            (NEXT_STEPS_TITLE, report.next_steps()),
        ];
        for (title, items) in sections {
            cursor.emit(LineRole::Heading, LEFT_MM, title.to_owned());
            for item in items {
                cursor.emit(LineRole::Item, ITEM_LEFT_MM, format!("• {}", item));
            }
            cursor.gap();
        }

        Self {
            pages: cursor.pages,
        }
    }

    /// Returns the planned pages.
    pub fn pages(&self) -> &[PlannedPage] {
        &self.pages
    }

    /// Iterates over every line across all pages.
    pub fn lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.pages.iter().flat_map(|page| page.lines.iter())
    }

    /// Returns the section headings in document order.
    pub fn headings(&self) -> Vec<&str> {
        self.lines()
            .filter(|line| line.role == LineRole::Heading)
            .map(|line| line.text.as_str())
            .collect()
    }

    fn into_pages(self) -> Vec<PlannedPage> {
        self.pages
    }
}

/// File name of the exported report for `patient_id`.
pub fn report_file_name(patient_id: Option<&PatientId>) -> String {
    let stem = patient_id.map_or(FALLBACK_FILE_STEM, PatientId::as_str);
    format!("{}{}.pdf", FILE_NAME_PREFIX, stem)
}

/// Renders `report` into PDF bytes using `builder` for the document settings.
pub fn render_pdf_with(
    report: &HealthReport,
    builder: ReportDocumentBuilder,
) -> Result<Vec<u8>, ExportError> {
    let sheet = ReportSheet::new(ReportLayout::plan(report).into_pages());
    debug!("Rendering report across {} page(s)", sheet.page_count());

    let mut document = builder.with_title(REPORT_TITLE).build()?;
    document.push(sheet);

    let mut bytes = Vec::new();
    document.render(&mut bytes)?;
    Ok(bytes)
}

/// Renders `report` into PDF bytes with the default fonts.
pub fn render_pdf(report: &HealthReport) -> Result<Vec<u8>, ExportError> {
    render_pdf_with(report, ReportDocumentBuilder::new())
}

/// A report written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedReport {
    pub path: PathBuf,
    pub bytes_written: usize,
    pub pages: usize,
}

/// Saves reports into an output directory.
#[derive(Clone, Debug)]
pub struct ReportExporter {
    output_dir: PathBuf,
    fonts_dir: Option<PathBuf>,
}

impl ReportExporter {
    /// Creates an exporter writing into `output_dir`.
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            fonts_dir: None,
        }
    }

    /// Creates an exporter writing into the configured output directory.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(&config.output_dir)
    }

    /// Loads fonts from `dir` instead of the default search locations.
    pub fn with_fonts_dir(mut self, dir: impl Into<Option<PathBuf>>) -> Self {
        self.fonts_dir = dir.into();
        self
    }

    /// Exports `report` for `patient_id`.
    ///
    /// Returns `Ok(None)` without touching the file system when no report is loaded.
    pub fn export(
        &self,
        report: Option<&HealthReport>,
        patient_id: Option<&PatientId>,
    ) -> Result<Option<ExportedReport>, ExportError> {
        let Some(report) = report else {
            debug!("Export requested without a loaded report; nothing to do");
            return Ok(None);
        };

        let pages = ReportLayout::plan(report).pages().len();
        let builder = ReportDocumentBuilder::new().with_fonts_dir(self.fonts_dir.clone());
        let bytes = render_pdf_with(report, builder)?;

        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(report_file_name(patient_id));
        fs::write(&path, &bytes)?;
        info!("Saved {} ({} bytes)", path.display(), bytes.len());

        Ok(Some(ExportedReport {
            path,
            bytes_written: bytes.len(),
            pages,
        }))
    }

    /// Exports whatever report `page` currently shows, named after its session's patient.
    pub fn export_page<S: PatientSource>(
        &self,
        page: &ReportPage<S>,
    ) -> Result<Option<ExportedReport>, ExportError> {
        self.export(page.report(), page.session().patient_id())
    }
}
