//! Custom `genpdf` elements used by the report exporter.

use genpdf::error::{Error, ErrorKind};
use genpdf::style::Style;
use genpdf::{render, Element, Mm, Position, RenderResult, Size};

use crate::export::PlannedPage;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

/// Prints pre-positioned lines, one planned page per rendered PDF page.
///
/// Each call to [`Element::render`] consumes the next planned page and reports
/// `has_more` while pages remain, which makes `genpdf` start a fresh page and
/// call the element again. A line that does not fit on the page fails the render
/// instead of being dropped.
pub struct ReportSheet {
    pages: Vec<PlannedPage>,
    next_page: usize,
}

impl ReportSheet {
    /// Creates a sheet that renders `pages` in order.
    pub fn new(pages: Vec<PlannedPage>) -> Self {
        Self {
            pages,
            next_page: 0,
        }
    }

    /// Number of PDF pages the sheet produces.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl Element for ReportSheet {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let Some(page) = self.pages.get(self.next_page) else {
            return Ok(result);
        };
        self.next_page += 1;

        let mut bottom = Mm::default();
        for line in page.lines() {
            let styled = line.to_span().to_styled_string();
            let line_style = style.and(styled.style);
            let top = mm_from_f64(line.y_mm);

            let mut section = area
                .text_section(
                    &context.font_cache,
                    Position::new(mm_from_f64(line.x_mm), top),
                    line_style,
                )
                .ok_or_else(|| {
                    Error::new(
                        format!(
                            "Line at {} mm does not fit on the page: {}",
                            line.y_mm, line.text
                        ),
                        ErrorKind::PageSizeExceeded,
                    )
                })?;
            section.print_str(&styled.s, line_style)?;

            bottom = bottom.max(top + line_style.line_height(&context.font_cache));
        }

        result.size = Size::new(area.size().width, bottom);
        result.has_more = self.next_page < self.pages.len();
        Ok(result)
    }
}
