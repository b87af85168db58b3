//! Report layout - positioned text, independent of the PDF backend
//!
//! Geometry mirrors a classic A4 form: 10 mm margins, 10 mm line cells,
//! a label column 50 mm wide, and a 20 mm bottom margin that triggers a
//! page break.

use chrono::NaiveDateTime;

use crate::constants::{REPORT_TITLE, TIMESTAMP_FORMAT};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const BOTTOM_MARGIN_MM: f32 = 20.0;
const CELL_HEIGHT_MM: f32 = 10.0;
const GAP_MM: f32 = 5.0;
const LABEL_WIDTH_MM: f32 = 50.0;
/// Baseline offset inside a 10 mm cell
const BASELINE_OFFSET_MM: f32 = 7.0;
/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_WIDTH_EM: f32 = 0.5;
const PT_TO_MM: f32 = 0.352_778;

const HEADING_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One text fragment within a line
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x_mm: f32,
    pub size: f32,
    pub bold: bool,
    pub align: Align,
}

impl TextRun {
    fn left(text: impl Into<String>, x_mm: f32, size: f32, bold: bool) -> Self {
        Self { text: text.into(), x_mm, size, bold, align: Align::Left }
    }

    fn centered(text: impl Into<String>, size: f32, bold: bool) -> Self {
        Self { text: text.into(), x_mm: 0.0, size, bold, align: Align::Center }
    }

    /// Left edge after alignment
    fn resolved_x(&self) -> f32 {
        match self.align {
            Align::Left => self.x_mm,
            Align::Center => {
                let width = self.text.chars().count() as f32 * self.size * PT_TO_MM * AVG_GLYPH_WIDTH_EM;
                ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_MM)
            }
        }
    }
}

/// A vertical slot: zero or more runs sharing a baseline
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub runs: Vec<TextRun>,
    pub height_mm: f32,
}

impl ReportLine {
    fn cell(runs: Vec<TextRun>) -> Self {
        Self { runs, height_mm: CELL_HEIGHT_MM }
    }

    fn gap() -> Self {
        Self { runs: Vec::new(), height_mm: GAP_MM }
    }
}

/// A run placed on a page; `y_mm` is the baseline measured from the bottom
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRun {
    pub text: String,
    pub x_mm: f32,
    pub y_mm: f32,
    pub size: f32,
    pub bold: bool,
}

/// The full report before pagination
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub title: String,
    pub generated_at: NaiveDateTime,
    /// Repeated at the top of every page
    pub page_header: Vec<ReportLine>,
    pub body: Vec<ReportLine>,
}

impl ReportLayout {
    /// Lay out a prediction report
    pub fn build<K, V>(
        input_fields: &[(K, V)],
        risk_text: &str,
        generated_at: NaiveDateTime,
    ) -> Self
    where
        K: AsRef<str>,
        V: ToString,
    {
        let page_header = vec![
            ReportLine::cell(vec![TextRun::centered(REPORT_TITLE, HEADING_SIZE, true)]),
            ReportLine::gap(),
        ];

        let mut body = vec![
            ReportLine::cell(vec![TextRun::left("Prediction Summary", MARGIN_MM, HEADING_SIZE, true)]),
            ReportLine::cell(vec![TextRun::left(
                format!("Report generated on: {}", generated_at.format(TIMESTAMP_FORMAT)),
                MARGIN_MM,
                BODY_SIZE,
                false,
            )]),
            ReportLine::gap(),
            ReportLine::cell(vec![
                TextRun::left("Overall Risk:", MARGIN_MM, BODY_SIZE, true),
                TextRun::left(risk_text, MARGIN_MM + LABEL_WIDTH_MM, BODY_SIZE, false),
            ]),
            ReportLine::gap(),
            ReportLine::cell(vec![TextRun::left("Patient Data Provided", MARGIN_MM, HEADING_SIZE, true)]),
        ];

        for (key, value) in input_fields {
            body.push(ReportLine::cell(vec![
                TextRun::left(format!("{}:", display_key(key.as_ref())), MARGIN_MM, BODY_SIZE, false),
                TextRun::left(value.to_string(), MARGIN_MM + LABEL_WIDTH_MM, BODY_SIZE, false),
            ]));
        }

        Self {
            title: REPORT_TITLE.to_string(),
            generated_at,
            page_header,
            body,
        }
    }

    /// Flow the body onto pages, breaking when a line would cross the
    /// bottom margin
    pub fn paginate(&self) -> Vec<Vec<PlacedRun>> {
        let limit = PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM;
        let mut pages: Vec<Vec<PlacedRun>> = Vec::new();
        let mut page = Vec::new();
        let mut top = self.place_header(&mut page);

        for line in &self.body {
            if top + line.height_mm > limit && !line.runs.is_empty() {
                pages.push(std::mem::take(&mut page));
                top = self.place_header(&mut page);
            }
            place_line(&mut page, line, top);
            top += line.height_mm;
        }

        pages.push(page);
        pages
    }

    fn place_header(&self, page: &mut Vec<PlacedRun>) -> f32 {
        let mut top = MARGIN_MM;
        for line in &self.page_header {
            place_line(page, line, top);
            top += line.height_mm;
        }
        top
    }

    /// Every piece of text in reading order
    pub fn text_lines(&self) -> Vec<String> {
        self.page_header
            .iter()
            .chain(self.body.iter())
            .filter(|line| !line.runs.is_empty())
            .map(|line| {
                line.runs
                    .iter()
                    .map(|r| r.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

fn place_line(page: &mut Vec<PlacedRun>, line: &ReportLine, top: f32) {
    let baseline = PAGE_HEIGHT_MM - (top + BASELINE_OFFSET_MM);
    for run in &line.runs {
        page.push(PlacedRun {
            text: run.text.clone(),
            x_mm: run.resolved_x(),
            y_mm: baseline,
            size: run.size,
            bold: run.bold,
        });
    }
}

/// `resting_bp` → `Resting Bp`
pub fn display_key(key: &str) -> String {
    title_case(&key.replace('_', " "))
}

/// Uppercase the first letter of every word, lowercase the rest.
/// A word starts after any non-alphabetic character.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for c in text.chars() {
        if previous_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_is_letter = c.is_alphabetic();
    }

    out
}
