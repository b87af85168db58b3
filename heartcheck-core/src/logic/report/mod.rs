//! Report Module - downloadable prediction report
//!
//! Output is always an in-memory PDF; nothing is written to disk.

pub mod layout;
pub mod pdf;

use chrono::{Local, NaiveDateTime};
use thiserror::Error;

use crate::logic::model::RiskLabel;
pub use layout::{display_key, title_case, ReportLayout};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

/// `At Risk (Confidence: 87.50%)`
pub fn risk_summary(label: RiskLabel, confidence: f64) -> String {
    format!("{} (Confidence: {:.2}%)", label, confidence)
}

/// Render a report stamped with the current local time.
/// Fields are listed in slice order.
pub fn render<K, V>(
    input_fields: &[(K, V)],
    label: RiskLabel,
    confidence: f64,
) -> Result<Vec<u8>, ReportError>
where
    K: AsRef<str>,
    V: ToString,
{
    render_at(input_fields, label, confidence, Local::now().naive_local())
}

/// Render a report with an explicit generation time
pub fn render_at<K, V>(
    input_fields: &[(K, V)],
    label: RiskLabel,
    confidence: f64,
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>, ReportError>
where
    K: AsRef<str>,
    V: ToString,
{
    let layout = ReportLayout::build(
        input_fields,
        &risk_summary(label, confidence),
        generated_at,
    );

    let bytes = pdf::write_pdf(&layout)?;
    log::debug!("Rendered report: {} bytes, {} fields", bytes.len(), input_fields.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::logic::features::FeatureVectorBuilder;

    fn at(second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(12, 30, second).unwrap()
    }

    #[test]
    fn test_risk_summary_format() {
        assert_eq!(risk_summary(RiskLabel::AtRisk, 87.5), "At Risk (Confidence: 87.50%)");
        assert_eq!(risk_summary(RiskLabel::LowRisk, 63.456), "Low Risk (Confidence: 63.46%)");
    }

    #[test]
    fn test_render_produces_pdf() {
        let fields = FeatureVectorBuilder::new().age(52.0).build().to_report_fields();
        let bytes = render(&fields, RiskLabel::LowRisk, 71.2).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_at_is_byte_identical() {
        let fields = FeatureVectorBuilder::new().age(52.0).chol(200.0).build().to_report_fields();

        let a = render_at(&fields, RiskLabel::AtRisk, 90.0, at(0)).unwrap();
        // Cross a wall-clock second so a clock-derived date would differ
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let b = render_at(&fields, RiskLabel::AtRisk, 90.0, at(0)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_render_at_stamps_generation_time() {
        let fields = [("age", "52")];
        let bytes = render_at(&fields, RiskLabel::LowRisk, 60.0, at(7)).unwrap();
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.contains("D:20250601123007+00'00'"));
        assert_ne!(bytes, render_at(&fields, RiskLabel::LowRisk, 60.0, at(8)).unwrap());
    }

    #[test]
    fn test_layout_differs_only_in_timestamp_line() {
        let fields = FeatureVectorBuilder::new().age(52.0).build().to_report_fields();
        let summary = risk_summary(RiskLabel::AtRisk, 90.0);

        let a = ReportLayout::build(&fields, &summary, at(0));
        let c = ReportLayout::build(&fields, &summary, at(1));

        let (la, lc) = (a.text_lines(), c.text_lines());
        let differing: Vec<usize> = (0..la.len()).filter(|&i| la[i] != lc[i]).collect();
        assert_eq!(differing, vec![2]);
    }

    #[test]
    fn test_multi_page_render() {
        let fields: Vec<(String, String)> =
            (0..80).map(|i| (format!("extra_field_{}", i), i.to_string())).collect();
        let bytes = render_at(&fields, RiskLabel::AtRisk, 99.0, at(0)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
