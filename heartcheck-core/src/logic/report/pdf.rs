//! PDF serialization via printpdf (builtin Helvetica, no embedded fonts)
//!
//! Output is a pure function of the layout: document dates come from the
//! layout's generation time and the trailer `/ID` from its text.

use std::io::BufWriter;
use printpdf::{BuiltinFont, Mm, OffsetDateTime, PdfDocument};

use super::layout::{ReportLayout, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use super::ReportError;

/// printpdf writes both trailer ids as 32-byte literal strings
const TRAILER_ID_LEN: usize = 32;

/// Render a laid-out report to PDF bytes
pub fn write_pdf(layout: &ReportLayout) -> Result<Vec<u8>, ReportError> {
    let pages = layout.paginate();

    // Wall-clock time stamped as UTC; only used as a fixed document date
    let stamp = OffsetDateTime::from_unix_timestamp(layout.generated_at.and_utc().timestamp())
        .map_err(|e| ReportError::Pdf(format!("timestamp error: {e}")))?;

    let (doc, first_page, first_layer) = PdfDocument::new(
        &layout.title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let doc = doc
        .with_creation_date(stamp)
        .with_mod_date(stamp)
        .with_metadata_date(stamp);

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?;

    let mut targets = vec![(first_page, first_layer)];
    for index in 1..pages.len() {
        targets.push(doc.add_page(
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            format!("Page {}", index + 1),
        ));
    }

    for (runs, (page, layer)) in pages.iter().zip(targets) {
        let layer = doc.get_page(page).get_layer(layer);

        for run in runs {
            let face = if run.bold { &bold } else { &font };
            layer.use_text(run.text.as_str(), run.size, Mm(run.x_mm), Mm(run.y_mm), face);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(format!("save error: {e}")))?;
    let mut bytes = buf
        .into_inner()
        .map_err(|e| ReportError::Pdf(format!("buffer error: {e}")))?;

    stamp_trailer_id(&mut bytes, &document_id(layout))?;
    Ok(bytes)
}

/// Content-derived id, so equal layouts produce equal documents
fn document_id(layout: &ReportLayout) -> String {
    let mut hasher = crc32fast::Hasher::new();
    for line in layout.text_lines() {
        hasher.update(line.as_bytes());
        hasher.update(&[0]);
    }
    format!("{:08x}", hasher.finalize()).repeat(TRAILER_ID_LEN / 8)
}

/// Overwrite both strings of the trailer `/ID` pair in place.
/// Lengths are unchanged, so xref offsets stay valid.
fn stamp_trailer_id(bytes: &mut [u8], id: &str) -> Result<(), ReportError> {
    let missing = || ReportError::Pdf("trailer /ID not found".to_string());

    let mut cursor = bytes
        .windows(3)
        .rposition(|w| w == b"/ID")
        .ok_or_else(missing)?;

    for _ in 0..2 {
        let open = bytes[cursor..]
            .iter()
            .position(|&b| b == b'(')
            .map(|offset| cursor + offset + 1)
            .ok_or_else(missing)?;
        let close = open + TRAILER_ID_LEN;
        if bytes.get(close) != Some(&b')') {
            return Err(ReportError::Pdf("unexpected trailer /ID length".to_string()));
        }

        bytes[open..close].copy_from_slice(id.as_bytes());
        cursor = close;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_trailer_id_replaces_both_ids() {
        let random_a = "A".repeat(TRAILER_ID_LEN);
        let random_b = "B".repeat(TRAILER_ID_LEN);
        let mut bytes = format!("%PDF-1.3\ntrailer\n<</ID[({})({})]/Size 4>>", random_a, random_b)
            .into_bytes();
        let id = "0123abcd".repeat(4);

        stamp_trailer_id(&mut bytes, &id).unwrap();

        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, format!("%PDF-1.3\ntrailer\n<</ID[({id})({id})]/Size 4>>"));
    }

    #[test]
    fn test_stamp_trailer_id_requires_trailer() {
        let mut bytes = b"%PDF-1.3\n%%EOF".to_vec();
        assert!(stamp_trailer_id(&mut bytes, &"0".repeat(TRAILER_ID_LEN)).is_err());
    }
}
