//! Text extractor. Pulls plain text out of an uploaded PDF resume.
//!
//! Pages are concatenated in document order by `pdf-extract`; the result is trimmed.
//! The parser is not panic-free on malformed input, so every call is wrapped in
//! `catch_unwind` and a panic surfaces as `ExtractionError::Panicked`.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::debug;

use crate::matching::error::ExtractionError;

const PDF_MAGIC: &[u8] = b"%PDF-";
/// Readers accept the header anywhere in the first KiB.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Extracts text from an in-memory PDF.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
    if !has_pdf_header(pdf_bytes) {
        return Err(ExtractionError::NotPdf);
    }

    let text = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(pdf_bytes)
    }))
    .map_err(|_| ExtractionError::Panicked)?
    .map_err(|e| ExtractionError::Parse(e.to_string()))?;

    let text = text.trim().to_string();
    debug!(
        bytes = pdf_bytes.len(),
        chars = text.chars().count(),
        "Extracted resume text"
    );
    Ok(text)
}

/// Reads a PDF from disk and extracts its text.
pub fn extract_text_from_path(path: &Path) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path)?;
    extract_text(&bytes)
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

/// Hand-assembled PDFs for tests: one Helvetica text line per page, valid xref.
#[cfg(test)]
pub(crate) mod fixtures {
    pub(crate) fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let page_count = pages.len();
        let font_id = 3 + 2 * page_count;
        let kids: Vec<String> = (0..page_count).map(|i| format!("{} 0 R", 3 + 2 * i)).collect();

        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!("<< /Type /Pages /Kids [{}] /Count {page_count} >>", kids.join(" ")),
        ];
        for (i, text) in pages.iter().enumerate() {
            let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 {font_id} 0 R >> >> /Contents {} 0 R >>",
                4 + 2 * i
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ));
        }
        objects.push(
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        );

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
        }

        let xref_offset = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }
}
