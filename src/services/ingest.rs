use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Pdf,
}

impl DocumentKind {
    pub fn from_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "txt" | "md" => Some(DocumentKind::Text),
            "pdf" => Some(DocumentKind::Pdf),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub name: String,
    pub reason: String,
}

/// Combined reference text plus a record of what made it in.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub material: String,
    pub accepted: Vec<String>,
    pub skipped: Vec<SkippedDocument>,
}

impl IngestReport {
    pub fn is_empty(&self) -> bool {
        self.material.is_empty()
    }

    /// Length of the combined material in characters.
    pub fn char_count(&self) -> usize {
        self.material.chars().count()
    }

    fn skip(&mut self, name: &str, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!("Skipping reference document '{}': {}", name, reason);
        self.skipped.push(SkippedDocument {
            name: name.to_string(),
            reason,
        });
    }
}

/// UTF-8 first, Latin-1 otherwise (every byte sequence is valid Latin-1).
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Page texts, each followed by a newline.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| AppError::Ingest("PDF parser crashed on this file".to_string()))?
        .map_err(|e| anyhow::anyhow!("could not read PDF: {}", e))?;

    Ok(pages.iter().map(|page| format!("{}\n", page)).collect())
}

/// Extracts text from one document.
///
/// `Ok(None)` means the file type is not supported.
pub fn extract_text(name: &str, bytes: &[u8]) -> Result<Option<String>> {
    match DocumentKind::from_name(name) {
        Some(DocumentKind::Text) => Ok(Some(decode_text(bytes))),
        Some(DocumentKind::Pdf) => extract_pdf_text(bytes).map(Some),
        None => Ok(None),
    }
}

fn wrap_document(name: &str, text: &str) -> String {
    format!(
        "\n--- Start of Reference Document: {name} ---\n{text}\n--- End of Reference Document: {name} ---\n"
    )
}

/// Turns named byte buffers into one reference-material string.
pub fn ingest_documents<I>(documents: I) -> IngestReport
where
    I: IntoIterator<Item = (String, Vec<u8>)>,
{
    let mut report = IngestReport::default();

    for (name, bytes) in documents {
        match extract_text(&name, &bytes) {
            Ok(Some(text)) if !text.trim().is_empty() => {
                tracing::info!(
                    "Processed '{}': {} characters",
                    name,
                    text.chars().count()
                );
                report.material.push_str(&wrap_document(&name, &text));
                report.accepted.push(name);
            }
            Ok(Some(_)) => report.skip(&name, "no text could be extracted"),
            Ok(None) => report.skip(
                &name,
                "unsupported file type (only .txt, .md and .pdf are supported)",
            ),
            Err(e) => report.skip(&name, e.to_string()),
        }
    }

    report
}

/// Reads files from disk and ingests them. Unreadable files are skipped.
pub async fn ingest_paths(paths: &[PathBuf]) -> IngestReport {
    let mut documents = Vec::with_capacity(paths.len());
    let mut unreadable = Vec::new();

    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match tokio::fs::read(path).await {
            Ok(bytes) => documents.push((name, bytes)),
            Err(e) => unreadable.push((name, e)),
        }
    }

    let mut report = ingest_documents(documents);
    for (name, e) in unreadable {
        report.skip(&name, format!("could not read file: {}", e));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn recognises_supported_extensions() {
        assert_eq!(DocumentKind::from_name("notes.TXT"), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::from_name("readme.md"), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::from_name("paper.Pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_name("sheet.xlsx"), None);
        assert_eq!(DocumentKind::from_name("Makefile"), None);
    }

    #[test]
    fn falls_back_to_latin1() {
        assert_eq!(decode_text("café".as_bytes()), "café");
        assert_eq!(decode_text(&[0x63, 0x61, 0x66, 0xE9]), "café");
    }

    #[test]
    fn wraps_each_document_with_delimiters() {
        let report = ingest_documents(vec![
            ("a.txt".to_string(), b"Alpha".to_vec()),
            ("b.md".to_string(), b"# Beta".to_vec()),
        ]);

        assert_eq!(
            report.material,
            "\n--- Start of Reference Document: a.txt ---\nAlpha\n--- End of Reference Document: a.txt ---\n\
             \n--- Start of Reference Document: b.md ---\n# Beta\n--- End of Reference Document: b.md ---\n"
        );
        assert_eq!(report.accepted, vec!["a.txt", "b.md"]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn skips_unsupported_empty_and_broken_files() {
        let report = ingest_documents(vec![
            ("data.csv".to_string(), b"a,b".to_vec()),
            ("blank.txt".to_string(), b"  \n".to_vec()),
            ("broken.pdf".to_string(), b"definitely not a pdf".to_vec()),
            ("ok.txt".to_string(), b"kept".to_vec()),
        ]);

        assert_eq!(report.accepted, vec!["ok.txt"]);
        let skipped: Vec<&str> = report.skipped.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(skipped, vec!["data.csv", "blank.txt", "broken.pdf"]);
        assert!(report.skipped[0].reason.contains("unsupported"));
        assert!(report.material.contains("kept"));
        assert!(!report.material.contains("a,b"));
    }

    /// Minimal PDF with one Helvetica text line per page.
    fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let kids: Vec<String> = (0..pages.len())
            .map(|i| format!("{} 0 R", 4 + 2 * i))
            .collect();
        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                pages.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];
        for (i, text) in pages.iter().enumerate() {
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                5 + 2 * i
            ));
            let content = format!("BT /F1 24 Tf 72 720 Td ({}) Tj ET", text);
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                content.len(),
                content
            ));
        }

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }
        let xref = out.len();
        out.extend_from_slice(
            format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes(),
        );
        for offset in offsets {
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref
            )
            .as_bytes(),
        );
        out
    }

    #[test]
    fn pdf_pages_are_joined_in_order() {
        let bytes = pdf_with_pages(&["Alpha page", "Beta page"]);
        let report = ingest_documents(vec![("report.pdf".to_string(), bytes)]);

        assert_eq!(report.accepted, vec!["report.pdf"]);
        assert!(report.skipped.is_empty());

        let material = &report.material;
        let start = material
            .find("--- Start of Reference Document: report.pdf ---\n")
            .unwrap();
        let alpha = material.find("Alpha page").unwrap();
        let beta = material.find("Beta page").unwrap();
        let end = material
            .find("--- End of Reference Document: report.pdf ---")
            .unwrap();
        assert!(start < alpha && alpha < beta && beta < end);
        assert!(material[alpha..beta].contains('\n'));
    }

    #[test]
    fn each_pdf_page_ends_with_newline() {
        let text = extract_pdf_text(&pdf_with_pages(&["One", "Two", "Three"])).unwrap();
        assert!(text.ends_with('\n'));
        assert!(text.find("One").unwrap() < text.find("Two").unwrap());
        assert!(text.find("Two").unwrap() < text.find("Three").unwrap());
        assert!(text.matches('\n').count() >= 3);
    }

    #[test]
    fn nothing_usable_gives_empty_material() {
        let report = ingest_documents(vec![("x.docx".to_string(), vec![1, 2, 3])]);
        assert!(report.is_empty());
        assert_eq!(report.char_count(), 0);
    }

    #[tokio::test]
    async fn reads_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "Tidal range varies by coastline.").unwrap();
        let missing = dir.path().join("missing.md");

        let report = ingest_paths(&[notes, missing]).await;
        assert_eq!(report.accepted, vec!["notes.txt"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "missing.md");
        assert!(report
            .material
            .contains("--- Start of Reference Document: notes.txt ---"));
    }
}
