//! Docx text extraction.
//!
//! A docx file is a ZIP of XML parts; `docx-rs` gives us the typed tree:
//! Document → Paragraph → Run → Text. Only top-level paragraphs are read.
//! Tables, headers and footers are not.

use std::path::{Path, PathBuf};

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a valid .docx document: {0}")]
    Parse(String),

    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Returns the text of every non-blank paragraph in the docx at `path`,
/// one paragraph per line.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    let text = text_from_docx(&bytes)?;
    debug!(
        "Extracted {} chars from {}: {}...",
        text.len(),
        path.display(),
        text.chars().take(200).collect::<String>()
    );
    Ok(text)
}

/// Runs [`extract_text`] on the blocking pool.
pub async fn extract_text_blocking(path: PathBuf) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || extract_text(&path))
        .await
        .map_err(|e| ExtractError::Task(e.to_string()))?
}

pub fn text_from_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractError::Parse(format!("{e:?}")))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut out = String::new();
    push_children(&para.children, &mut out);
    out
}

fn push_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for rc in &run.children {
                    match rc {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children(&link.children, out),
            _ => {}
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::Cursor;

    /// Builds docx bytes with one paragraph per entry.
    pub(crate) fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for text in paragraphs {
            let para = if text.is_empty() {
                Paragraph::new()
            } else {
                Paragraph::new().add_run(Run::new().add_text(*text))
            };
            docx = docx.add_paragraph(para);
        }
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).expect("pack docx");
        cursor.into_inner()
    }

    #[test]
    fn test_one_line_per_paragraph_in_order() {
        let bytes = docx_bytes(&["First point", "Second point", "Third point"]);
        let text = text_from_docx(&bytes).unwrap();
        assert_eq!(text, "First point\nSecond point\nThird point");
    }

    #[test]
    fn test_blank_paragraphs_are_skipped() {
        let bytes = docx_bytes(&["Intro", "", "   ", "Body", ""]);
        let text = text_from_docx(&bytes).unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["Intro", "Body"]);
    }

    #[test]
    fn test_multiple_runs_are_concatenated() {
        let para = Paragraph::new()
            .add_run(Run::new().add_text("Quarterly "))
            .add_run(Run::new().add_text("report"));
        let mut cursor = Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(para)
            .build()
            .pack(&mut cursor)
            .expect("pack docx");

        let text = text_from_docx(cursor.get_ref()).unwrap();
        assert_eq!(text, "Quarterly report");
    }

    #[test]
    fn test_empty_document_yields_empty_text() {
        let bytes = docx_bytes(&[]);
        assert_eq!(text_from_docx(&bytes).unwrap(), "");
    }

    #[test]
    fn test_non_docx_bytes_are_parse_error() {
        let err = text_from_docx(b"plain text, not a zip").unwrap_err();
        assert!(matches!(err, ExtractError::Parse(_)));
    }

    #[test]
    fn test_extract_text_reads_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.docx");
        std::fs::write(&path, docx_bytes(&["Alpha", "Beta"])).unwrap();

        assert_eq!(extract_text(&path).unwrap(), "Alpha\nBeta");
    }

    #[test]
    fn test_extract_text_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_text(&dir.path().join("gone.docx")).unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }

    #[tokio::test]
    async fn test_extract_text_blocking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.docx");
        std::fs::write(&path, docx_bytes(&["Gamma"])).unwrap();

        assert_eq!(extract_text_blocking(path).await.unwrap(), "Gamma");
    }
}
