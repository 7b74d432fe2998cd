//! Transient storage for uploaded documents.
//!
//! Each upload is written under a fresh UUID key so concurrent uploads with the
//! same name never share a path. The file lives as long as its [`StoredUpload`].

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

const FALLBACK_FILENAME: &str = "document";
/// Leaves room for the UUID prefix under the usual 255-byte name limit.
const MAX_FILENAME_BYTES: usize = 200;
/// Longest suffix treated as an extension when truncating.
const MAX_EXTENSION_BYTES: usize = 16;

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the upload directory if it does not exist yet.
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// Writes `bytes` to a unique path and returns the guard that owns it.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> std::io::Result<StoredUpload> {
        let filename = sanitize_filename(original_name);
        let path = self.dir.join(format!("{}-{}", Uuid::new_v4(), filename));
        tokio::fs::write(&path, bytes).await?;
        debug!("Stored upload {} at {}", filename, path.display());
        Ok(StoredUpload { filename, path })
    }
}

/// An uploaded document on disk. Dropping it deletes the file.
#[derive(Debug)]
pub struct StoredUpload {
    pub filename: String,
    pub path: PathBuf,
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove upload {}: {e}", self.path.display()),
        }
    }
}

/// Reduces a client-supplied filename to a safe ASCII name with no path parts.
///
/// Separators become spaces, whitespace runs become `_`, anything outside
/// `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` are trimmed.
/// Names longer than 200 bytes are cut, keeping the extension.
pub fn sanitize_filename(name: &str) -> String {
    let spaced: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        truncate_filename(trimmed)
    }
}

fn truncate_filename(name: &str) -> String {
    if name.len() <= MAX_FILENAME_BYTES {
        return name.to_string();
    }

    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 && name.len() - idx <= MAX_EXTENSION_BYTES => name.split_at(idx),
        _ => (name, ""),
    };

    let mut cut = MAX_FILENAME_BYTES - ext.len();
    while !stem.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{}", &stem[..cut], ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("report.docx"), "report.docx");
        assert_eq!(sanitize_filename("Q3-plan_v2.docx"), "Q3-plan_v2.docx");
    }

    #[test]
    fn test_sanitize_strips_path_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename(r"C:\Users\me\notes.docx"), "C_Users_me_notes.docx");
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize_filename("my  annual\treport.docx"), "my_annual_report.docx");
    }

    #[test]
    fn test_sanitize_drops_non_ascii_and_symbols() {
        assert_eq!(sanitize_filename("résumé (final)!.docx"), "rsum_final.docx");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_filename(""), "document");
        assert_eq!(sanitize_filename("..."), "document");
        assert_eq!(sanitize_filename("日本語"), "document");
    }

    #[test]
    fn test_sanitize_caps_long_names_and_keeps_extension() {
        let long = format!("{}.docx", "a".repeat(300));
        let name = sanitize_filename(&long);
        assert_eq!(name.len(), 200);
        assert!(name.ends_with(".docx"));
        assert!(name.starts_with("aaaa"));
    }

    #[test]
    fn test_sanitize_caps_long_names_without_extension() {
        let name = sanitize_filename(&"b".repeat(400));
        assert_eq!(name, "b".repeat(200));
    }

    #[tokio::test]
    async fn test_save_accepts_very_long_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let upload = store
            .save(&format!("{}.docx", "x".repeat(300)), b"bytes")
            .await
            .unwrap();
        assert!(upload.path.exists());
        assert!(upload.filename.ends_with(".docx"));
    }

    #[tokio::test]
    async fn test_save_uses_unique_paths_for_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let a = store.save("same.docx", b"one").await.unwrap();
        let b = store.save("same.docx", b"two").await.unwrap();

        assert_eq!(a.filename, "same.docx");
        assert_eq!(b.filename, "same.docx");
        assert_ne!(a.path, b.path);
        assert!(a.path.starts_with(dir.path()));
        assert_eq!(std::fs::read(&a.path).unwrap(), b"one");
        assert_eq!(std::fs::read(&b.path).unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let upload = store.save("gone.docx", b"bytes").await.unwrap();
        let path = upload.path.clone();
        assert!(path.exists());

        drop(upload);
        assert!(!path.exists());
    }

    #[test]
    fn test_ensure_dir_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("a").join("b"));
        store.ensure_dir().unwrap();
        assert!(store.dir().is_dir());
    }
}
