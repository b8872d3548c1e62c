/// Attachment storage on disk
///
/// Uploaded files land in the configured upload directory under a
/// uuid-prefixed name, and are referenced in the database as relative URLs
/// (`/uploads/<name>`). Deleting an attachment removes both the reference
/// and the file. Filenames extracted from stored URLs are sanitized to a
/// bare file name so references can never reach outside the directory.

use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

/// URL prefix under which stored files are served
pub const URL_PREFIX: &str = "/uploads";

pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Opens the store, creating the directory if needed
    pub async fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes an uploaded file and returns its relative URL
    ///
    /// The stored name is `<uuid>-<original>` with the original reduced to
    /// its final path component.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> std::io::Result<String> {
        let base = sanitize_filename(original_name);
        let stored = format!("{}-{}", Uuid::new_v4(), base);

        tokio::fs::write(self.dir.join(&stored), data).await?;
        Ok(format!("{}/{}", URL_PREFIX, stored))
    }

    /// Deletes the file a stored attachment URL points at
    ///
    /// A missing file is not an error; the reference removal is what
    /// matters and the file may already be gone.
    pub async fn delete_by_url(&self, url: &str) {
        let name = sanitize_filename(url);
        if name.is_empty() {
            return;
        }

        if let Err(e) = tokio::fs::remove_file(self.dir.join(&name)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(file = %name, error = %e, "failed to delete attachment file");
            }
        }
    }
}

/// Reduces a name or URL to its final path component, dropping traversal
fn sanitize_filename(input: &str) -> String {
    input
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .replace("..", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_paths() {
        assert_eq!(sanitize_filename("/uploads/abc-report.pdf"), "abc-report.pdf");
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
        assert_eq!(sanitize_filename("..\\..\\evil.sh"), "evil.sh");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
    }

    #[tokio::test]
    async fn test_save_and_delete_roundtrip() {
        let dir = std::env::temp_dir().join(format!("tempo-uploads-{}", Uuid::new_v4()));
        let store = UploadStore::new(&dir).await.unwrap();

        let url = store.save("notes.txt", b"hello").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-notes.txt"));

        let name = url.strip_prefix("/uploads/").unwrap();
        assert!(dir.join(name).exists());

        store.delete_by_url(&url).await;
        assert!(!dir.join(name).exists());

        // deleting again is a no-op
        store.delete_by_url(&url).await;

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
