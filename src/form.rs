use std::path::{Path, PathBuf};
use std::time::Duration;

use mime::Mime;

use crate::field::{FieldMap, FieldValue};
use crate::file::Upload;
use crate::Result;

/// Metadata about one completed parse.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    /// Wall-clock time spent parsing.
    pub elapsed: Duration,
    /// Total part bytes read.
    pub bytes: u64,
    /// Non-file fields seen.
    pub fields: usize,
    /// Files seen.
    pub files: usize,
    /// Parts seen.
    pub parts: usize,
}

/// One request's parsed multipart body: the extension surface handed to
/// downstream handlers.
#[derive(Debug)]
pub struct Form {
    fields: FieldMap,
    uploads: Vec<Upload>,
    stats: Stats,
}

impl Form {
    pub(crate) fn new(fields: FieldMap, uploads: Vec<Upload>, stats: Stats) -> Self {
        Self {
            fields,
            uploads,
            stats,
        }
    }

    /// The non-file fields.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// First-arrived value of a field, if present.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields.value(name)
    }

    /// Every value of a field, in arrival order. Empty when absent.
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.fields.get(name).map(FieldValue::all).unwrap_or_default()
    }

    /// Every upload, in arrival order.
    pub fn uploads(&self) -> &[Upload] {
        &self.uploads
    }

    /// First upload carried by the named field.
    pub fn upload(&self, name: &str) -> Option<&Upload> {
        self.uploads
            .iter()
            .find(|upload| upload.field_name() == name)
    }

    /// Every upload carried by the named field.
    pub fn uploads_named(&self, name: &str) -> Vec<&Upload> {
        self.uploads
            .iter()
            .filter(|upload| upload.field_name() == name)
            .collect()
    }

    /// Whether any file arrived at all.
    pub fn has_uploads(&self) -> bool {
        !self.uploads.is_empty()
    }

    /// Every upload whose content type matches, parameters ignored.
    pub fn uploads_of_type(&self, content_type: &Mime) -> Vec<&Upload> {
        self.uploads
            .iter()
            .filter(|upload| upload.content_type().essence_str() == content_type.essence_str())
            .collect()
    }

    /// Parse metadata.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Writes every upload under `dir/<original filename>`, creating the
    /// directory if absent, and returns the written paths. Path-bearing
    /// filenames are reduced to their final component; an upload with no
    /// usable filename falls back to its field name.
    pub async fn save_all(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;

        let mut saved = Vec::with_capacity(self.uploads.len());
        for upload in &self.uploads {
            let name = Path::new(upload.file_name())
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(upload.field_name()));
            let dest = dir.join(name);

            upload.save_to(&dest).await?;
            saved.push(dest);
        }

        Ok(saved)
    }

    /// Deletes every temp path, best-effort. Failures are swallowed; the
    /// partial file is simply left behind.
    pub async fn cleanup(&self) {
        for upload in &self.uploads {
            let Some(path) = upload.temp_path() else {
                continue;
            };
            if let Err(err) = tokio::fs::remove_file(path).await {
                tracing::debug!(path = %path.display(), %err, "failed to remove temp file");
            }
        }
    }
}
