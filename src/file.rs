use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use mime::Mime;

/// What the injected validator sees about a file part, before its body is
/// read.
#[derive(Debug, Clone)]
pub struct FileMeta {
    /// Name of the form field carrying the file.
    pub field_name: String,
    /// Client-supplied filename.
    pub file_name: String,
    /// Declared content type; `application/octet-stream` when the part
    /// carried none.
    pub content_type: Mime,
}

/// Where one upload's bytes ended up. A descriptor holds exactly one of
/// the two, decided by the session's storage mode.
#[derive(Debug, Clone)]
enum UploadBody {
    Buffer(Bytes),
    TempPath(PathBuf),
}

/// One uploaded file after processing.
///
/// Immutable once produced by a session; reading its content goes through
/// [`Upload::contents`], which materializes a buffer lazily for
/// temp-file-backed uploads.
#[derive(Debug, Clone)]
pub struct Upload {
    field_name: String,
    file_name: String,
    content_type: Mime,
    encoding: Option<String>,
    size: u64,
    body: UploadBody,
}

impl Upload {
    /// Creates an in-memory descriptor.
    pub fn from_buffer(
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Mime,
        buffer: impl Into<Bytes>,
    ) -> Self {
        let buffer = buffer.into();
        Self {
            field_name: field_name.into(),
            file_name: file_name.into(),
            content_type,
            encoding: None,
            size: buffer.len() as u64,
            body: UploadBody::Buffer(buffer),
        }
    }

    /// Creates a descriptor backed by an already-written temp file.
    pub fn from_temp_path(
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Mime,
        size: u64,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            file_name: file_name.into(),
            content_type,
            encoding: None,
            size,
            body: UploadBody::TempPath(path.into()),
        }
    }

    /// Records the part's transfer encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding.replace(encoding.into());
        self
    }

    /// Name of the form field that carried this file.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Client-supplied filename.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Declared content type.
    pub fn content_type(&self) -> &Mime {
        &self.content_type
    }

    /// Transfer encoding of the part, when one was declared.
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Total bytes read for this file.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Lower-cased filename extension, without the dot.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// The in-memory buffer, when the session ran in memory mode.
    pub fn buffer(&self) -> Option<&Bytes> {
        match &self.body {
            UploadBody::Buffer(buffer) => Some(buffer),
            UploadBody::TempPath(_) => None,
        }
    }

    /// The temp path, when the session spilled to disk.
    pub fn temp_path(&self) -> Option<&Path> {
        match &self.body {
            UploadBody::Buffer(_) => None,
            UploadBody::TempPath(path) => Some(path),
        }
    }

    /// Whether the bytes live in memory rather than on disk.
    pub fn is_in_memory(&self) -> bool {
        matches!(self.body, UploadBody::Buffer(_))
    }

    /// The file's bytes, read back from disk if necessary.
    pub async fn contents(&self) -> io::Result<Bytes> {
        match &self.body {
            UploadBody::Buffer(buffer) => Ok(buffer.clone()),
            UploadBody::TempPath(path) => Ok(tokio::fs::read(path).await?.into()),
        }
    }

    /// Writes the file's bytes to `dest`, returning how many were written.
    pub async fn save_to(&self, dest: impl AsRef<Path>) -> io::Result<u64> {
        let dest = dest.as_ref();
        match &self.body {
            UploadBody::Buffer(buffer) => {
                tokio::fs::write(dest, buffer).await?;
                Ok(buffer.len() as u64)
            }
            UploadBody::TempPath(path) => tokio::fs::copy(path, dest).await,
        }
    }
}
