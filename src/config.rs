use std::env;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use mime::Mime;

use crate::error::BoxError;
use crate::file::{FileMeta, Upload};
use crate::limits::Limits;
use crate::{Error, Result};

/// Injected asynchronous predicate, run per file part before its body is
/// read. Rejecting aborts the whole parse.
pub type Validator =
    Arc<dyn Fn(FileMeta) -> BoxFuture<'static, std::result::Result<(), BoxError>> + Send + Sync>;

/// Injected asynchronous hook that may replace a produced [`Upload`]
/// wholesale.
pub type FileHandler =
    Arc<dyn Fn(Upload) -> BoxFuture<'static, std::result::Result<Upload, BoxError>> + Send + Sync>;

/// Where file bodies accumulate: one choice per session, never per file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Concatenate chunks into an in-memory buffer.
    #[default]
    Memory,
    /// Spill chunks to a freshly created file under the temp directory.
    TempFile,
}

/// Plugin configuration, constructed once at registration time and shared
/// by `Arc` into every request-scoped session.
#[derive(Clone)]
pub struct FormConfig {
    pub(crate) limits: Limits,
    pub(crate) storage: StorageMode,
    pub(crate) temp_dir: PathBuf,
    pub(crate) allowed_mime_types: Vec<Mime>,
    pub(crate) allowed_extensions: Vec<String>,
    pub(crate) validator: Option<Validator>,
    pub(crate) on_file: Option<FileHandler>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            storage: StorageMode::default(),
            temp_dir: env::temp_dir(),
            allowed_mime_types: Vec::new(),
            allowed_extensions: Vec::new(),
            validator: None,
            on_file: None,
        }
    }
}

impl FormConfig {
    /// Creates a configuration with default limits, in-memory storage, and
    /// no restrictions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the part limits.
    #[must_use]
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the storage mode.
    #[must_use]
    pub fn storage(mut self, storage: StorageMode) -> Self {
        self.storage = storage;
        self
    }

    /// Sets the directory temp files are created under. Created on demand
    /// if absent. Defaults to the system temp directory.
    #[must_use]
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    /// Restricts accepted content types. An empty list accepts all.
    #[must_use]
    pub fn allow_mime_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = Mime>,
    {
        self.allowed_mime_types = types.into_iter().collect();
        self
    }

    /// Restricts accepted filename extensions, compared without the dot
    /// and case-insensitively. An empty list accepts all.
    #[must_use]
    pub fn allow_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions = extensions
            .into_iter()
            .map(|ext| ext.into().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Installs an async per-file validator.
    #[must_use]
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(FileMeta) -> BoxFuture<'static, std::result::Result<(), BoxError>>
            + Send
            + Sync
            + 'static,
    {
        self.validator.replace(Arc::new(validator));
        self
    }

    /// Installs an async hook that may replace each produced descriptor.
    #[must_use]
    pub fn on_file<F>(mut self, handler: F) -> Self
    where
        F: Fn(Upload) -> BoxFuture<'static, std::result::Result<Upload, BoxError>>
            + Send
            + Sync
            + 'static,
    {
        self.on_file.replace(Arc::new(handler));
        self
    }

    pub(crate) fn check_content_type(&self, content_type: &Mime) -> Result<()> {
        if self.allowed_mime_types.is_empty()
            || self
                .allowed_mime_types
                .iter()
                .any(|allowed| allowed.essence_str() == content_type.essence_str())
        {
            Ok(())
        } else {
            Err(Error::InvalidContentType(
                content_type.essence_str().to_owned(),
            ))
        }
    }

    pub(crate) fn check_extension(&self, file_name: &str) -> Result<()> {
        if self.allowed_extensions.is_empty() {
            return Ok(());
        }

        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if self.allowed_extensions.contains(&extension) {
            Ok(())
        } else {
            Err(Error::InvalidExtension(extension))
        }
    }
}

impl fmt::Debug for FormConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormConfig")
            .field("limits", &self.limits)
            .field("storage", &self.storage)
            .field("temp_dir", &self.temp_dir)
            .field("allowed_mime_types", &self.allowed_mime_types)
            .field("allowed_extensions", &self.allowed_extensions)
            .field("validator", &self.validator.is_some())
            .field("on_file", &self.on_file.is_some())
            .finish()
    }
}
