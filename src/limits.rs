use serde::{Deserialize, Serialize};

/// Caps applied to an incoming multipart body.
///
/// A `None` cap is unlimited. Every cap checks the running total as parts
/// arrive, so a violating request is rejected before the rest of its body
/// is consumed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Limits {
    /// Longest accepted field name, in bytes
    pub field_name_size: Option<usize>,
    /// Largest accepted non-file field value, in bytes
    pub field_size: Option<usize>,
    /// Most non-file fields accepted in one request
    pub fields: Option<usize>,
    /// Largest accepted file, in bytes
    pub file_size: Option<usize>,
    /// Most files accepted in one request
    pub files: Option<usize>,
    /// Most parts (fields + files) accepted in one request
    pub parts: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            field_name_size: Some(Self::DEFAULT_FIELD_NAME_SIZE),
            field_size: Some(Self::DEFAULT_FIELD_SIZE),
            fields: None,
            file_size: Some(Self::DEFAULT_FILE_SIZE),
            files: None,
            parts: Some(Self::DEFAULT_PARTS),
        }
    }
}

impl Limits {
    /// Default field name cap, 100 bytes.
    pub const DEFAULT_FIELD_NAME_SIZE: usize = 100;

    /// Default field value cap, 1MB.
    pub const DEFAULT_FIELD_SIZE: usize = 1024 * 1024;

    /// Default file cap, 10MB.
    pub const DEFAULT_FILE_SIZE: usize = 10 * 1024 * 1024;

    /// Default part cap, 1000.
    pub const DEFAULT_PARTS: usize = 1000;

    /// Caps field name length.
    #[must_use]
    pub fn field_name_size(mut self, max: usize) -> Self {
        self.field_name_size.replace(max);
        self
    }

    /// Caps field value size.
    #[must_use]
    pub fn field_size(mut self, max: usize) -> Self {
        self.field_size.replace(max);
        self
    }

    /// Caps the number of non-file fields.
    #[must_use]
    pub fn fields(mut self, max: usize) -> Self {
        self.fields.replace(max);
        self
    }

    /// Caps file size.
    #[must_use]
    pub fn file_size(mut self, max: usize) -> Self {
        self.file_size.replace(max);
        self
    }

    /// Caps the number of files.
    #[must_use]
    pub fn files(mut self, max: usize) -> Self {
        self.files.replace(max);
        self
    }

    /// Caps the number of parts.
    #[must_use]
    pub fn parts(mut self, max: usize) -> Self {
        self.parts.replace(max);
        self
    }

    /// Returns the violated part cap, if `total` exceeds it.
    pub(crate) fn exceeded_parts(&self, total: usize) -> Option<usize> {
        self.parts.filter(|max| total > *max)
    }

    /// Returns the violated field-count cap, if `total` exceeds it.
    pub(crate) fn exceeded_fields(&self, total: usize) -> Option<usize> {
        self.fields.filter(|max| total > *max)
    }

    /// Returns the violated file-count cap, if `total` exceeds it.
    pub(crate) fn exceeded_files(&self, total: usize) -> Option<usize> {
        self.files.filter(|max| total > *max)
    }

    /// Returns the violated file-size cap, if `size` exceeds it.
    pub(crate) fn exceeded_file_size(&self, size: usize) -> Option<usize> {
        self.file_size.filter(|max| size > *max)
    }

    /// Returns the violated field-size cap, if `size` exceeds it.
    pub(crate) fn exceeded_field_size(&self, size: usize) -> Option<usize> {
        self.field_size.filter(|max| size > *max)
    }

    /// Returns the violated name-length cap, if `len` exceeds it.
    pub(crate) fn exceeded_field_name_size(&self, len: usize) -> Option<usize> {
        self.field_name_size.filter(|max| len > *max)
    }
}
