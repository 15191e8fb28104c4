use std::sync::Arc;
use std::time::Instant;

use bytes::BytesMut;
use multer::Multipart;
use tokio::io::AsyncWriteExt;

use crate::adapter::RequestSource;
use crate::config::{FormConfig, StorageMode};
use crate::field::FieldMap;
use crate::file::{FileMeta, Upload};
use crate::form::{Form, Stats};
use crate::{Error, Result};

const CONTENT_TRANSFER_ENCODING: &str = "content-transfer-encoding";

/// One request's worth of multipart processing.
///
/// A session owns no state across requests; the shared [`FormConfig`] is
/// read-only. Concurrent sessions never observe each other.
pub struct FormSession {
    config: Arc<FormConfig>,
}

impl FormSession {
    /// Creates a session over a shared configuration.
    pub fn new(config: Arc<FormConfig>) -> Self {
        Self { config }
    }

    /// Drives the wrapped parser over the adapted request to completion.
    ///
    /// Any limit violation, allow-list rejection, validator refusal, or
    /// parser-level error rejects the whole parse; partial results are
    /// discarded, never returned.
    pub async fn parse(&self, source: RequestSource) -> Result<Form> {
        let started = Instant::now();

        let adapted = source.adapt();
        let boundary = adapted.boundary()?;
        tracing::debug!(%boundary, "multipart session started");

        let limits = &self.config.limits;
        let mut multipart = Multipart::new(adapted.body, boundary);

        let mut fields = FieldMap::new();
        let mut uploads: Vec<Upload> = Vec::new();
        let mut bytes_read: u64 = 0;
        let mut parts = 0;
        let mut field_count = 0;
        let mut file_count = 0;

        while let Some(mut part) = multipart.next_field().await? {
            parts += 1;
            if let Some(max) = limits.exceeded_parts(parts) {
                return Err(Error::PartsTooMany(max));
            }

            let name = part.name().unwrap_or_default().to_owned();
            if let Some(max) = limits.exceeded_field_name_size(name.len()) {
                return Err(Error::FieldNameTooLong(max));
            }

            let Some(file_name) = part.file_name().map(str::to_owned) else {
                field_count += 1;
                if let Some(max) = limits.exceeded_fields(field_count) {
                    return Err(Error::FieldsTooMany(max));
                }

                let mut value = BytesMut::new();
                while let Some(chunk) = part.chunk().await? {
                    if let Some(max) = limits.exceeded_field_size(value.len() + chunk.len()) {
                        return Err(Error::FieldTooLarge(max));
                    }
                    value.extend_from_slice(&chunk);
                }

                bytes_read += value.len() as u64;
                tracing::trace!(field = %name, bytes = value.len(), "field part read");
                fields.push(name, String::from_utf8_lossy(&value).into_owned());
                continue;
            };

            file_count += 1;
            if let Some(max) = limits.exceeded_files(file_count) {
                return Err(Error::FilesTooMany(max));
            }

            let content_type = part
                .content_type()
                .cloned()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM);

            // reject before the body is buffered
            self.config.check_content_type(&content_type)?;
            self.config.check_extension(&file_name)?;

            if let Some(validator) = &self.config.validator {
                let meta = FileMeta {
                    field_name: name.clone(),
                    file_name: file_name.clone(),
                    content_type: content_type.clone(),
                };
                validator(meta)
                    .await
                    .map_err(|err| Error::ValidationFailed(err.to_string()))?;
            }

            let encoding = part
                .headers()
                .get(CONTENT_TRANSFER_ENCODING)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            let mut upload = match self.config.storage {
                StorageMode::Memory => {
                    let mut buffer = BytesMut::new();
                    while let Some(chunk) = part.chunk().await? {
                        if let Some(max) = limits.exceeded_file_size(buffer.len() + chunk.len()) {
                            return Err(Error::FileTooLarge(max));
                        }
                        buffer.extend_from_slice(&chunk);
                    }

                    bytes_read += buffer.len() as u64;
                    Upload::from_buffer(name.as_str(), file_name.as_str(), content_type, buffer.freeze())
                }
                StorageMode::TempFile => {
                    tokio::fs::create_dir_all(&self.config.temp_dir).await?;
                    let (file, path) = tempfile::Builder::new()
                        .prefix("form-routes-")
                        .tempfile_in(&self.config.temp_dir)?
                        .keep()
                        .map_err(|err| Error::Io(err.error))?;
                    tracing::debug!(path = %path.display(), "spilling file part");

                    let mut file = tokio::fs::File::from_std(file);
                    let mut size = 0;
                    while let Some(chunk) = part.chunk().await? {
                        if let Some(max) = limits.exceeded_file_size(size + chunk.len()) {
                            return Err(Error::FileTooLarge(max));
                        }
                        size += chunk.len();
                        file.write_all(&chunk).await?;
                    }
                    file.flush().await?;

                    bytes_read += size as u64;
                    Upload::from_temp_path(name.as_str(), file_name.as_str(), content_type, size as u64, path)
                }
            };

            if let Some(encoding) = encoding {
                upload = upload.with_encoding(encoding);
            }

            if let Some(handler) = &self.config.on_file {
                upload = handler(upload).await.map_err(Error::Internal)?;
            }

            tracing::trace!(field = %name, file = %file_name, bytes = upload.size(), "file part read");
            uploads.push(upload);
        }

        let stats = Stats {
            elapsed: started.elapsed(),
            bytes: bytes_read,
            fields: field_count,
            files: file_count,
            parts,
        };
        tracing::debug!(parts, bytes = bytes_read, "multipart session finished");

        Ok(Form::new(fields, uploads, stats))
    }
}
