//! Multipart form-data extraction and filesystem route discovery for
//! hyper-style services.
//!
//! Two independent plugins live here. The multipart half adapts whatever
//! request shape the host hands over into one canonical byte stream, drives
//! [`multer`] over it with limits and validation applied, and produces a
//! per-request [`Form`] extension. The routing half walks a directory at
//! startup and turns file names into URL patterns (`index` collapses to the
//! directory root, `$name` becomes `:name`).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bytes::Bytes;
//! use futures_util::stream;
//! use http::{header, HeaderMap, HeaderValue};
//!
//! use form_routes::{FormConfig, FormSession, RequestSource};
//!
//! # async fn run() -> Result<(), form_routes::Error> {
//! let config = Arc::new(FormConfig::new());
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(
//!     header::CONTENT_TYPE,
//!     HeaderValue::from_static("multipart/form-data; boundary=AaB03x"),
//! );
//!
//! let body = concat!(
//!     "--AaB03x\r\n",
//!     "Content-Disposition: form-data; name=\"title\"\r\n\r\n",
//!     "hello\r\n",
//!     "--AaB03x--\r\n",
//! );
//! let stream = stream::once(async move { Ok::<_, std::io::Error>(Bytes::from(body)) });
//!
//! let form = FormSession::new(config)
//!     .parse(RequestSource::from_stream(headers, stream))
//!     .await?;
//!
//! assert_eq!(form.value("title"), Some("hello"));
//! # Ok(())
//! # }
//! ```
//!
//! ```
//! use std::path::Path;
//!
//! use form_routes::url_path;
//!
//! let root = Path::new("routes");
//! let url = url_path(&root.join("users/$userId.html"), root, &["html"]).unwrap();
//! assert_eq!(url.as_deref(), Some("/users/:userId"));
//! ```

#![forbid(unsafe_code)]
#![deny(nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

mod adapter;
mod config;
mod error;
mod field;
mod file;
mod form;
mod limits;
mod routes;
mod session;

pub use adapter::{AdaptedRequest, BodyStream, RequestSource};

pub use config::{FileHandler, FormConfig, StorageMode, Validator};

pub use error::{BoxError, Error, ErrorResponse, RouteError};

pub use field::{FieldMap, FieldValue};

pub use file::{FileMeta, Upload};

pub use form::{Form, Stats};

pub use limits::Limits;

pub use routes::{url_path, Route, RouteDiscovery, DEFAULT_EXTENSIONS};

pub use session::FormSession;

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;
