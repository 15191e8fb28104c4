#![allow(dead_code)]

mod limited;
pub use limited::Limited;

use std::convert::Infallible;

use bytes::Bytes;
use futures_util::stream::{self, Stream};
use http::{header, HeaderMap, HeaderValue};

pub const BOUNDARY: &str = "----FormRoutesBoundary7MA4YWxk";

pub fn tracing_init() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // From env var: `RUST_LOG`
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

/// Headers of a multipart request using [`BOUNDARY`].
pub fn multipart_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&format!("multipart/form-data; boundary={BOUNDARY}")).unwrap(),
    );
    headers
}

/// Builds a CRLF-framed multipart body around [`BOUNDARY`].
pub struct Payload {
    buf: Vec<u8>,
}

impl Payload {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(
        mut self,
        name: &str,
        filename: &str,
        content_type: &str,
        contents: impl AsRef<[u8]>,
    ) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(contents.as_ref());
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn build(mut self) -> Bytes {
        self.buf
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.buf.into()
    }
}

/// The whole payload in one chunk.
pub fn one_chunk(payload: Bytes) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    stream::once(async move { Ok(payload) })
}
