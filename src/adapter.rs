use std::io;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, BoxStream, StreamExt};
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use http_body::Body;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::BodyExt;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;

use crate::error::BoxError;
use crate::{Error, Result};

/// Canonical request body: a push-based stream of byte chunks.
pub type BodyStream = BoxStream<'static, io::Result<Bytes>>;

type BoxedBody = UnsyncBoxBody<Bytes, BoxError>;

/// Read size for the pull-to-push bridge.
const BRIDGE_CHUNK: usize = 8 * 1024;

/// In-flight chunks the bridge holds before the pump suspends.
const BRIDGE_DEPTH: usize = 4;

/// The closed set of request shapes the multipart plugin accepts.
///
/// A value is resolved exactly once per request by [`RequestSource::adapt`]
/// into a canonical `(headers, byte stream)` pair. Header keys are
/// lower-cased by [`http::HeaderMap`] on construction for every shape.
pub enum RequestSource {
    /// Headers plus an already push-based chunk stream.
    Stream {
        /// Request headers.
        headers: HeaderMap,
        /// Body chunks.
        body: BodyStream,
    },
    /// A framework request wrapping an [`http_body::Body`].
    Request(http::Request<BoxedBody>),
    /// A pull-based reader, pumped into a push stream by a bridge task.
    Reader {
        /// Request headers.
        headers: HeaderMap,
        /// Body bytes.
        reader: Pin<Box<dyn AsyncRead + Send>>,
    },
}

impl RequestSource {
    /// Wraps headers and a chunk stream.
    pub fn from_stream<S, E>(headers: HeaderMap, stream: S) -> Self
    where
        S: stream::Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Self::Stream {
            headers,
            body: stream
                .map(|chunk| chunk.map_err(|err| io::Error::new(io::ErrorKind::Other, err.into())))
                .boxed(),
        }
    }

    /// Wraps a framework request, erasing its body type.
    pub fn from_request<B>(request: http::Request<B>) -> Self
    where
        B: Body + Send + 'static,
        B::Data: Into<Bytes>,
        B::Error: Into<BoxError>,
    {
        Self::Request(request.map(|body| {
            body.map_frame(|frame| frame.map_data(Into::into))
                .map_err(Into::into)
                .boxed_unsync()
        }))
    }

    /// Wraps headers and a pull-based reader.
    pub fn from_reader<R>(headers: HeaderMap, reader: R) -> Self
    where
        R: AsyncRead + Send + 'static,
    {
        Self::Reader {
            headers,
            reader: Box::pin(reader),
        }
    }

    /// Resolves this source into its canonical form, wiring streams as
    /// needed. Pure stream plumbing; content inspection happens on the
    /// adapted value.
    pub fn adapt(self) -> AdaptedRequest {
        match self {
            Self::Stream { headers, body } => AdaptedRequest { headers, body },
            Self::Request(request) => {
                let (parts, body) = request.into_parts();
                AdaptedRequest {
                    headers: parts.headers,
                    body: frame_stream(body),
                }
            }
            Self::Reader { headers, reader } => AdaptedRequest {
                headers,
                body: bridge(reader),
            },
        }
    }
}

/// A request reduced to the one shape the session consumes.
pub struct AdaptedRequest {
    /// Request headers, keys lower-cased.
    pub headers: HeaderMap,
    /// Canonical body stream.
    pub body: BodyStream,
}

impl AdaptedRequest {
    /// Extracts the multipart boundary, or fails for a request this plugin
    /// cannot consume. A missing or non-multipart content type is fatal for
    /// the request, never for the host.
    pub fn boundary(&self) -> Result<String> {
        let content_type = self
            .headers
            .get(CONTENT_TYPE)
            .ok_or(Error::UnsupportedRequest("missing `content-type` header"))?
            .to_str()
            .map_err(|_| Error::UnsupportedRequest("malformed `content-type` header"))?;

        if !content_type
            .trim_start()
            .to_ascii_lowercase()
            .starts_with("multipart/form-data")
        {
            return Err(Error::UnsupportedRequest(
                "content type is not `multipart/form-data`",
            ));
        }

        Ok(multer::parse_boundary(content_type)?)
    }
}

/// Flattens body frames into data chunks, dropping trailers.
fn frame_stream(body: BoxedBody) -> BodyStream {
    http_body_util::BodyStream::new(body)
        .filter_map(|frame| async move {
            match frame {
                Ok(frame) => frame
                    .into_data()
                    .ok()
                    .map(Ok),
                Err(err) => Some(Err(io::Error::new(io::ErrorKind::Other, err))),
            }
        })
        .boxed()
}

/// Pumps a pull-based reader into a bounded channel until exhaustion or
/// error. Dropping the consuming stream closes the channel, which stops
/// the pump at its next send.
fn bridge(mut reader: Pin<Box<dyn AsyncRead + Send>>) -> BodyStream {
    let (tx, rx) = mpsc::channel::<io::Result<Bytes>>(BRIDGE_DEPTH);

    tokio::spawn(async move {
        loop {
            let mut buf = BytesMut::with_capacity(BRIDGE_CHUNK);
            match reader.read_buf(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    tracing::trace!("bridged {} bytes", n);
                    if tx.send(Ok(buf.freeze())).await.is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx.send(Err(err)).await;
                    break;
                }
            }
        }
    });

    stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (chunk, rx))
    })
    .boxed()
}
