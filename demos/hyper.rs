//!
//! run it
//!
//! ```
//! $ RUST_LOG=debug cargo run --example hyper
//! ```
//!
//! then upload something
//!
//! ```
//! $ curl http://127.0.0.1:3000 -F title=demo -F file=@README.md
//! ```
//!

#![deny(warnings)]

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use form_routes::{FormConfig, FormSession, RequestSource, StorageMode};

async fn upload(
    config: Arc<FormConfig>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>> {
    let session = FormSession::new(config);

    match session.parse(RequestSource::from_request(req)).await {
        Ok(form) => {
            let mut txt = String::new();

            for (name, value) in form.fields().iter() {
                txt.push_str(&format!("text {} {}\r\n", name, value.first().len()));
            }
            for upload in form.uploads() {
                txt.push_str(&format!("file {} {}\r\n", upload.field_name(), upload.size()));
            }

            form.cleanup().await;

            Ok(Response::new(Full::new(Bytes::from(txt))))
        }
        Err(err) => {
            let body = format!("{} {}\r\n", err.code(), err);
            Ok(Response::builder()
                .status(err.status())
                .body(Full::new(Bytes::from(body)))?)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Arc::new(FormConfig::new().storage(StorageMode::TempFile));

    let addr: SocketAddr = ([127, 0, 0, 1], 3000).into();
    let listener = TcpListener::bind(addr).await?;
    println!("Listening on http://{}", addr);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let config = config.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req| upload(config.clone(), req));
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                eprintln!("connection error: {}", err);
            }
        });
    }
}
