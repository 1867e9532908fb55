//! Demo server on port 12345 with four worker threads.
//!
//! ```text
//! curl -d 'hello' http://127.0.0.1:12345/string
//! curl http://127.0.0.1:12345/info
//! curl http://127.0.0.1:12345/match/abc123
//! curl http://127.0.0.1:12345/index.html
//! ```
//!
//! Any other `GET` is served from the `web` directory under the working
//! directory.

use std::path::{Component, Path, PathBuf};

use http::StatusCode;
use mini_http::protocol::body::ReqBody;
use mini_http::protocol::{Request, ResponseWriter};
use mini_web::router::{Router, get, post};
use mini_web::{Fallback, Server};
use tracing::{Level, warn};
use tracing_subscriber::FmtSubscriber;

const WEB_ROOT: &str = "web";

fn echo_string(writer: &mut ResponseWriter, request: &Request) {
    let body = request.body().cloned().map(ReqBody::into_bytes).unwrap_or_default();
    writer.write_response(StatusCode::OK, &mime::TEXT_PLAIN_UTF_8, &body);
}

fn info(writer: &mut ResponseWriter, request: &Request) {
    let mut headers = request.headers().iter().collect::<Vec<_>>();
    headers.sort();
    let headers = headers.into_iter().map(|(key, value)| format!("{key}: {value}\n")).collect::<String>();

    let text = format!(
        "Request method: {}\nRequest path: {}\nHTTP version: {}\n{headers}",
        request.method(),
        request.path(),
        request.version()
    );

    writer.write_response(StatusCode::OK, &mime::TEXT_PLAIN_UTF_8, text.as_bytes());
}

fn match_id(writer: &mut ResponseWriter, request: &Request) {
    let id = request.path_match().get(1).unwrap_or_default();
    writer.write_response(StatusCode::OK, &mime::TEXT_PLAIN_UTF_8, id.as_bytes());
}

fn static_file(writer: &mut ResponseWriter, request: &Request) {
    let requested = request.path_match().get(1).unwrap_or_default();
    let requested = requested.split('?').next().unwrap_or_default();

    let Some(path) = resolve_file(Path::new(WEB_ROOT), requested) else {
        writer.write_response(StatusCode::BAD_REQUEST, &mime::TEXT_PLAIN_UTF_8, b"bad path");
        return;
    };

    match std::fs::read(&path) {
        Ok(content) => writer.write_response(StatusCode::OK, &content_type(&path), &content),
        Err(e) => {
            warn!(path = %path.display(), cause = %e, "can not serve file");
            writer.write_response(StatusCode::NOT_FOUND, &mime::TEXT_PLAIN_UTF_8, b"Could not open path");
        }
    }
}

/// Maps a request path under `root`, rejecting anything that leaves it.
fn resolve_file(root: &Path, requested: &str) -> Option<PathBuf> {
    let relative = Path::new(requested);
    if relative.components().any(|component| !matches!(component, Component::Normal(_))) {
        return None;
    }

    let path = root.join(relative);
    if requested.is_empty() || path.is_dir() { Some(path.join("index.html")) } else { Some(path) }
}

fn content_type(path: &Path) -> mime::Mime {
    match path.extension().and_then(|extension| extension.to_str()) {
        Some("html" | "htm") => mime::TEXT_HTML_UTF_8,
        Some("css") => mime::TEXT_CSS_UTF_8,
        Some("js") => mime::APPLICATION_JAVASCRIPT_UTF_8,
        Some("json") => mime::APPLICATION_JSON,
        Some("png") => mime::IMAGE_PNG,
        Some("jpg" | "jpeg") => mime::IMAGE_JPEG,
        Some("txt") => mime::TEXT_PLAIN_UTF_8,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let router = Router::builder()
        .route("/string", post(echo_string))
        .route("/info", get(info))
        .route("/match/([0-9a-zA-Z]+)", get(match_id))
        .default_route("/?(.*)", get(static_file))
        .build()
        .expect("router must build");

    let server = Server::builder()
        .address("0.0.0.0:12345")
        .router(router)
        .threads(4)
        .fallback(Fallback::Status)
        .build()
        .expect("server must build");

    if let Err(e) = server.run() {
        eprintln!("server stopped: {e}");
    }
}
