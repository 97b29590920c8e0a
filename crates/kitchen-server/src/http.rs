//! 🏗 HTTP request implementation

use std::io;
use std::io::{Cursor, Read};
use std::mem;

use kitchen_core::{RawRequest, Request, RequestMethod, StatusCode};
use tiny_http::{Header, Response};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Largest request body handed to the handler, in bytes
pub const MAX_BODY_LEN: usize = 64 * 1024;

/// Largest declared body length that is safe to leave unread, in bytes
///
/// tiny_http discards an unread body on drop by allocating a buffer of the
/// remaining length.
pub const MAX_DISCARD_LEN: usize = 16 * 1024 * 1024;

/// Request received over HTTP
///
/// If the handler drops the request without responding, it is answered with
/// an empty `200 OK`.
struct HttpRequest {
    /// `None` once the response has been sent
    inner: Option<tiny_http::Request>,
    id: Uuid,
    url: String,
    method: RequestMethod,
}

impl RawRequest for HttpRequest {
    fn url(&self) -> &str {
        &self.url
    }

    fn method(&self) -> RequestMethod {
        self.method.clone()
    }

    fn read_bytes(&mut self) -> io::Result<Vec<u8>> {
        let Some(rq) = self.inner.as_mut() else {
            return Ok(Vec::new());
        };
        let declared = rq.body_length().unwrap_or(0);
        let mut buf = Vec::with_capacity(declared.min(MAX_BODY_LEN));
        rq.as_reader()
            .take(MAX_BODY_LEN as u64 + 1)
            .read_to_end(&mut buf)?;
        if buf.len() > MAX_BODY_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("request body exceeds {MAX_BODY_LEN} bytes"),
            ));
        }
        Ok(buf)
    }

    fn respond(mut self: Box<Self>, status: StatusCode, body: Option<Vec<u8>>) {
        if let Some(rq) = self.inner.take() {
            send(rq, self.id, status, body);
        }
    }
}

impl Drop for HttpRequest {
    fn drop(&mut self) {
        if let Some(rq) = self.inner.take() {
            debug!("request left unanswered by the handler");
            send(rq, self.id, StatusCode::Ok, None);
        }
    }
}

/// Wrap the given HTTP request for the handler
///
/// Returns the request together with the ID used to correlate its log
/// events and its `X-Request-Id` response header.
pub fn parse(rq: tiny_http::Request) -> (Uuid, Request) {
    use tiny_http::Method::*;

    let method = match rq.method() {
        Get => RequestMethod::Get,
        Post => RequestMethod::Post,
        other => RequestMethod::Other(other.to_string()),
    };
    let id = Uuid::new_v4();
    let raw = HttpRequest {
        url: rq.url().to_owned(),
        inner: Some(rq),
        id,
        method,
    };
    (id, Request::from_raw(Box::new(raw)))
}

/// Whether the declared body of `rq` is too large to be dropped unread
pub fn exceeds_discard_limit(rq: &tiny_http::Request) -> bool {
    rq.body_length().is_some_and(|len| len > MAX_DISCARD_LEN)
}

/// Answer `rq` with `400 Bad Request` without ever touching its body
///
/// The response goes out through [`tiny_http::Request::upgrade`], the only way
/// to respond without dropping the body reader. The returned stream is leaked
/// along with the connection, which is never read from again.
pub fn reject_oversized(rq: tiny_http::Request) {
    let id = Uuid::new_v4();
    warn!(
        %id,
        length = ?rq.body_length(),
        url = rq.url(),
        "declared request body too large, abandoning connection"
    );
    let stream = rq.upgrade("none", response(id, StatusCode::BadRequest, None));
    mem::forget(stream);
}

fn send(rq: tiny_http::Request, id: Uuid, status: StatusCode, body: Option<Vec<u8>>) {
    let res = response(id, status, body);
    info!(status = status.code(), "responding");
    if let Err(err) = rq.respond(res) {
        warn!(%err, "HTTP response failed");
    }
}

fn response(id: Uuid, status: StatusCode, body: Option<Vec<u8>>) -> Response<Cursor<Vec<u8>>> {
    let has_body = body.is_some();
    let mut res = Response::from_data(body.unwrap_or_default()).with_status_code(status.code());

    if let Ok(hdr) = Header::from_bytes(&b"X-Request-Id"[..], id.hyphenated().to_string()) {
        res.add_header(hdr);
    }
    if has_body {
        if let Ok(hdr) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
            res.add_header(hdr);
        }
    }
    res
}
