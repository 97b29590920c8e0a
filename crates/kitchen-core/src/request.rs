use std::borrow::Cow;
use std::fmt;
use std::io;

use serde::Serialize;

/// HTTP request method
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum RequestMethod {
    /// GET request
    Get,
    /// POST request, may have a payload
    Post,
    /// Any other method, by name
    Other(String),
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestMethod::Get => f.write_str("GET"),
            RequestMethod::Post => f.write_str("POST"),
            RequestMethod::Other(name) => f.write_str(name),
        }
    }
}

/// HTTP status codes the service answers with
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u16)]
pub enum StatusCode {
    /// 200
    Ok = 200,
    /// 202
    Accepted = 202,
    /// 400
    BadRequest = 400,
    /// 404
    NotFound = 404,
}

impl StatusCode {
    /// Numeric value of the status
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Interface for handling requests
pub trait RequestHandler {
    /// Handle a single request
    ///
    /// This method may be called concurrently from different threads. The
    /// handler may also drop the request without responding.
    fn handle(&self, request: Request);
}

/// A raw request, implemented by the transport (HTTP server or test mock)
pub trait RawRequest {
    /// Get the URL, including any query string
    fn url(&self) -> &str;
    /// Get the request method
    fn method(&self) -> RequestMethod;

    /// Read the request body as bytes
    fn read_bytes(&mut self) -> io::Result<Vec<u8>>;

    /// Send the response
    ///
    /// `body` is [`None`] for responses without a body.
    fn respond(self: Box<Self>, status: StatusCode, body: Option<Vec<u8>>);
}

/// Request received by the service
pub struct Request {
    raw: Box<dyn RawRequest + Send>,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.raw.method())
            .field("url", &self.raw.url())
            .field("raw", &format_args!(".."))
            .finish()
    }
}

impl Request {
    /// Create a new request from a [`RawRequest`]
    #[inline]
    pub fn from_raw(raw: Box<dyn RawRequest + Send>) -> Self {
        Self { raw }
    }

    /// Get the request URL
    #[inline]
    pub fn url(&self) -> &str {
        self.raw.url()
    }

    /// Get the percent-decoded URL path, i.e. the URL without its query string
    ///
    /// A path whose escapes do not decode to UTF-8 is returned as is.
    pub fn path(&self) -> Cow<'_, str> {
        let url = self.raw.url();
        let path = url.split_once('?').map_or(url, |(path, _)| path);
        urlencoding::decode(path).unwrap_or(Cow::Borrowed(path))
    }

    /// Get the request method
    #[inline]
    pub fn method(&self) -> RequestMethod {
        self.raw.method()
    }

    /// Read the payload as bytes
    ///
    /// This method has side effects and should be called only once per
    /// request.
    #[inline]
    pub fn read_bytes(&mut self) -> io::Result<Vec<u8>> {
        self.raw.read_bytes()
    }

    /// Respond with a bare status code and no body
    #[inline]
    pub fn respond_with_status(self, status: StatusCode) {
        self.raw.respond(status, None);
    }

    /// Respond with `value` encoded as a JSON document followed by a newline
    pub fn respond_with_json<T: Serialize + ?Sized>(self, status: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(mut body) => {
                body.push(b'\n');
                self.raw.respond(status, Some(body));
            }
            Err(err) => {
                tracing::error!(%err, "failed to encode response body");
                self.raw.respond(status, None);
            }
        }
    }
}
