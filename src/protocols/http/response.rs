//! HTTP response construction.
//!
//! Responses are written once into a `ResponseBuffer` sized for them up
//! front. Wire formats:
//!
//! ```text
//! HTTP/1.1 200 OK\r\ncontent-type: <type>\r\ncontent-length: <n>\r\n\r\n<payload>
//! HTTP/1.1 400  Bad Request\r\n\r\n
//! HTTP/1.1 404 File Not Found\r\n\r\n
//! ```
//!
//! The double space in the 400 line is kept as-is; existing clients match
//! on it.

use crate::runtime::{BufferOverflow, ResponseBuffer};
use bytes::Bytes;
use std::fmt;

const STATUS_LINE_OK: &str = "200 OK";
const STATUS_LINE_BAD_REQUEST: &str = "400  Bad Request";
const STATUS_LINE_NOT_FOUND: &str = "404 File Not Found";

const CONTENT_JPEG: &str = "image/jpeg";
const CONTENT_HTML: &str = "text/html";

/// Fixed text of the 200 header, excluding the status, type and length fields.
const OK_TEMPLATE_LEN: usize =
    "HTTP/1.1 \r\ncontent-type: \r\ncontent-length: \r\n\r\n".len();

/// Fixed text of an error response, excluding the status.
const ERROR_TEMPLATE_LEN: usize = "HTTP/1.1 \r\n\r\n".len();

/// Decimal digits in the largest `usize`.
const MAX_LENGTH_DIGITS: usize = 20;

/// Header bytes reserved ahead of a 200 payload.
pub const OK_HEADER_RESERVE: usize =
    OK_TEMPLATE_LEN + STATUS_LINE_OK.len() + CONTENT_JPEG.len() + MAX_LENGTH_DIGITS;

/// Size of an error response buffer: fits the longest status line.
pub const ERROR_RESPONSE_SIZE: usize = ERROR_TEMPLATE_LEN + STATUS_LINE_NOT_FOUND.len();

/// Status codes this server produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 File Not Found
    NotFound,
}

impl Status {
    /// Map a numeric code. Anything the server does not produce is an
    /// internal error.
    pub fn from_code(code: u16) -> Result<Status, ResponseError> {
        match code {
            200 => Ok(Status::Ok),
            400 => Ok(Status::BadRequest),
            404 => Ok(Status::NotFound),
            other => Err(ResponseError::UnsupportedStatus(other)),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::NotFound => 404,
        }
    }

    /// Status line text following `HTTP/1.1 `.
    pub fn line(&self) -> &'static str {
        match self {
            Status::Ok => STATUS_LINE_OK,
            Status::BadRequest => STATUS_LINE_BAD_REQUEST,
            Status::NotFound => STATUS_LINE_NOT_FOUND,
        }
    }
}

/// Payload content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Jpeg,
    Html,
}

impl ContentType {
    /// Pick the type for a whitelisted path: `/i…` is an image, everything
    /// else HTML.
    pub fn for_path(path: &[u8]) -> ContentType {
        if path.get(1) == Some(&b'i') {
            ContentType::Jpeg
        } else {
            ContentType::Html
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Jpeg => CONTENT_JPEG,
            ContentType::Html => CONTENT_HTML,
        }
    }
}

/// Internal response construction failures.
///
/// These mean the server itself is wrong, not the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseError {
    /// No response shape exists for this code on this path.
    UnsupportedStatus(u16),
    /// Header plus payload does not fit the allocated buffer.
    Overflow(BufferOverflow),
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseError::UnsupportedStatus(code) => {
                write!(f, "response not implemented for code: {code}")
            }
            ResponseError::Overflow(e) => write!(f, "invalid buffer length: {e}"),
        }
    }
}

impl std::error::Error for ResponseError {}

impl From<BufferOverflow> for ResponseError {
    fn from(e: BufferOverflow) -> Self {
        ResponseError::Overflow(e)
    }
}

/// A complete response, ready to be written.
#[derive(Debug)]
pub struct Response {
    status: Status,
    buffer: ResponseBuffer,
}

impl Response {
    /// Build a 200 response carrying `payload`.
    pub fn ok(payload: &[u8], content_type: ContentType) -> Result<Response, ResponseError> {
        let mut buffer = ResponseBuffer::with_capacity(OK_HEADER_RESERVE + payload.len());
        write_ok(&mut buffer, payload, content_type)?;
        Ok(Response {
            status: Status::Ok,
            buffer,
        })
    }

    /// Build a status-line-only response.
    ///
    /// 200 has no error form and is rejected.
    pub fn error(status: Status) -> Result<Response, ResponseError> {
        if status == Status::Ok {
            return Err(ResponseError::UnsupportedStatus(status.code()));
        }

        let mut buffer = ResponseBuffer::with_capacity(ERROR_RESPONSE_SIZE);
        buffer.append(format!("HTTP/1.1 {}\r\n\r\n", status.line()).as_bytes())?;
        Ok(Response { status, buffer })
    }

    /// `error` for a numeric code.
    pub fn error_code(code: u16) -> Result<Response, ResponseError> {
        Response::error(Status::from_code(code)?)
    }

    pub fn bad_request() -> Result<Response, ResponseError> {
        Response::error(Status::BadRequest)
    }

    pub fn not_found() -> Result<Response, ResponseError> {
        Response::error(Status::NotFound)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Valid bytes in the buffer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }
}

/// Write a 200 header and `payload` into `buffer`.
///
/// The whole response is checked against the buffer before anything is
/// written, so a failure leaves `buffer` empty.
fn write_ok(
    buffer: &mut ResponseBuffer,
    payload: &[u8],
    content_type: ContentType,
) -> Result<(), ResponseError> {
    let header = format!(
        "HTTP/1.1 {}\r\ncontent-type: {}\r\ncontent-length: {}\r\n\r\n",
        Status::Ok.line(),
        content_type.as_str(),
        payload.len()
    );

    buffer.reserve_check(header.len() + payload.len())?;
    buffer.append(header.as_bytes())?;
    buffer.append(payload)?;
    Ok(())
}
