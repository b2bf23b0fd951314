//! HTTP request-line parser.
//!
//! Only the request line is looked at. The method is decided from the first
//! bytes of the read; for `GET` the path is the token between `"GET "` and
//! the `" HTTP"` version marker. Headers and anything after them are ignored.

use std::fmt;

/// Reads shorter than this cannot hold a method and a minimal path.
pub const MIN_REQUEST_LEN: usize = 16;

/// Offset of the path in a GET request (`"GET "`).
const PATH_OFFSET: usize = 4;

/// Marker that ends the path token.
const VERSION_MARKER: &[u8] = b" HTTP";

/// The marker must start at least this many bytes before the end of the read.
const VERSION_TAIL: usize = 7;

/// Request method, decided from the leading bytes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Unknown,
}

impl Method {
    /// Prefix-match the method. No separator is required after the token.
    pub fn detect(input: &[u8]) -> Method {
        const METHODS: [(&[u8], Method); 6] = [
            (b"GET", Method::Get),
            (b"POST", Method::Post),
            (b"PUT", Method::Put),
            (b"DELETE", Method::Delete),
            (b"PATCH", Method::Patch),
            (b"HEAD", Method::Head),
        ];

        METHODS
            .iter()
            .find(|(token, _)| input.starts_with(token))
            .map_or(Method::Unknown, |&(_, method)| method)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Unknown => "UNKNOWN",
        }
    }
}

/// A parsed request line, borrowing from the read buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request<'a> {
    pub method: Method,
    /// Requested path, including the leading `/`. Empty unless `method` is `Get`.
    pub path: &'a [u8],
    /// Bytes in the read the request was parsed from.
    pub len: usize,
}

impl<'a> Request<'a> {
    /// Length of the requested file name, i.e. the path without its leading `/`.
    pub fn name_len(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Reasons a read is not a usable request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer than `MIN_REQUEST_LEN` bytes.
    TooShort(usize),
    /// GET line with no `" HTTP"` marker, or one too close to the end.
    MissingVersion,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::TooShort(n) => write!(f, "request too short ({n} bytes)"),
            ParseError::MissingVersion => write!(f, "could not parse GET path"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse the request line in `input`.
///
/// Non-GET methods (including `Unknown`) parse successfully with an empty
/// path; rejecting them is up to the caller.
pub fn parse(input: &[u8]) -> Result<Request<'_>, ParseError> {
    if input.len() < MIN_REQUEST_LEN {
        return Err(ParseError::TooShort(input.len()));
    }

    let method = Method::detect(input);
    let path: &[u8] = match method {
        Method::Get => parse_get(input)?,
        _ => &[],
    };

    Ok(Request {
        method,
        path,
        len: input.len(),
    })
}

/// Extract the path token of a GET request.
fn parse_get(input: &[u8]) -> Result<&[u8], ParseError> {
    let marker = find(&input[PATH_OFFSET..], VERSION_MARKER)
        .map(|pos| pos + PATH_OFFSET)
        .ok_or(ParseError::MissingVersion)?;

    if marker >= input.len() - VERSION_TAIL {
        return Err(ParseError::MissingVersion);
    }

    Ok(&input[PATH_OFFSET..marker])
}

/// Position of the first occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get() {
        match parse(b"GET /image1.jpg HTTP/1.1\r\n\r\n") {
            Ok(request) => {
                assert_eq!(request.method, Method::Get);
                assert_eq!(request.path, b"/image1.jpg");
                assert_eq!(request.name_len(), 10);
                assert_eq!(request.len, 28);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_get_ignores_headers() {
        let input = b"GET /file2.html HTTP/1.1\r\nHost: localhost\r\nAccept: */*\r\n\r\n";
        let request = parse(input).unwrap();
        assert_eq!(request.path, b"/file2.html");
    }

    #[test]
    fn test_too_short() {
        match parse(b"GET / HTTP/1.1") {
            Err(ParseError::TooShort(14)) => {}
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(parse(b""), Err(ParseError::TooShort(0)));
        assert_eq!(parse(b"GARBAGE"), Err(ParseError::TooShort(7)));
    }

    #[test]
    fn test_missing_version_marker() {
        assert_eq!(parse(b"GET no-http-marker"), Err(ParseError::MissingVersion));
    }

    #[test]
    fn test_version_marker_too_close_to_end() {
        // Marker at 12, read is 19 bytes: 12 >= 19 - 7
        assert_eq!(parse(b"GET /abcdefg HTTP/1"), Err(ParseError::MissingVersion));
        // One more byte and it fits
        let request = parse(b"GET /abcdefg HTTP/1.").unwrap();
        assert_eq!(request.path, b"/abcdefg");
    }

    #[test]
    fn test_empty_path() {
        let request = parse(b"GET  HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.path, b"");
        assert_eq!(request.name_len(), 0);
    }

    #[test]
    fn test_other_methods_have_no_path() {
        for (input, method) in [
            ("POST /image1.jpg HTTP/1.1\r\n\r\n", Method::Post),
            ("PUT /image1.jpg HTTP/1.1\r\n\r\n", Method::Put),
            ("DELETE /image1.jpg HTTP/1.1\r\n\r\n", Method::Delete),
            ("PATCH /image1.jpg HTTP/1.1\r\n\r\n", Method::Patch),
            ("HEAD /image1.jpg HTTP/1.1\r\n\r\n", Method::Head),
            ("BREW /coffee HTTP/1.1\r\n\r\n", Method::Unknown),
        ] {
            let request = parse(input.as_bytes()).unwrap();
            assert_eq!(request.method, method);
            assert!(request.path.is_empty());
        }
    }

    #[test]
    fn test_method_detection_is_prefix_based() {
        assert_eq!(Method::detect(b"GETTING"), Method::Get);
        assert_eq!(Method::detect(b"get /"), Method::Unknown);
        assert_eq!(Method::detect(b"GE"), Method::Unknown);
        assert_eq!(Method::Patch.as_str(), "PATCH");
    }
}
