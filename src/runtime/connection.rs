//! Per-connection plumbing shared by the protocol handlers.
//!
//! A handler owns an accepted stream for as long as it needs it and reports
//! back a `Directive` telling the listener whether to keep accepting.

use crate::logger::{Logger, LEVEL_VERBOSE};
use std::io::{self, Read, Write};

/// Size of the per-connection read buffer.
pub const BUFFER_SIZE: usize = 32768;

/// Largest single read. One byte of the buffer is held back, so a full
/// read never reaches the end of it.
pub const MAX_READ: usize = BUFFER_SIZE - 1;

/// What the listener should do once a handler is finished with a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Close this connection and keep accepting.
    Close,
    /// Close this connection and stop the accept loop.
    Quit,
}

/// Something that can service one accepted connection.
///
/// Generic over the stream so handlers run the same against a socket and
/// an in-memory stream.
pub trait ConnectionHandler {
    fn handle<S: Read + Write>(&self, stream: &mut S) -> Directive;
}

/// One read of at most `MAX_READ` bytes into `buffer`.
///
/// `Interrupted` is retried; any other error is returned to the caller.
pub fn read_once<S: Read>(stream: &mut S, buffer: &mut [u8; BUFFER_SIZE]) -> io::Result<usize> {
    loop {
        match stream.read(&mut buffer[..MAX_READ]) {
            Ok(n) => return Ok(n),
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Write all of `data`, looping over partial writes.
///
/// Best effort: a failed write is logged and the rest of `data` is dropped,
/// but the connection is left open. Returns the bytes actually sent.
pub fn write_all_logged<S: Write>(stream: &mut S, data: &[u8], logger: &Logger) -> usize {
    let mut sent = 0;

    while sent < data.len() {
        match stream.write(&data[sent..]) {
            Ok(0) => {
                logger.error(
                    LEVEL_VERBOSE,
                    format_args!("Error with write: peer accepted 0 of {} bytes", data.len() - sent),
                );
                break;
            }
            Ok(n) => sent += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                logger.error(LEVEL_VERBOSE, format_args!("Error with write: {}", e));
                break;
            }
        }
    }

    if let Err(e) = stream.flush() {
        logger.error(LEVEL_VERBOSE, format_args!("Error with flush: {}", e));
    }

    sent
}


#[cfg(test)]
mod tests {
    use super::mock::MockStream;
    use super::*;

    #[test]
    fn test_partial_writes_are_completed() {
        let mut stream = MockStream {
            max_write: Some(3),
            ..MockStream::default()
        };
        let sent = write_all_logged(&mut stream, b"hello world", &Logger::new(0));

        assert_eq!(sent, 11);
        assert_eq!(stream.written, b"hello world");
        assert_eq!(stream.write_calls, 4);
    }

    #[test]
    fn test_write_error_is_not_fatal() {
        let mut stream = MockStream {
            failing_writes: 1,
            ..MockStream::default()
        };
        let sent = write_all_logged(&mut stream, b"data", &Logger::new(0));

        assert_eq!(sent, 0);
        assert!(stream.written.is_empty());

        // Connection is still usable afterwards
        let sent = write_all_logged(&mut stream, b"data", &Logger::new(0));
        assert_eq!(sent, 4);
        assert_eq!(stream.written, b"data");
    }

    #[test]
    fn test_read_once_caps_at_max_read() {
        let mut stream = MockStream::with_reads([vec![b'x'; BUFFER_SIZE + 10]]);
        let mut buffer = [0u8; BUFFER_SIZE];

        let n = read_once(&mut stream, &mut buffer).unwrap();
        assert_eq!(n, MAX_READ);
        assert_eq!(buffer[MAX_READ], 0);
    }

    #[test]
    fn test_read_once_retries_interrupted() {
        let mut stream = MockStream::default();
        stream
            .reads
            .push_back(Err(io::Error::new(io::ErrorKind::Interrupted, "signal")));
        stream.reads.push_back(Ok(b"ping".to_vec()));
        let mut buffer = [0u8; BUFFER_SIZE];

        assert_eq!(read_once(&mut stream, &mut buffer).unwrap(), 4);
        assert_eq!(&buffer[..4], b"ping");
    }
}
