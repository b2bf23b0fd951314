//! Echo protocol handler.

use super::parser::{self, Command};
use crate::logger::{Logger, LEVEL_VERBOSE};
use crate::runtime::{read_once, write_all_logged, ConnectionHandler, Directive, BUFFER_SIZE};
use std::io::{Read, Write};

/// Echoes reads back until the client sends CLOSE or QUIT.
#[derive(Debug, Clone, Copy)]
pub struct EchoHandler {
    logger: Logger,
}

impl EchoHandler {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl ConnectionHandler for EchoHandler {
    fn handle<S: Read + Write>(&self, stream: &mut S) -> Directive {
        let mut buffer = [0u8; BUFFER_SIZE];

        loop {
            let n = match read_once(stream, &mut buffer) {
                Ok(0) => {
                    self.logger
                        .info(LEVEL_VERBOSE, format_args!("Peer closed the connection"));
                    return Directive::Close;
                }
                Ok(n) => n,
                Err(e) => {
                    self.logger
                        .error(LEVEL_VERBOSE, format_args!("Error with read: {}", e));
                    return Directive::Close;
                }
            };

            let input = &buffer[..n];
            self.logger.info(
                LEVEL_VERBOSE,
                format_args!("Received {} bytes: {}", n, String::from_utf8_lossy(input)),
            );

            match parser::parse(input) {
                Command::Close => {
                    self.logger.info(
                        LEVEL_VERBOSE,
                        format_args!("Received CLOSE command, closing connection"),
                    );
                    return Directive::Close;
                }
                Command::Quit => {
                    self.logger.info(
                        LEVEL_VERBOSE,
                        format_args!("Received QUIT command, closing connection and exiting"),
                    );
                    return Directive::Quit;
                }
                Command::Echo => {
                    write_all_logged(stream, input, &self.logger);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::mock::MockStream;
    use std::io;

    fn handler() -> EchoHandler {
        EchoHandler::new(Logger::new(0))
    }

    #[test]
    fn test_echo_then_close() {
        let mut stream = MockStream::with_reads(["hello", "world\n", "CLOSE"]);

        assert_eq!(handler().handle(&mut stream), Directive::Close);
        assert_eq!(stream.written, b"helloworld\n");
    }

    #[test]
    fn test_quit_stops_server() {
        let mut stream = MockStream::with_reads(["ping", "QUIT\r\n", "never read"]);

        assert_eq!(handler().handle(&mut stream), Directive::Quit);
        assert_eq!(stream.written, b"ping");
        assert_eq!(stream.reads.len(), 1);
    }

    #[test]
    fn test_directives_are_not_echoed() {
        let mut stream = MockStream::with_reads(["CLOSE"]);

        assert_eq!(handler().handle(&mut stream), Directive::Close);
        assert!(stream.written.is_empty());
    }

    #[test]
    fn test_eof_closes() {
        let mut stream = MockStream::with_reads(["hello"]);

        assert_eq!(handler().handle(&mut stream), Directive::Close);
        assert_eq!(stream.written, b"hello");
    }

    #[test]
    fn test_read_error_closes_connection_only() {
        let mut stream = MockStream::default();
        stream
            .reads
            .push_back(Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")));

        assert_eq!(handler().handle(&mut stream), Directive::Close);
    }

    #[test]
    fn test_write_failure_keeps_echoing() {
        let mut stream = MockStream::with_reads(["lost", "kept", "CLOSE"]);
        stream.failing_writes = 1;

        assert_eq!(handler().handle(&mut stream), Directive::Close);
        assert_eq!(stream.written, b"kept");
    }

    #[test]
    fn test_partial_writes() {
        let payload = vec![b'a'; 1000];
        let mut stream = MockStream::with_reads([payload.clone(), b"QUIT".to_vec()]);
        stream.max_write = Some(7);

        assert_eq!(handler().handle(&mut stream), Directive::Quit);
        assert_eq!(stream.written, payload);
    }
}
