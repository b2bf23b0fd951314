//! Echo protocol parser.

/// Directive prefix that ends the current connection.
pub const CLOSE: &[u8] = b"CLOSE";

/// Directive prefix that ends the connection and stops the server.
pub const QUIT: &[u8] = b"QUIT";

/// Parsed echo command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Send the read bytes back unchanged.
    Echo,
    /// Close this connection.
    Close,
    /// Close this connection and stop accepting.
    Quit,
}

/// Classify one read.
///
/// Only the leading bytes matter: `CLOSE\r\n`, `CLOSE now` and `CLOSE` all
/// close. Matching is case-sensitive.
pub fn parse(input: &[u8]) -> Command {
    if input.starts_with(CLOSE) {
        Command::Close
    } else if input.starts_with(QUIT) {
        Command::Quit
    } else {
        Command::Echo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_echo() {
        assert_eq!(parse(b"hello"), Command::Echo);
        assert_eq!(parse(b""), Command::Echo);
        assert_eq!(parse(b"CLOS"), Command::Echo);
        assert_eq!(parse(b"close"), Command::Echo);
        assert_eq!(parse(b" QUIT"), Command::Echo);
    }

    #[test]
    fn test_parse_close() {
        assert_eq!(parse(b"CLOSE"), Command::Close);
        assert_eq!(parse(b"CLOSE\r\n"), Command::Close);
        assert_eq!(parse(b"CLOSED"), Command::Close);
    }

    #[test]
    fn test_parse_quit() {
        assert_eq!(parse(b"QUIT"), Command::Quit);
        assert_eq!(parse(b"QUIT\n"), Command::Quit);
    }
}
