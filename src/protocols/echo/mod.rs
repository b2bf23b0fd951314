//! Echo protocol implementation.
//!
//! A raw echo service: every read is written straight back to the client.
//!
//! ## Protocol Format
//!
//! ```text
//! Request:  hello
//! Response: hello
//! ```
//!
//! Special commands, matched on the first bytes of a read:
//! - `CLOSE` - close this connection, keep serving
//! - `QUIT` - close this connection and stop the server

pub mod handler;
pub mod parser;

pub use handler::EchoHandler;
