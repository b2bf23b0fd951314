//! Blocking connection runtime.
//!
//! Shared by both protocol handlers:
//! - `ResponseBuffer`: fixed-capacity buffer responses are built into
//! - `ConnectionHandler` / `Directive`: the handler contract the listener drives
//! - read and write helpers that deal with interrupted and partial I/O

mod buffer;
mod connection;

pub use buffer::{BufferOverflow, ResponseBuffer};
pub use connection::{
    read_once, write_all_logged, ConnectionHandler, Directive, BUFFER_SIZE, MAX_READ,
};

#[cfg(test)]
pub(crate) use connection::mock;
