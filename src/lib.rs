//! solo-serve: a single-connection TCP server
//!
//! Two connection handlers share one blocking accept loop:
//! - Echo: reads are written back until `CLOSE` or `QUIT`
//! - Http: one `GET` per connection for a small whitelist of files
//!
//! Only one client is ever serviced at a time; the listen backlog is 1.

pub mod config;
pub mod logger;
pub mod protocols;
pub mod runtime;
pub mod server;
