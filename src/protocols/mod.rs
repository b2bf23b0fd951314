//! Protocol implementations.
//!
//! Each protocol provides a `ConnectionHandler` the listener drives:
//! - `echo`: raw echo with `CLOSE` / `QUIT` directives
//! - `http`: restricted HTTP/1.1 GET file serving

pub mod echo;
pub mod http;
