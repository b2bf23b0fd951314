//! Restricted HTTP/1.1 file server.
//!
//! One request per connection, `GET` only, and only for paths on the
//! `/imageN.jpg` / `/fileN.html` whitelist. Every other request gets a
//! 400 or 404; nothing a client sends can fail the server.
//!
//! ## Request flow
//!
//! ```text
//! read -> parser -> validator -> fetch -> response -> write
//! ```

pub mod fetch;
pub mod handler;
pub mod parser;
pub mod response;
pub mod validator;

pub use fetch::FileFetcher;
pub use handler::HttpHandler;

#[cfg(test)]
pub(crate) mod testing {
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fresh, empty directory under the system temp dir.
    pub fn scratch_dir(tag: &str) -> PathBuf {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let dir = std::env::temp_dir().join(format!(
            "solo-serve-{}-{}-{}",
            tag,
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }
}
