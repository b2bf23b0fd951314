//! Whitelist for servable file names.
//!
//! Two shapes are served, each naming a single-digit-indexed file in the
//! serving directory:
//!
//! ```text
//! /imageN.jpg
//! /fileN.html
//! ```
//!
//! Both are ten bytes once the leading `/` is dropped, which is the length
//! the request parser reports for them.

/// Required file-name length (path without its leading `/`).
pub const NAME_LEN: usize = 10;

const IMAGE_PREFIX: &[u8] = b"/image";
const IMAGE_SUFFIX: &[u8] = b".jpg";
const FILE_PREFIX: &[u8] = b"/file";
const FILE_SUFFIX: &[u8] = b".html";

/// Check `path` against the whitelist.
///
/// `len` is the file-name length reported by the parser; anything other
/// than `NAME_LEN` is rejected before the path is inspected.
pub fn verify(path: &[u8], len: usize) -> bool {
    if len != NAME_LEN || path.len() != len + 1 {
        return false;
    }

    if let Some(rest) = path.strip_prefix(IMAGE_PREFIX) {
        digit_then(rest, IMAGE_SUFFIX)
    } else if let Some(rest) = path.strip_prefix(FILE_PREFIX) {
        digit_then(rest, FILE_SUFFIX)
    } else {
        false
    }
}

fn digit_then(rest: &[u8], suffix: &[u8]) -> bool {
    match rest.split_first() {
        Some((digit, tail)) => digit.is_ascii_digit() && tail == suffix,
        None => false,
    }
}
