//! Content hashing using blake3.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let h = hash::compute("some content");       // -> ContentHash
//! let fp = hash::fingerprint("some content");  // -> "a1b2c3d4"
//! ```

use std::fmt;

/// Length of the short hex fingerprint used in file names.
pub const FINGERPRINT_LEN: usize = 8;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full lowercase hex digest.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// First [`FINGERPRINT_LEN`] hex characters of the digest.
    pub fn fingerprint(self) -> String {
        hex::encode(&self.0[..FINGERPRINT_LEN / 2])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Hash byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> ContentHash {
    ContentHash(*blake3::hash(data.as_ref()).as_bytes())
}

/// Hash and return the 8-char hex fingerprint.
///
/// Used for cache-busting filenames (e.g. `global_a1b2c3d4.js`).
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(value: &T) -> String {
    compute(value).fingerprint()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_digest_prefix() {
        let hash = compute("var x=1;");
        let fp = fingerprint("var x=1;");
        assert_eq!(fp.len(), FINGERPRINT_LEN);
        assert!(hash.to_hex().starts_with(&fp));
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        assert_eq!(fingerprint("body{margin:0}"), fingerprint("body{margin:0}"));
        assert_ne!(fingerprint("body{margin:0}"), fingerprint("body{margin:1}"));
    }

    #[test]
    fn test_known_digest() {
        // blake3 of the empty input
        assert_eq!(
            compute("").to_hex(),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }
}
