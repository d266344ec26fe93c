//! Hashing utilities for checksums and package ids.

use sha2::{Digest, Sha256};

/// Compute SHA256 hash of a byte slice.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Whether `s` looks like a hex-encoded SHA256 digest.
pub fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// A hasher for building fingerprints from multiple components.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    /// Create a new fingerprint builder.
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component to the fingerprint.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0"); // Separator
        self
    }

    /// Add a `key=value` pair.
    pub fn update_pair(&mut self, key: &str, value: &str) -> &mut Self {
        self.update_str(key);
        self.update_str(value)
    }

    /// Finalize and return the fingerprint as a hex string.
    pub fn finish(self) -> String {
        hex::encode(self.hasher.finalize())
    }

    /// Finalize and return a short fingerprint (first 16 chars).
    pub fn finish_short(self) -> String {
        self.finish()[..16].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_bytes() {
        assert_eq!(
            sha256_bytes(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_is_sha256_hex() {
        assert!(is_sha256_hex(&sha256_bytes(b"x")));
        assert!(!is_sha256_hex("abc"));
        assert!(!is_sha256_hex(&"z".repeat(64)));
    }

    #[test]
    fn test_fingerprint() {
        let fp = |v: &str| {
            let mut fp = Fingerprint::new();
            fp.update_pair("shared", v).update_str("Linux");
            fp.finish()
        };

        assert_eq!(fp("false"), fp("false"));
        assert_ne!(fp("false"), fp("true"));

        let mut short = Fingerprint::new();
        short.update_str("glib");
        assert_eq!(short.finish_short().len(), 16);
    }
}
