//! Body digests for stored responses.

use sha2::{Digest, Sha256};

/// Compute the hex SHA-256 digest of a response body.
pub fn body_digest(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_stability() {
        assert_eq!(body_digest(b"<html></html>"), body_digest(b"<html></html>"));
    }

    #[test]
    fn test_digest_differs_by_body() {
        assert_ne!(body_digest(b"v1"), body_digest(b"v2"));
    }

    #[test]
    fn test_digest_format() {
        let digest = body_digest(b"");
        assert_eq!(digest, "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
