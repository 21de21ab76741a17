//! Content-addressed fingerprints for cache busting.

const FINGERPRINT_LEN: usize = 8;

/// Derive a deterministic fingerprint from final content bytes.
///
/// Identical content always hashes identically; any byte change produces a
/// different fingerprint.
pub fn content_fingerprint(content: &[u8]) -> String {
  let hash = blake3::hash(content);
  hash.to_hex().as_str()[..FINGERPRINT_LEN].to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identical_content_hashes_identically() {
    assert_eq!(content_fingerprint(b"body {}"), content_fingerprint(b"body {}"));
  }

  #[test]
  fn single_byte_change_alters_the_fingerprint() {
    assert_ne!(content_fingerprint(b"body {}"), content_fingerprint(b"body { "));
  }

  #[test]
  fn fingerprints_are_short_hex() {
    let fingerprint = content_fingerprint(b"var a = 1;");
    assert_eq!(fingerprint.len(), FINGERPRINT_LEN);
    assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
  }
}
