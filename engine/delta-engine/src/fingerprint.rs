//! Stable pair ids so results can be joined across runs.

/// Compute a stable id for the `occurrence`-th pair of `identity`.
///
/// Uses blake3 over `identity | occurrence`; the first 8 bytes (16 hex chars)
/// are plenty for one capture pair.
pub fn pair_id(identity: &str, occurrence: usize) -> String {
  let mut hasher = blake3::Hasher::new();
  hasher.update(identity.as_bytes());
  hasher.update(b"|");
  hasher.update(occurrence.to_string().as_bytes());
  let hex = hasher.finalize().to_hex();
  format!("pair-{}", &hex[..16])
}
