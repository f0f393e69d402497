//! Content fingerprints.
//!
//! blake3 digests truncated to 64 bits: enough to tell two versions of a
//! config file or an output document apart.

/// 64-bit fingerprint of `bytes`.
pub fn compute(bytes: &[u8]) -> u64 {
    let hash = blake3::hash(bytes);
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

/// Short hex fingerprint of `content`, e.g. `"3f2a9c1b"`.
pub fn fingerprint(content: &str) -> String {
    format!("{:016x}", compute(content.as_bytes()))[..8].to_owned()
}
