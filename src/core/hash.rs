//! State Fingerprinting
//!
//! Deterministic SHA-256 fingerprints of game state for:
//! - Snapshot revisions (pollers skip unchanged snapshots)
//! - Replay validation (same trace, same fingerprint)

use sha2::{Digest, Sha256};

/// Fingerprint output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for game state.
///
/// Wraps SHA-256 with typed update helpers.
/// Order of updates is part of the fingerprint.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for match state.
    pub fn for_match_state() -> Self {
        Self::new(b"RING_TOSS_MATCH_V1")
    }

    /// Create hasher for sensor traces.
    pub fn for_sensor_trace() -> Self {
        Self::new(b"RING_TOSS_TRACE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with an optional seat index (`0xFF` marks "none").
    #[inline]
    pub fn update_seat(&mut self, seat: Option<usize>) {
        self.update_u8(seat.map_or(0xFF, |s| s as u8));
    }

    /// Update with a length-prefixed string.
    pub fn update_str(&mut self, value: &str) {
        self.update_u32(value.len() as u32);
        self.hasher.update(value.as_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Short hex revision tag (first 8 bytes) of a fingerprint.
pub fn revision_tag(hash: &StateHash) -> String {
    hex::encode(&hash[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_hasher_determinism() {
        let make_hash = || {
            let mut hasher = StateHasher::for_match_state();
            hasher.update_u32(100);
            hasher.update_seat(Some(2));
            hasher.update_str("Player 1");
            hasher.update_bool(true);
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(1);
            h.update_u32(2);
            h.finalize()
        };

        let hash2 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(2);
            h.update_u32(1);
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_domain_separation() {
        let a = StateHasher::for_match_state().finalize();
        let b = StateHasher::for_sensor_trace().finalize();
        assert_ne!(a, b);
    }

    #[test]
    fn test_none_seat_differs_from_seat_zero() {
        let mut h1 = StateHasher::new(b"seat");
        h1.update_seat(None);
        let mut h2 = StateHasher::new(b"seat");
        h2.update_seat(Some(0));
        assert_ne!(h1.finalize(), h2.finalize());
    }

    #[test]
    fn test_revision_tag_length() {
        let hash = StateHasher::for_match_state().finalize();
        assert_eq!(revision_tag(&hash).len(), 16);
    }
}
