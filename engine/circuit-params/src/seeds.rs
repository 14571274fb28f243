//! Derivation of independent ChaCha streams from one master seed.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Consumers of randomness that must never share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Domain {
    ParameterPool = 1,
    IndexTable = 2,
}

/// Generator for `(seed, domain)` positioned on `stream`.
///
/// Streams of the same key are independent, so rows can be drawn in any
/// order and still reproduce.
pub fn stream_rng(seed: u64, domain: Domain, stream: u64) -> ChaCha20Rng {
    let mut key = [0u8; 32];
    key[..8].copy_from_slice(&seed.to_le_bytes());
    key[8] = domain as u8;
    let mut rng = ChaCha20Rng::from_seed(key);
    rng.set_stream(stream);
    rng
}
