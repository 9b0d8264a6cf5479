//! Deterministic fallback embeddings.
//!
//! When the model cannot produce a usable vector, the query is embedded by
//! hashing it and drawing uniform values from a seeded generator. The vector
//! carries no meaning, but equal texts always map to equal vectors.
//!
//! The recipe is fixed so that vectors stay reproducible across releases:
//! 1. MD5 of the UTF-8 bytes, read as a big-endian 128-bit integer
//! 2. reduced modulo `2^32 - 1` to a 32-bit seed
//! 3. MT19937 seeded with `init_genrand(seed)`
//! 4. each value is a 53-bit double in `[0, 1)` built from two draws
//!
//! This is the same stream numpy's legacy `RandomState(seed).rand(n)` yields.

use md5::{Digest, Md5};
use rand_mt::Mt;

use super::types::EMBEDDING_DIMENSIONS;

/// Seed derived from the text's MD5 digest.
#[must_use]
pub fn fallback_seed(text: &str) -> u32 {
    let digest = Md5::digest(text.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest);

    let reduced = u128::from_be_bytes(bytes) % u128::from(u32::MAX);
    #[allow(clippy::cast_possible_truncation)]
    let seed = reduced as u32;
    seed
}

/// Draw `count` uniform doubles in `[0, 1)` from an MT19937 stream.
#[must_use]
pub fn seeded_uniform(seed: u32, count: usize) -> Vec<f64> {
    // 2^26 and 2^53
    const HIGH_SCALE: f64 = 67_108_864.0;
    const DENOMINATOR: f64 = 9_007_199_254_740_992.0;

    let mut mt = Mt::new(seed);
    (0..count)
        .map(|_| {
            let high = f64::from(mt.next_u32() >> 5);
            let low = f64::from(mt.next_u32() >> 6);
            (high * HIGH_SCALE + low) / DENOMINATOR
        })
        .collect()
}

/// Deterministic, non-semantic embedding for `text`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn fallback_embedding(text: &str) -> Vec<f32> {
    seeded_uniform(fallback_seed(text), EMBEDDING_DIMENSIONS)
        .into_iter()
        .map(|v| v as f32)
        .collect()
}
