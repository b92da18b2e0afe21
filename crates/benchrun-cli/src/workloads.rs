//! Concrete timed workloads.
//!
//! The harness treats these as opaque callables; everything here exists only
//! to keep a core busy in a shape resembling real work: transcendental math,
//! digest chaining, buffer re-encoding, and a simulated compute dispatch.

use std::hint::black_box;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use benchrun_harness::DispatchParams;

/// Chained transcendental math: each iteration feeds on the previous result
/// plus a hash-style pseudo-noise term, so the loop cannot be vectorized or
/// folded away.
pub fn math_chain(calls: u64) -> f64 {
    let mut check = 0.0f64;
    for i in 0..calls {
        let noise = ((i as f64 * 12.9898).sin() * 43_758.5453).fract().abs();
        check = (check + noise).sin().abs().sqrt();
    }
    black_box(check)
}

/// Run [`math_chain`] and measure its wall-clock duration.
pub fn timed_math_worker(calls: u64) -> Duration {
    let start = Instant::now();
    math_chain(calls);
    start.elapsed()
}

const LOREM: &[u8] = b"Lorem ipsum dolor sit amet, consectetur adipiscing \
elit. Phasellus nisi dui, ullamcorper id sem elementum, suscipit \
pellentesque dolor. Sed suscipit vulputate justo, ut blandit mauris \
euismod eget. Duis bibendum velit in posuere aliquet.";

/// Chained SHA-256 digesting: every round hashes the previous digest
/// appended to the seed text.
pub fn hash_chain(rounds: u32) -> [u8; 32] {
    let mut digest = [0u8; 32];
    for _ in 0..rounds {
        let mut hasher = Sha256::new();
        hasher.update(LOREM);
        hasher.update(digest);
        digest = hasher.finalize().into();
    }
    black_box(digest)
}

/// Repeated base64 + hex re-encoding of a pseudo-random buffer, decoding
/// back each round so every byte is touched both ways.
pub fn encode_chain(rounds: u32, buffer_len: usize) -> usize {
    let mut rng = StdRng::seed_from_u64(0xB0A710AD);
    let buffer: Vec<u8> = (0..buffer_len).map(|_| rng.gen()).collect();

    let mut decoded_len = 0;
    for _ in 0..rounds {
        let b64 = BASE64.encode(&buffer);
        let hexed = hex::encode(&buffer[..buffer.len().min(1024)]);
        decoded_len = BASE64.decode(b64.as_bytes()).map(|v| v.len()).unwrap_or(0)
            + hex::decode(hexed.as_bytes()).map(|v| v.len()).unwrap_or(0);
        black_box(decoded_len);
    }
    decoded_len
}

/// Simulated compute dispatch: writes a time-dependent gradient into the
/// caller-owned output buffer, touching a strided subset of pixels so a
/// pass stays cheap enough to fire once per tick.
pub fn simulated_dispatch(output: &mut [u8], params: &DispatchParams) {
    let t = params.elapsed_secs_f32();
    let width = params.width.max(1) as f32;
    for (i, px) in output.iter_mut().enumerate().step_by(257) {
        let x = (i as f32) % width;
        *px = (((x * 0.013 + t).sin() * 0.5 + 0.5) * 255.0) as u8;
    }
}
