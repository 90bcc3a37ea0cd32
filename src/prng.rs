use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::arx::{mix, permute, state_to_u8, u8_to_words};
use crate::*;

pub type Seed = [u32; 8];
pub type PrngCounter = [u32; 4];

// primes loaded as the first 4 words of every block
pub const PRIMES: [u32; 4] = [3631658089, 2367245317, 3358795523, 4133671973];

const COUNTER_ROUNDS: usize = 16;

// ----------------------------------------------------------------------------
/// SHA-256 of the input as raw digest bytes.
pub fn seed_bytes(input: impl AsRef<[u8]>) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(input.as_ref()));
    out
}

/// SHA-256 of the input (text or bytes) as 8 little-endian words.
pub fn seed(input: impl AsRef<[u8]>) -> Seed {
    let mut digest = seed_bytes(input);
    let s = u8_to_words(&digest);
    digest.zeroize();
    s
}

// ----------------------------------------------------------------------------
pub fn counter(seed: &Seed) -> PrngCounter {
    let mut c: PrngCounter = [
        seed[0] ^ PRIMES[0].wrapping_add(seed[1]),
        seed[2].wrapping_sub(PRIMES[1]) ^ seed[3],
        seed[4] ^ PRIMES[2].wrapping_add(seed[5]),
        seed[6].wrapping_sub(PRIMES[3]) ^ seed[7],
    ];
    for _ in 0..COUNTER_ROUNDS {
        mix(&mut c, 2, 3, 0, 1);
        mix(&mut c, 0, 1, 2, 3);
        mix(&mut c, 3, 2, 1, 0);
        mix(&mut c, 1, 0, 3, 2);
    }
    c
}

// Block for one counter value: PRIMES ‖ seed ‖ counter, permuted.
fn block(seed: &Seed, counter: &PrngCounter, out: &mut [u8; STATE_SIZE]) {
    let mut b: State = [0; 16];
    b[..4].copy_from_slice(&PRIMES);
    b[4..12].copy_from_slice(seed);
    b[12..].copy_from_slice(counter);
    permute(&mut b);
    state_to_u8(&b, out);
    b.zeroize();
}

// ----------------------------------------------------------------------------
/// Deterministic bytes from a seed.
pub fn prng(seed: &Seed, len: usize) -> Vec<u8> {
    let mut rng = new_vortex_rng(seed);
    let mut out = vec![0u8; len];
    rng.fill_bytes(&mut out);
    out
}

// Streams prng() output across calls: splitting a read never changes the
// bytes produced.
pub struct VortexRng {
    s: Seed,
    c: PrngCounter,
    next: usize, // counter word advanced after the current block
    buf: [u8; STATE_SIZE],
    i: usize,
}

// ----------------------------------------------------------------------------
pub fn new_vortex_rng(seed: &Seed) -> VortexRng {
    VortexRng {
        s: *seed,
        c: counter(seed),
        next: 0,
        buf: [0; STATE_SIZE],
        i: STATE_SIZE,
    }
}

// ----------------------------------------------------------------------------
pub fn new_fixed_vortex_rng(input: impl AsRef<[u8]>) -> VortexRng {
    new_vortex_rng(&seed(input))
}

impl VortexRng {
    fn refill(&mut self) {
        block(&self.s, &self.c, &mut self.buf);
        self.c[self.next] = self.c[self.next].wrapping_add(1);
        self.next = (self.next + 1) % 4;
        self.i = 0;
    }

    // The counter alone is enough to recompute later blocks.
    fn wipe(&mut self) {
        self.s.zeroize();
        self.c.zeroize();
        self.buf.zeroize();
        self.i = STATE_SIZE;
    }

    pub fn fill_bytes(&mut self, buf: &mut [u8]) {
        for b in buf {
            if self.i == STATE_SIZE {
                self.refill();
            }
            *b = self.buf[self.i];
            self.i += 1;
        }
    }
}

impl SeedRng for VortexRng {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        self.fill_bytes(buf);
        Ok(())
    }
}

impl Drop for VortexRng {
    fn drop(&mut self) {
        self.wipe();
    }
}

// ----------------------------------------------------------------------------
/// Shannon entropy of the byte histogram, in bits per byte (0.0 to 8.0).
pub fn entropy(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }
    let mut counts = [0usize; 256];
    for &b in bytes {
        counts[b as usize] += 1;
    }
    let len = bytes.len() as f64;
    let e = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / len;
            -p * p.log2()
        })
        .sum::<f64>();
    // a single symbol sums to -0.0
    e.abs()
}

// ----------------------------------------------------------------------------
/// Big-endian value of at most 6 bytes.
pub fn to_number(bytes: &[u8]) -> Result<u64> {
    if bytes.len() >= 7 {
        return Err(VortexError::NumberTooLarge(bytes.len()));
    }
    Ok(bytes.iter().fold(0u64, |n, &b| (n << 8) | b as u64))
}
