//! Poly1305-style one-time authenticator.
//!
//! The message is evaluated as a polynomial over GF(2^130 - 5) like
//! Poly1305, with three differences that are part of the Vortex format:
//!
//! - the message is absorbed in little-endian 16-bit words, not 16-byte
//!   blocks, and odd-length messages get one zero byte appended;
//! - `r` is used as-is (no clamping);
//! - `s` is added modulo 2^130 - 5 before truncating to 128 bits.
//!
//! `r`, `s` and the tag are big-endian integers. Arithmetic uses five
//! 26-bit limbs in `u64` accumulators.

use zeroize::Zeroize;

use crate::arx::{permute, state_to_u8};
use crate::*;

pub const POLY_KEY_SIZE: usize = 32;

const LIMB_MASK: u64 = 0x3ffffff;

// ----------------------------------------------------------------------------
fn u128_to_limbs(v: u128) -> [u64; 5] {
    [
        (v as u64) & LIMB_MASK,
        ((v >> 26) as u64) & LIMB_MASK,
        ((v >> 52) as u64) & LIMB_MASK,
        ((v >> 78) as u64) & LIMB_MASK,
        (v >> 104) as u64,
    ]
}

// Low 128 bits of the limbs; limbs need not be normalized.
fn limbs_to_u128(h: &[u64; 5]) -> u128 {
    h.iter()
        .enumerate()
        .fold(0u128, |acc, (i, &l)| acc.wrapping_add((l as u128) << (26 * i)))
}

// ----------------------------------------------------------------------------
// Carries h into normalized limbs (folding 2^130 back as 5), then subtracts
// p once if h >= p. Correct for any h below 2p after the carry pass.
fn reduce(h: &mut [u64; 5]) {
    let mut c: u64;
    c = h[0] >> 26; h[0] &= LIMB_MASK; h[1] += c;
    c = h[1] >> 26; h[1] &= LIMB_MASK; h[2] += c;
    c = h[2] >> 26; h[2] &= LIMB_MASK; h[3] += c;
    c = h[3] >> 26; h[3] &= LIMB_MASK; h[4] += c;
    c = h[4] >> 26; h[4] &= LIMB_MASK; h[0] += c * 5;
    c = h[0] >> 26; h[0] &= LIMB_MASK; h[1] += c;

    // g = h + 5 - 2^130
    let mut g = [0u64; 5];
    g[0] = h[0] + 5;
    c = g[0] >> 26; g[0] &= LIMB_MASK;
    g[1] = h[1] + c;
    c = g[1] >> 26; g[1] &= LIMB_MASK;
    g[2] = h[2] + c;
    c = g[2] >> 26; g[2] &= LIMB_MASK;
    g[3] = h[3] + c;
    c = g[3] >> 26; g[3] &= LIMB_MASK;
    g[4] = (h[4] + c).wrapping_sub(1 << 26);

    // all ones when g did not go negative
    let select = (g[4] >> 63).wrapping_sub(1);
    for (hi, gi) in h.iter_mut().zip(g.iter()) {
        *hi = (*hi & !select) | (gi & select);
    }
}

/// Accumulator for one message under one `(r, s)` pair. Never reuse.
pub struct Poly1305 {
    r: [u64; 5],
    s: [u64; 5],
    h: [u64; 5],
    pending: Option<u8>,
}

impl Poly1305 {
    pub fn new(one_time_key: &[u8; POLY_KEY_SIZE]) -> Poly1305 {
        let mut r_bytes = [0u8; 16];
        let mut s_bytes = [0u8; 16];
        r_bytes.copy_from_slice(&one_time_key[..16]);
        s_bytes.copy_from_slice(&one_time_key[16..]);

        let r = u128_to_limbs(u128::from_be_bytes(r_bytes));
        let s = u128_to_limbs(u128::from_be_bytes(s_bytes));
        r_bytes.zeroize();
        s_bytes.zeroize();

        Poly1305 { r, s, h: [0; 5], pending: None }
    }

    // h = ((h + w) * r) mod 2^130 - 5, partially reduced
    fn absorb_word(&mut self, w: u16) {
        self.h[0] += w as u64;

        let [h0, h1, h2, h3, h4] = self.h;
        let [r0, r1, r2, r3, r4] = self.r;

        let r1_5 = r1 * 5;
        let r2_5 = r2 * 5;
        let r3_5 = r3 * 5;
        let r4_5 = r4 * 5;

        let d0 = h0 * r0 + h1 * r4_5 + h2 * r3_5 + h3 * r2_5 + h4 * r1_5;
        let mut d1 = h0 * r1 + h1 * r0 + h2 * r4_5 + h3 * r3_5 + h4 * r2_5;
        let mut d2 = h0 * r2 + h1 * r1 + h2 * r0 + h3 * r4_5 + h4 * r3_5;
        let mut d3 = h0 * r3 + h1 * r2 + h2 * r1 + h3 * r0 + h4 * r4_5;
        let mut d4 = h0 * r4 + h1 * r3 + h2 * r2 + h3 * r1 + h4 * r0;

        let mut c: u64;
        c = d0 >> 26; self.h[0] = d0 & LIMB_MASK; d1 += c;
        c = d1 >> 26; self.h[1] = d1 & LIMB_MASK; d2 += c;
        c = d2 >> 26; self.h[2] = d2 & LIMB_MASK; d3 += c;
        c = d3 >> 26; self.h[3] = d3 & LIMB_MASK; d4 += c;
        c = d4 >> 26; self.h[4] = d4 & LIMB_MASK;
        self.h[0] += c * 5;
        c = self.h[0] >> 26; self.h[0] &= LIMB_MASK; self.h[1] += c;
    }

    /// Absorbs bytes; may be called repeatedly, a trailing odd byte is held
    /// until the next call or `finalize`.
    pub fn update(&mut self, data: &[u8]) {
        let mut data = data;
        if let Some(lo) = self.pending.take() {
            match data.split_first() {
                Some((&hi, rest)) => {
                    self.absorb_word(u16::from_le_bytes([lo, hi]));
                    data = rest;
                }
                None => {
                    self.pending = Some(lo);
                    return;
                }
            }
        }
        let mut words = data.chunks_exact(2);
        for w in &mut words {
            self.absorb_word(u16::from_le_bytes([w[0], w[1]]));
        }
        if let [last] = words.remainder() {
            self.pending = Some(*last);
        }
    }

    pub fn finalize(mut self) -> [u8; TAG_SIZE] {
        if let Some(lo) = self.pending.take() {
            self.absorb_word(u16::from_le_bytes([lo, 0]));
        }

        let mut h = self.h;
        reduce(&mut h);
        for (hi, si) in h.iter_mut().zip(self.s.iter()) {
            *hi += si;
        }
        reduce(&mut h);

        let tag = limbs_to_u128(&h).to_be_bytes();
        h.zeroize();
        tag
    }
}

impl Drop for Poly1305 {
    fn drop(&mut self) {
        self.r.zeroize();
        self.s.zeroize();
        self.h.zeroize();
    }
}

// ----------------------------------------------------------------------------
/// Derives the one-time key: permute Key ‖ Nonce ‖ Counter and keep the
/// first 8 words.
pub fn poly_key(key: &Key, nonce: &Nonce, counter: &Counter) -> [u8; POLY_KEY_SIZE] {
    let mut b: State = [0; 16];
    b[..8].copy_from_slice(key);
    b[8..14].copy_from_slice(nonce);
    b[14..].copy_from_slice(counter);
    permute(&mut b);

    let mut otk = [0u8; POLY_KEY_SIZE];
    state_to_u8(&b[..8], &mut otk);
    b.zeroize();
    otk
}

// ----------------------------------------------------------------------------
/// Computes the tag of `msg` under a one-time key.
pub fn tag(msg: &[u8], one_time_key: &[u8; POLY_KEY_SIZE]) -> [u8; TAG_SIZE] {
    let mut mac = Poly1305::new(one_time_key);
    mac.update(msg);
    mac.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_tag_is_s() {
        let mut otk = [0u8; 32];
        for (i, b) in otk.iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        assert_eq!(tag(&[], &otk)[..], otk[16..]);
    }

    #[test]
    fn odd_length_is_zero_padded() {
        let otk = [0x5au8; 32];
        assert_eq!(tag(b"abc", &otk), tag(b"abc\0", &otk));
        assert_ne!(tag(b"abc", &otk), tag(b"abcd", &otk));
    }

    #[test]
    fn split_updates_match_one_shot() {
        let otk = [0xa7u8; 32];
        let msg: [u8; 37] = core::array::from_fn(|i| (i * 7) as u8);

        let mut mac = Poly1305::new(&otk);
        mac.update(&msg[..3]);
        mac.update(&msg[3..4]);
        mac.update(&[]);
        mac.update(&msg[4..]);
        assert_eq!(mac.finalize(), tag(&msg, &otk));
    }

    #[test]
    fn known_tags() {
        let mut otk = [0u8; 32];
        for (i, b) in otk.iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        assert_eq!(tag(b"abc", &otk),
                   [1, 218, 48, 247, 29, 149, 79, 60, 77, 115, 159, 194, 205, 177, 95, 29]);

        // r and s at their maximum exercise both final reductions
        assert_eq!(tag(&[0xff; 1001], &[0xff; 32]),
                   [172, 92, 234, 188, 161, 220, 94, 58, 71, 250, 106, 145, 53, 17, 111, 89]);

        // unclamped r (top bits set) over a long odd-length message
        let otk: [u8; 32] = core::array::from_fn(|i| (0xf0 | i as u8) ^ (i as u8).wrapping_mul(37));
        let msg: Vec<u8> = (0..777u32).map(|i| (i * 131 + 7) as u8).collect();
        assert_eq!(otk[0], 240);
        assert_eq!(tag(&msg, &otk),
                   [87, 148, 254, 70, 207, 141, 75, 88, 228, 195, 140, 87, 207, 207, 179, 139]);
    }
}
