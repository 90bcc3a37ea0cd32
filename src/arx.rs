use crate::*;

pub const ROUNDS: usize = 20;

// ----------------------------------------------------------------------------
// Fills dst with the little-endian bytes of the words, as many as fit.
pub fn state_to_u8(state: &[u32], dst: &mut [u8]) {
    for (chunk, val) in dst.chunks_mut(4).zip(state.iter()) {
        let bytes = val.to_le_bytes();
        chunk.copy_from_slice(&bytes[..chunk.len()]);
    }
}

// ----------------------------------------------------------------------------
// Reads little-endian words; src.len() must be 4 * N.
pub fn u8_to_words<const N: usize>(src: &[u8]) -> [u32; N] {
    debug_assert_eq!(src.len(), 4 * N);
    let mut words = [0u32; N];
    for (w, chunk) in words.iter_mut().zip(src.chunks_exact(4)) {
        *w = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}

// ----------------------------------------------------------------------------
// The Vortex quarter round. Mixes add, sub, xor and rotations by 11, 17, 13
// and 7; a, b, c and d must be distinct. Works on any state length so the
// prng counter (4 words) shares it with the 16 words block.
#[inline(always)]
pub fn mix(state: &mut [u32], a: usize, b: usize, c: usize, d: usize) {
    // step 1
    state[a] = state[a].wrapping_add(state[b]);
    state[b] = state[b].wrapping_sub(state[c]);
    state[c] = state[c].rotate_left(11);
    state[d] ^= state[a];

    // step 2
    state[a] = state[a].wrapping_sub(state[c]);
    state[b] = state[b].rotate_left(17);
    state[c] ^= state[d];
    state[d] = state[d].wrapping_add(state[b]);

    // step 3
    state[a] = state[a].rotate_left(13);
    state[b] ^= state[d];
    state[c] = state[c].wrapping_add(state[a]);
    state[d] = state[d].wrapping_sub(state[c]);

    // step 4
    state[a] ^= state[d];
    state[b] = state[b].wrapping_add(state[c]);
    state[c] = state[c].wrapping_sub(state[b]);
    state[d] = state[d].rotate_left(7);
}

// ----------------------------------------------------------------------------
// 20 double rounds in place. Unlike ChaCha20 the input is not added back.
pub fn permute(state: &mut State) {
    for _ in 0..ROUNDS {

        // column rounds
        mix(state, 0, 4, 8, 12);
        mix(state, 1, 5, 9, 13);
        mix(state, 2, 6, 10, 14);
        mix(state, 3, 7, 11, 15);

        // diagonal rounds
        mix(state, 0, 5, 10, 15);
        mix(state, 1, 6, 11, 12);
        mix(state, 2, 7, 8, 13);
        mix(state, 3, 4, 9, 14);
    }
}
