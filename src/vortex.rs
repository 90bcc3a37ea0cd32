use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, warn};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use crate::arx::{permute, state_to_u8, u8_to_words};
use crate::poly1305::{poly_key, tag};
use crate::*;

// "+V0rt3x^", little-endian
pub const SIGNATURE: [u32; 2] = [1915770411, 1584935796];

const COUNTER_ROUNDS: usize = 16;

/// Where the nonce of a message lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NonceMode {
    /// A fresh nonce is drawn from the rng and prefixed to the output:
    /// Nonce ‖ Ciphertext ‖ Tag.
    SelfGenerated,
    /// The caller owns the nonce and transports it out of band; the
    /// output is Ciphertext ‖ Tag.
    CallerSupplied([u8; NONCE_SIZE]),
}

impl NonceMode {
    pub fn caller_supplied(nonce: &[u8]) -> Result<NonceMode> {
        let nonce: [u8; NONCE_SIZE] = nonce
            .try_into()
            .map_err(|_| VortexError::InvalidNonceLength(nonce.len()))?;
        Ok(NonceMode::CallerSupplied(nonce))
    }

    /// Bytes added to the plaintext length by this mode.
    pub fn overhead(&self) -> usize {
        match self {
            NonceMode::SelfGenerated => NONCE_SIZE + TAG_SIZE,
            NonceMode::CallerSupplied(_) => TAG_SIZE,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            NonceMode::SelfGenerated => "self-generated",
            NonceMode::CallerSupplied(_) => "caller-supplied",
        }
    }
}

// ----------------------------------------------------------------------------
fn load_key(key: &[u8]) -> Result<Zeroizing<Key>> {
    if key.len() != KEY_SIZE {
        return Err(VortexError::InvalidKeyLength(key.len()));
    }
    Ok(Zeroizing::new(u8_to_words(key)))
}

// ----------------------------------------------------------------------------
/// Derives the initial block counter of a message from the key and nonce.
pub fn counter(key: &Key, nonce: &Nonce) -> Counter {
    let mut n = [0u32; 8];
    n[..6].copy_from_slice(nonce);
    n[6..].copy_from_slice(&SIGNATURE);

    let mut c: Counter = [key[0], n[0]];
    for i in 1..COUNTER_ROUNDS {
        let m = i % 8;
        let (x, y) = if i % 2 == 1 { (key[m], n[m]) } else { (n[m], key[m]) };
        let s = ((i * 7) % 32) as u32;

        c[0] = c[0].wrapping_sub(c[1]);
        c[0] ^= c[1];

        c[0] = c[0].wrapping_add(x);
        c[1] ^= y;

        c[0] = c[0].rotate_left(s);
        c[1] = c[1].rotate_left(s);

        c[0] ^= y;
        c[1] = c[1].wrapping_add(x);

        c[1] = c[1].wrapping_sub(c[0]);
        c[1] ^= c[0];
    }
    c
}

// ----------------------------------------------------------------------------
/// XORs the keystream into `data`. The counter is advanced once per 64 byte
/// block, alternating between its two words, starting with word 0.
pub fn apply_keystream(key: &Key, nonce: &Nonce, counter: &mut Counter, data: &mut [u8]) {
    let mut b: State = [0; 16];
    let mut ks = [0u8; STATE_SIZE];

    for (i, chunk) in data.chunks_mut(STATE_SIZE).enumerate() {
        b[..8].copy_from_slice(key);
        b[8..14].copy_from_slice(nonce);
        b[14..].copy_from_slice(counter);
        permute(&mut b);
        state_to_u8(&b, &mut ks);

        for (d, k) in chunk.iter_mut().zip(ks.iter()) {
            *d ^= k;
        }

        let w = i % 2;
        counter[w] = counter[w].wrapping_add(1);
    }

    b.zeroize();
    ks.zeroize();
}

/// Returns `len` bytes of keystream.
pub fn keystream(key: &Key, nonce: &Nonce, counter: &mut Counter, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    apply_keystream(key, nonce, counter, &mut out);
    out
}

// ----------------------------------------------------------------------------
// Appends Ciphertext ‖ Tag to out. The tag covers the plaintext and is keyed
// with the counter as left by the keystream.
fn seal(key: &Key, nonce_bytes: &[u8; NONCE_SIZE], plaintext: &[u8], out: &mut Vec<u8>) {
    let nonce: Nonce = u8_to_words(nonce_bytes);
    let mut c = counter(key, &nonce);

    let start = out.len();
    out.extend_from_slice(plaintext);
    apply_keystream(key, &nonce, &mut c, &mut out[start..]);

    let mut otk = poly_key(key, &nonce, &c);
    out.extend_from_slice(&tag(plaintext, &otk));
    otk.zeroize();
}

/// Encrypts and authenticates `plaintext` under a 32 byte key.
pub fn encrypt_with(plaintext: &[u8],
                    key: &[u8],
                    mode: NonceMode,
                    rng: &mut dyn SeedRng) -> Result<Vec<u8>> {
    let k = load_key(key)?;
    debug!("vortex encrypt: {} bytes, {} nonce", plaintext.len(), mode.label());

    let mut out = Vec::with_capacity(plaintext.len() + mode.overhead());
    match mode {
        NonceMode::SelfGenerated => {
            let mut nonce = [0u8; NONCE_SIZE];
            rng.fill(&mut nonce)?;
            out.extend_from_slice(&nonce);
            seal(&k, &nonce, plaintext, &mut out);
        }
        NonceMode::CallerSupplied(nonce) => {
            seal(&k, &nonce, plaintext, &mut out);
        }
    }
    Ok(out)
}

/// Decrypts the output of `encrypt_with` produced with the same mode.
///
/// Returns `VerificationFailed` when the tag does not match; the recovered
/// bytes are wiped and never returned in that case.
pub fn decrypt_with(data: &[u8], key: &[u8], mode: NonceMode) -> Result<Vec<u8>> {
    let k = load_key(key)?;
    let min = mode.overhead();
    if data.len() < min {
        return Err(VortexError::InvalidEnvelopeLength { got: data.len(), min });
    }
    debug!("vortex decrypt: {} bytes, {} nonce", data.len() - min, mode.label());

    let (nonce_bytes, body) = match mode {
        NonceMode::SelfGenerated => {
            let (n, rest) = data.split_at(NONCE_SIZE);
            let mut nonce = [0u8; NONCE_SIZE];
            nonce.copy_from_slice(n);
            (nonce, rest)
        }
        NonceMode::CallerSupplied(nonce) => (nonce, data),
    };
    let (ciphertext, received) = body.split_at(body.len() - TAG_SIZE);

    let nonce: Nonce = u8_to_words(&nonce_bytes);
    let mut c = counter(&k, &nonce);
    let mut plaintext = ciphertext.to_vec();
    apply_keystream(&k, &nonce, &mut c, &mut plaintext);

    let mut otk = poly_key(&k, &nonce, &c);
    let expected = tag(&plaintext, &otk);
    otk.zeroize();

    if bool::from(expected[..].ct_eq(received)) {
        Ok(plaintext)
    } else {
        plaintext.zeroize();
        warn!("vortex decrypt: authentication tag mismatch");
        Err(VortexError::VerificationFailed)
    }
}

/// Encrypts with a nonce drawn from `rng`: Nonce ‖ Ciphertext ‖ Tag.
pub fn encrypt_with_rng(plaintext: &[u8], key: &[u8], rng: &mut dyn SeedRng) -> Result<Vec<u8>> {
    encrypt_with(plaintext, key, NonceMode::SelfGenerated, rng)
}

/// Encrypts with a nonce from the operating system: Nonce ‖ Ciphertext ‖ Tag.
#[cfg(feature = "getrandom")]
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    encrypt_with_rng(plaintext, key, &mut OsRandom)
}

/// Opens a Nonce ‖ Ciphertext ‖ Tag envelope.
pub fn decrypt(envelope: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    decrypt_with(envelope, key, NonceMode::SelfGenerated)
}

// ----------------------------------------------------------------------------
// Text transport of envelopes.
pub fn encode_envelope(envelope: &[u8]) -> String {
    STANDARD.encode(envelope)
}

pub fn decode_envelope(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|_| VortexError::InvalidArgumentType("envelope is not base64 text"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq_key() -> Key {
        u8_to_words(&core::array::from_fn::<u8, 32, _>(|i| i as u8))
    }

    fn seq_nonce() -> Nonce {
        u8_to_words(&core::array::from_fn::<u8, 24, _>(|i| 100 + i as u8))
    }

    #[test]
    fn counter_vectors() {
        assert_eq!(counter(&[0; 8], &[0; 6]), [1602460574, 3546462946]);
        assert_eq!(counter(&seq_key(), &seq_nonce()), [1818814872, 1973970213]);
    }

    #[test]
    fn keystream_alternates_counter_words() {
        let mut c = counter(&seq_key(), &seq_nonce());
        let ks = keystream(&seq_key(), &seq_nonce(), &mut c, 200);
        assert_eq!(ks[192..], [97, 150, 236, 26, 202, 46, 153, 71]);
        // 4 blocks: words 0, 1, 0, 1
        assert_eq!(c, [1818814874, 1973970215]);
    }

    #[test]
    fn zero_length_keystream_leaves_counter() {
        let mut c = [7, 9];
        assert!(keystream(&[0; 8], &[0; 6], &mut c, 0).is_empty());
        assert_eq!(c, [7, 9]);
    }

    #[test]
    fn caller_supplied_nonce_length_is_checked() {
        assert_eq!(NonceMode::caller_supplied(&[0; 23]),
                   Err(VortexError::InvalidNonceLength(23)));
        assert!(NonceMode::caller_supplied(&[0; 24]).is_ok());
    }

    #[test]
    fn envelope_text_form() {
        let env = [0u8, 1, 2, 250, 251];
        assert_eq!(decode_envelope(&encode_envelope(&env)).unwrap(), env);
        assert_eq!(decode_envelope("not base64!"),
                   Err(VortexError::InvalidArgumentType("envelope is not base64 text")));
    }
}
