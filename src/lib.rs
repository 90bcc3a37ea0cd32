pub trait SeedRng { fn fill(&mut self, buf: &mut [u8]) -> Result<()>; }

pub const KEY_SIZE: usize = 32;         // bytes
pub const NONCE_SIZE: usize = 24;       // bytes
pub const TAG_SIZE: usize = 16;         // bytes
pub const STATE_SIZE: usize = 64;       // bytes per block

pub type Key = [u32; 8];                // 256 bits key, little-endian words.
pub type Nonce = [u32; 6];              // 192 bits nonce.
pub type Counter = [u32; 2];            // derived from key and nonce, per message.
pub type State = [u32; 16];             // one block.

pub mod arx; // Quarter round and block permutation, shared by the cipher and the prng.
pub mod error;
pub mod poly1305;
pub mod prng;
pub mod random;
pub mod vortex;

pub use error::{Result, VortexError};
pub use prng::{entropy, prng, seed, to_number, Seed};
#[cfg(feature = "getrandom")]
pub use random::{random_bytes, random_bytes_base64, OsRandom};
#[cfg(feature = "getrandom")]
pub use vortex::encrypt;
pub use vortex::{decode_envelope, decrypt, decrypt_with, encode_envelope, encrypt_with, encrypt_with_rng, NonceMode};
