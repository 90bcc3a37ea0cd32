use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::*;

// ----------------------------------------------------------------------------
// Operating system entropy.
#[cfg(feature = "getrandom")]
pub struct OsRandom;

#[cfg(feature = "getrandom")]
impl SeedRng for OsRandom {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        getrandom::getrandom(buf).map_err(|e| VortexError::RandomSource(e.to_string()))
    }
}

// ----------------------------------------------------------------------------
/// `n` bytes from `rng`, or `None` when `n` is 0.
pub fn random_bytes_with(rng: &mut dyn SeedRng, n: usize) -> Result<Option<Vec<u8>>> {
    if n < 1 {
        return Ok(None);
    }
    let mut bytes = vec![0u8; n];
    rng.fill(&mut bytes)?;
    Ok(Some(bytes))
}

/// Same as `random_bytes_with`, base64 encoded.
pub fn random_bytes_base64_with(rng: &mut dyn SeedRng, n: usize) -> Result<Option<String>> {
    Ok(random_bytes_with(rng, n)?.map(|b| STANDARD.encode(b)))
}

#[cfg(feature = "getrandom")]
pub fn random_bytes(n: usize) -> Result<Option<Vec<u8>>> {
    random_bytes_with(&mut OsRandom, n)
}

#[cfg(feature = "getrandom")]
pub fn random_bytes_base64(n: usize) -> Result<Option<String>> {
    random_bytes_base64_with(&mut OsRandom, n)
}
