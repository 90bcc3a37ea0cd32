use thiserror::Error;

use crate::{KEY_SIZE, NONCE_SIZE};

/// Errors returned by the Vortex operations.
///
/// Length and representation errors are caller mistakes and are reported
/// before any cryptographic work starts. `VerificationFailed` is the normal
/// outcome of `decrypt` on a forged or corrupted envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VortexError {
    /// Input was not in the expected representation (e.g. not base64).
    #[error("Invalid argument: {0}")]
    InvalidArgumentType(&'static str),

    #[error("Invalid key length: expected {KEY_SIZE} bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Invalid nonce length: expected {NONCE_SIZE} bytes, got {0}")]
    InvalidNonceLength(usize),

    /// Envelope too short to hold the nonce (if embedded) and the tag.
    #[error("Invalid envelope length: got {got} bytes, need at least {min}")]
    InvalidEnvelopeLength { got: usize, min: usize },

    /// Authentication tag mismatch. Never carries the recovered plaintext.
    #[error("Verification failed")]
    VerificationFailed,

    #[error("Number too large: {0} bytes (max 6)")]
    NumberTooLarge(usize),

    /// The secure random source could not deliver bytes.
    #[error("Random source failed: {0}")]
    RandomSource(String),
}

pub type Result<T> = core::result::Result<T, VortexError>;
