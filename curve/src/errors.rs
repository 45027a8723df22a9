//! Error types for decoding untrusted input.
//!
//! Only malformed external data is reported through [`DecodeError`]. Caller
//! bugs (division by zero, a recoding window outside `[2, 10]`) panic instead.

use thiserror::Error;

/// Errors that can occur while decoding field elements, scalars or points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input buffer does not have the size required by the wire format.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// A 64-bit limb is not below the Goldilocks modulus.
    #[error("field element limb is not canonical")]
    NonCanonicalFieldElement,

    /// A scalar is not below the group order where a reduced value is required.
    #[error("scalar is not reduced modulo the group order")]
    NonCanonicalScalar,

    /// The value is not the encoding of any group element.
    ///
    /// This happens when `(w^2 - a)^2 - 4b` is not a square and `w != 0`.
    #[error("value does not encode a curve point")]
    InvalidEncoding,
}

/// Result type for decoding operations.
pub type Result<T> = core::result::Result<T, DecodeError>;
