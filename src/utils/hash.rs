//! Content fingerprints using blake3.
//!
//! Fingerprints are embedded in artifact filenames (`app-<fingerprint>.js`),
//! so they must be stable across runs and platforms.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let fp = hash::fingerprint("body{}"); // -> 32 hex chars
//! ```

/// Number of hex characters kept from the digest.
pub const FINGERPRINT_LEN: usize = 32;

/// Compute the blake3 digest of byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> blake3::Hash {
    blake3::hash(data.as_ref())
}

/// Compute the hex fingerprint used in artifact filenames.
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(value: &T) -> String {
    let mut hex = hex::encode(compute(value).as_bytes());
    hex.truncate(FINGERPRINT_LEN);
    hex
}
