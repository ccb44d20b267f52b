//! Deterministic short code derivation.
//!
//! A code is derived from its seed by hashing, so the same URL always maps
//! to the same 6-character Base62 code. Collisions are resolved one level up
//! in [`crate::application::services::LinkService`] by re-seeding with a
//! nanosecond timestamp.

use sha2::{Digest, Sha256};

/// Base62 alphabet, digits then lowercase then uppercase.
const BASE62_CHARS: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of every generated short code.
pub const CODE_LENGTH: usize = 6;

/// Derives a 6-character Base62 code from a seed string.
///
/// # Algorithm
///
/// 1. SHA-256 of the seed's UTF-8 bytes.
/// 2. First 8 digest bytes interpreted as a big-endian signed 64-bit value.
/// 3. `wrapping_abs()` of that value. `i64::MIN` stays negative and encodes
///    to `"000000"`; this matches the upstream two's-complement overflow
///    behavior at the boundary.
/// 4. Base62 encoding by repeated division, keeping the 6 least-significant
///    digits and left-padding with '0'.
///
/// # Examples
///
/// ```
/// use shortlink::utils::code_generator::generate_code;
///
/// assert_eq!(generate_code("https://example.com/a"), "hmXSNu");
/// assert_eq!(generate_code("https://example.com/a").len(), 6);
/// ```
pub fn generate_code(seed: &str) -> String {
    let digest = Sha256::digest(seed.as_bytes());

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let hash_value = i64::from_be_bytes(head).wrapping_abs();

    encode_base62(hash_value, CODE_LENGTH)
}

/// Encodes the low-order Base62 digits of `value` into a fixed-width string.
///
/// Digits are produced least-significant first and prepended, stopping once
/// `length` digits are collected; non-positive values encode as all-'0'
/// padding.
fn encode_base62(mut value: i64, length: usize) -> String {
    let mut encoded = std::collections::VecDeque::with_capacity(length);

    while value > 0 && encoded.len() < length {
        let remainder = (value % 62) as usize;
        encoded.push_front(BASE62_CHARS[remainder] as char);
        value /= 62;
    }

    while encoded.len() < length {
        encoded.push_front('0');
    }

    encoded.into_iter().collect()
}
