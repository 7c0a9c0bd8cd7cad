//! SHA-256 digests over raw bytes and over canonical JSON.
//!
//! - `sha256_canonical(..)` for values/structs (goes through canonical_json).
//! - `sha256_hex(..)` for raw bytes.
//! - Hex digests are lowercase, 64 chars.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical_json::to_canonical_bytes;
use crate::{IoError, IoResult};

fn to_lower_hex(bytes: &[u8]) -> String {
    const LUT: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(LUT[(b >> 4) as usize] as char);
        out.push(LUT[(b & 0x0F) as usize] as char);
    }
    out
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    to_lower_hex(&Sha256::digest(bytes))
}

/// SHA-256 over the canonical JSON bytes of `value`.
pub fn sha256_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    let bytes = to_canonical_bytes(value).map_err(|e| IoError::Hash(e.to_string()))?;
    Ok(sha256_hex(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hex_encoding_is_lowercase() {
        let h = sha256_hex(b"abc");
        assert_eq!(h, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn canonical_hashing_ignores_field_order() {
        #[derive(Serialize)]
        struct T {
            seats: u32,
            district: u32,
        }
        let h1 = sha256_canonical(&T { seats: 5, district: 1 }).unwrap();
        let h2 = sha256_canonical(&json!({"district":1,"seats":5})).unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1, sha256_hex(br#"{"district":1,"seats":5}"#));
    }
}
