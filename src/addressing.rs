//! Deterministic ledger addresses for the xo family.

use crate::{
    constants::{FAMILY_NAME, NAMESPACE_PREFIX_LEN, RECORD_SUFFIX_LEN},
    crypto::hash,
};

/// SHA-512 of `input`, lowercase hex.
pub fn hash(input: &[u8]) -> String {
    hash::sha512_hex(input)
}

/// First 6 hex chars of `hash("xo")`. Used alone as a range filter for all games.
pub fn namespace_prefix() -> String {
    let mut prefix = hash(FAMILY_NAME.as_bytes());
    prefix.truncate(NAMESPACE_PREFIX_LEN);
    prefix
}

/// 70-char address of the game record keyed by `key`.
pub fn record_address(key: &str) -> String {
    let digest = hash(key.as_bytes());
    format!("{}{}", namespace_prefix(), &digest[..RECORD_SUFFIX_LEN])
}
