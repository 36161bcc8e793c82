use sha2::{Digest, Sha512};

/// SHA-512 digest of raw bytes
pub fn sha512(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha512::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// SHA-512 digest as lowercase hex (128 chars, no prefix)
pub fn sha512_hex(data: &[u8]) -> String {
    hex::encode(sha512(data))
}
