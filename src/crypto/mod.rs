pub mod hash;
pub mod signature;

pub use signature::{PrivateKey, Secp256k1Signer, Signer};
