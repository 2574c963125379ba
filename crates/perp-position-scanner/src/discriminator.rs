//! Account discriminators
//!
//! A discriminator is the first 8 bytes of `sha256("account:" + name)`,
//! stored at offset 0 of every account of that type.

use sha2::{Digest, Sha256};
use std::fmt;

/// Namespace prefix hashed in front of the account type name.
pub const ACCOUNT_NAMESPACE: &str = "account:";

pub const DISCRIMINATOR_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Discriminator([u8; DISCRIMINATOR_LEN]);

impl Discriminator {
    pub const fn from_bytes(bytes: [u8; DISCRIMINATOR_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DISCRIMINATOR_LEN] {
        &self.0
    }

    /// Base-58 form, as expected by memcmp filters.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Derive the discriminator for an account type name.
pub fn account_discriminator(account_name: &str) -> Discriminator {
    let mut hasher = Sha256::new();
    hasher.update(ACCOUNT_NAMESPACE.as_bytes());
    hasher.update(account_name.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; DISCRIMINATOR_LEN];
    bytes.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    Discriminator(bytes)
}
