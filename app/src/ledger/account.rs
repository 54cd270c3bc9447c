//! Accounts and local signatures
//!
//! Keypairs are random secrets with a Keccak-256 derived address. A
//! signature is a keyed MAC over a transaction digest; the local ledger
//! keeps the secrets of accounts it registered and checks MACs against
//! them. That is a test-harness shortcut, not wire-grade cryptography, in
//! the same way the original local blockchain trusted the keys it minted.

use std::fmt;

use rand::RngCore;
use sha3::{Digest, Keccak256};

const ADDRESS_DOMAIN: &[u8] = b"mortgage-zkapp/address";
const SIGNATURE_DOMAIN: &[u8] = b"mortgage-zkapp/signature";

/// A 32-byte account address
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 32]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex with `0x` prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

/// A random secret with its derived address
#[derive(Clone)]
pub struct Keypair {
    secret: [u8; 32],
    address: Address,
}

impl Keypair {
    /// Generate a fresh keypair from a cryptographic RNG
    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        let mut secret = [0u8; 32];
        rng.fill_bytes(&mut secret);
        Self::from_secret(secret)
    }

    fn from_secret(secret: [u8; 32]) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(ADDRESS_DOMAIN);
        hasher.update(secret);
        let address = Address(hasher.finalize().into());

        Self { secret, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// MAC over a transaction digest
    pub fn sign(&self, digest: &[u8; 32]) -> Signature {
        Signature {
            signer: self.address,
            mac: signature_mac(&self.secret, digest),
        }
    }

    pub(crate) fn secret_bytes(&self) -> &[u8; 32] {
        &self.secret
    }
}

/// A signature over a transaction digest
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    pub signer: Address,
    pub mac: [u8; 32],
}

pub(crate) fn signature_mac(secret: &[u8; 32], digest: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(SIGNATURE_DOMAIN);
    hasher.update(secret);
    hasher.update(digest);
    hasher.finalize().into()
}
