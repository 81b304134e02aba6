//! A minimal proof-of-work ledger: transactions are batched into blocks, each
//! block is linked to its predecessor by hash and sealed with a nonce, and
//! balances are derived by replaying the whole chain.

pub mod block;
pub mod chain;
pub mod constants;
pub mod error;
pub mod mine;
pub mod transaction;

use sha2::{Digest, Sha256};

pub use block::Block;
pub use chain::{Chain, ChainConfig};
pub use error::{ConfigError, MineError, ValidationError};
pub use transaction::Transaction;

pub type Hash = [u8; constants::HASH_SIZE];

/// Prior-hash sentinel carried by the genesis block; also the root of an empty batch.
pub const ZERO_HASH: Hash = [0u8; constants::HASH_SIZE];

pub fn sha256(bytes: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..]);
    out
}

/// Binary Merkle root over the transactions' leaf hashes. An odd node at any
/// level is paired with itself.
pub fn merkle_root(txs: &[Transaction]) -> Hash {
    if txs.is_empty() {
        return ZERO_HASH;
    }
    let mut level: Vec<Hash> = txs.iter().map(Transaction::leaf_hash).collect();

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            let (a, b) = if pair.len() == 2 {
                (pair[0], pair[1])
            } else {
                (pair[0], pair[0])
            };
            let mut hasher = Sha256::new();
            hasher.update(a);
            hasher.update(b);
            let digest = hasher.finalize();
            let mut out = [0u8; 32];
            out.copy_from_slice(&digest[..]);
            next.push(out);
        }
        level = next;
    }
    level[0]
}

pub mod pow {
    use super::Hash;

    pub fn count_leading_zero_bits(hash: &Hash) -> u32 {
        let mut total = 0u32;
        for b in hash {
            if *b == 0 {
                total += 8;
            } else {
                total += b.leading_zeros();
                break;
            }
        }
        total
    }

    /// Number of leading `'0'` characters in the lowercase hex encoding of `hash`.
    pub fn leading_zero_hex_digits(hash: &Hash) -> u32 {
        count_leading_zero_bits(hash) / 4
    }

    /// True when the hex digest starts with at least `difficulty` zeros.
    pub fn meets_difficulty(hash: &Hash, difficulty: u32) -> bool {
        leading_zero_hex_digits(hash) >= difficulty
    }
}

/// Serde helpers rendering digests as lowercase hex strings.
pub(crate) mod hex_hash {
    use super::Hash;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(hash: &Hash, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(hash))
    }

    pub fn serialize_opt<S: Serializer>(hash: &Option<Hash>, s: S) -> Result<S::Ok, S::Error> {
        match hash {
            Some(h) => s.serialize_some(&hex::encode(h)),
            None => s.serialize_none(),
        }
    }
}
