use crate::{
    constants::{HASH_INPUT_SIZE, NONCE_OFFSET},
    error::MineError,
    hex_hash, merkle_root,
    pow::meets_difficulty,
    sha256, Hash, Transaction, ZERO_HASH,
};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

pub(crate) fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs()
}

/// A batch of transactions linked to its predecessor and sealed by proof-of-work.
///
/// `hash` is `None` until first computed. Afterwards it holds the digest of the
/// other fields as of the last (re)computation; editing a field without calling
/// [`Block::assign_hash`] leaves it stale, which chain validation reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: u64,
    pub transactions: Vec<Transaction>,
    #[serde(serialize_with = "hex_hash::serialize")]
    pub prior_hash: Hash,
    pub nonce: u64,
    #[serde(serialize_with = "hex_hash::serialize_opt")]
    pub hash: Option<Hash>,
}

impl Block {
    pub fn new(index: u64, prior_hash: Hash, transactions: Vec<Transaction>) -> Self {
        Self {
            index,
            timestamp: now_secs(),
            transactions,
            prior_hash,
            nonce: 0,
            hash: None,
        }
    }

    /// Index 0, no transactions, zeroed prior hash. Hashed but not mined.
    pub fn genesis() -> Self {
        let mut genesis = Self::new(0, ZERO_HASH, vec![]);
        genesis.assign_hash();
        genesis
    }

    pub fn tx_root(&self) -> Hash {
        merkle_root(&self.transactions)
    }

    /// Canonical hash input for the current field values.
    pub fn hash_bytes(&self) -> [u8; HASH_INPUT_SIZE] {
        self.hash_bytes_with(&self.tx_root(), self.nonce)
    }

    pub(crate) fn hash_bytes_with(&self, tx_root: &Hash, nonce: u64) -> [u8; HASH_INPUT_SIZE] {
        let mut bytes = [0u8; HASH_INPUT_SIZE];
        bytes[0..8].copy_from_slice(&self.index.to_le_bytes());
        bytes[8..40].copy_from_slice(&self.prior_hash);
        bytes[40..48].copy_from_slice(&self.timestamp.to_le_bytes());
        bytes[48..NONCE_OFFSET].copy_from_slice(tx_root);
        bytes[NONCE_OFFSET..].copy_from_slice(&nonce.to_le_bytes());
        bytes
    }

    /// Digest of the block's current fields. Does not touch `self.hash`.
    pub fn compute_hash(&self) -> Hash {
        sha256(&self.hash_bytes())
    }

    /// Recompute and store the digest.
    pub fn assign_hash(&mut self) -> Hash {
        let hash = self.compute_hash();
        self.hash = Some(hash);
        hash
    }

    pub fn hash_hex(&self) -> Option<String> {
        self.hash.map(hex::encode)
    }

    /// Increment the nonce until the hex digest has at least `difficulty`
    /// leading zeros. Starts from the current nonce and stored hash, so a
    /// block whose hash already qualifies is left untouched.
    pub fn mine(&mut self, difficulty: u32) -> Hash {
        let tx_root = self.tx_root();
        let mut hash = self.stored_or_assign();
        while !meets_difficulty(&hash, difficulty) {
            hash = self.next_nonce(&tx_root);
        }
        info!(
            "Block mined! index {} nonce {} hash {}",
            self.index,
            self.nonce,
            hex::encode(hash)
        );
        hash
    }

    /// Like [`Block::mine`] but gives up after `max_attempts` nonce increments.
    /// On exhaustion the block keeps the last nonce tried, with a matching hash.
    pub fn mine_bounded(&mut self, difficulty: u32, max_attempts: u64) -> Result<Hash, MineError> {
        let tx_root = self.tx_root();
        let mut hash = self.stored_or_assign();
        let mut attempts = 0u64;
        while !meets_difficulty(&hash, difficulty) {
            if attempts == max_attempts {
                warn!(index = self.index, attempts, "nonce search exhausted");
                return Err(MineError::Exhausted {
                    index: self.index,
                    attempts,
                });
            }
            hash = self.next_nonce(&tx_root);
            attempts += 1;
        }
        info!(
            "Block mined! index {} nonce {} hash {} after {} attempts",
            self.index,
            self.nonce,
            hex::encode(hash),
            attempts
        );
        Ok(hash)
    }

    fn stored_or_assign(&mut self) -> Hash {
        match self.hash {
            Some(hash) => hash,
            None => self.assign_hash(),
        }
    }

    fn next_nonce(&mut self, tx_root: &Hash) -> Hash {
        self.nonce = self.nonce.wrapping_add(1);
        let hash = sha256(&self.hash_bytes_with(tx_root, self.nonce));
        self.hash = Some(hash);
        hash
    }
}
