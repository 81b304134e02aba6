use crate::{
    constants::{DEFAULT_DIFFICULTY, DEFAULT_MINING_REWARD, MAX_DIFFICULTY},
    error::{ConfigError, MineError, ValidationError},
    mine::mine_block_parallel,
    pow::meets_difficulty,
    Block, Hash, Transaction,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Mining policy fixed at chain construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Required leading zero hex digits, `1..=MAX_DIFFICULTY`.
    pub difficulty: u32,
    /// Amount minted to the miner of each block.
    pub reward: i64,
}

impl ChainConfig {
    pub fn new(difficulty: u32, reward: i64) -> Result<Self, ConfigError> {
        let config = Self { difficulty, reward };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.difficulty == 0 {
            return Err(ConfigError::ZeroDifficulty);
        }
        if self.difficulty > MAX_DIFFICULTY {
            return Err(ConfigError::DifficultyTooHigh {
                difficulty: self.difficulty,
                max: MAX_DIFFICULTY,
            });
        }
        Ok(())
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            reward: DEFAULT_MINING_REWARD,
        }
    }
}

/// Append-only sequence of blocks plus the queue of transactions waiting for
/// the next one.
///
/// Always holds the genesis block. Every later block links to its predecessor's
/// hash and carries proof-of-work at the chain's difficulty.
#[derive(Clone, Debug)]
pub struct Chain {
    blocks: Vec<Block>,
    difficulty: u32,
    pending: Vec<Transaction>,
    reward: i64,
}

impl Default for Chain {
    fn default() -> Self {
        Self::from_valid_config(ChainConfig::default())
    }
}

impl Chain {
    /// Genesis only, default difficulty and reward.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ChainConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: ChainConfig) -> Self {
        let genesis = Self::create_genesis();
        info!(
            difficulty = config.difficulty,
            reward = config.reward,
            genesis = %hex::encode(genesis.hash.unwrap_or_default()),
            "chain created"
        );
        Self {
            blocks: vec![genesis],
            difficulty: config.difficulty,
            pending: Vec::new(),
            reward: config.reward,
        }
    }

    fn create_genesis() -> Block {
        Block::genesis()
    }

    pub fn config(&self) -> ChainConfig {
        ChainConfig {
            difficulty: self.difficulty,
            reward: self.reward,
        }
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn reward(&self) -> i64 {
        self.reward
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Index of the newest block.
    pub fn height(&self) -> u64 {
        self.last_block().index
    }

    pub fn last_block(&self) -> &Block {
        self.blocks
            .last()
            .expect("chain always holds the genesis block")
    }

    /// Queue `tx` for the next block. Neither balance nor amount is checked.
    pub fn submit_transaction(&mut self, tx: Transaction) {
        debug!(%tx, pending = self.pending.len() + 1, "transaction submitted");
        self.pending.push(tx);
    }

    /// Seal the pending batch into a new block, append it, and queue a reward
    /// for `reward_address`. Blocks until proof-of-work is found.
    pub fn mine_pending(&mut self, reward_address: impl Into<String>) -> &Block {
        let mut block = self.next_block();
        block.assign_hash();
        block.mine(self.difficulty);
        self.append(block, reward_address.into())
    }

    /// As [`Chain::mine_pending`], but gives up after `max_attempts` nonces.
    /// On failure neither the blocks nor the pending queue change.
    pub fn try_mine_pending(
        &mut self,
        reward_address: impl Into<String>,
        max_attempts: u64,
    ) -> Result<&Block, MineError> {
        let mut block = self.next_block();
        block.assign_hash();
        block.mine_bounded(self.difficulty, max_attempts)?;
        Ok(self.append(block, reward_address.into()))
    }

    /// As [`Chain::mine_pending`], searching nonces on all cores.
    pub fn mine_pending_parallel(
        &mut self,
        reward_address: impl Into<String>,
    ) -> Result<&Block, MineError> {
        let mut block = self.next_block();
        block.assign_hash();
        let block = mine_block_parallel(block, self.difficulty)?;
        Ok(self.append(block, reward_address.into()))
    }

    /// Candidate successor holding a snapshot of the pending queue.
    fn next_block(&self) -> Block {
        let last = self.last_block();
        Block::new(last.index + 1, self.tip_hash(), self.pending.clone())
    }

    fn tip_hash(&self) -> Hash {
        self.last_block()
            .hash
            .expect("appended blocks are always hashed")
    }

    fn append(&mut self, block: Block, reward_address: String) -> &Block {
        debug!(
            index = block.index,
            txs = block.transactions.len(),
            "appending block"
        );
        self.blocks.push(block);
        self.pending = vec![Transaction::reward(reward_address, self.reward)];
        self.last_block()
    }

    /// Net amount received by `address` over every mined transaction.
    /// Pending transactions do not count.
    pub fn balance_of(&self, address: &str) -> i128 {
        let mut balance = 0i128;
        for tx in self.blocks.iter().flat_map(|b| b.transactions.iter()) {
            if tx.from() == Some(address) {
                balance -= i128::from(tx.amount());
            }
            if tx.to() == address {
                balance += i128::from(tx.amount());
            }
        }
        balance
    }

    /// Replay hash, linkage and work checks for every block after genesis,
    /// stopping at the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (i, pair) in self.blocks.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let index = i as u64 + 1;

            let Some(stored) = current.hash else {
                return Err(ValidationError::UnhashedBlock { index });
            };
            if current.compute_hash() != stored {
                return Err(ValidationError::HashMismatch { index });
            }
            if previous.hash != Some(current.prior_hash) {
                return Err(ValidationError::BrokenLink { index });
            }
            if !meets_difficulty(&stored, self.difficulty) {
                return Err(ValidationError::InsufficientWork {
                    index,
                    difficulty: self.difficulty,
                });
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "chain failed validation");
                false
            }
        }
    }

    /// Pretty JSON dump of every block, for inspection only.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.blocks)
    }
}
