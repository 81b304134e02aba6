pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
/// index, prior hash, timestamp, tx root, nonce
pub const HASH_INPUT_SIZE: usize = 8 + HASH_SIZE + 8 + HASH_SIZE + 8;
pub const NONCE_OFFSET: usize = HASH_INPUT_SIZE - 8;
pub const DEFAULT_DIFFICULTY: u32 = 3;
pub const MAX_DIFFICULTY: u32 = HASH_HEX_SIZE as u32;
pub const DEFAULT_MINING_REWARD: i64 = 10;
