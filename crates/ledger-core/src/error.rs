use thiserror::Error;

/// First integrity violation found while replaying the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("block {index}: hash was never computed")]
    UnhashedBlock { index: u64 },

    #[error("block {index}: stored hash does not match its contents")]
    HashMismatch { index: u64 },

    #[error("block {index}: prior hash does not match the preceding block")]
    BrokenLink { index: u64 },

    #[error("block {index}: hash has fewer than {difficulty} leading zero hex digits")]
    InsufficientWork { index: u64, difficulty: u32 },
}

impl ValidationError {
    /// Position in the chain of the offending block.
    pub fn index(&self) -> u64 {
        match self {
            Self::UnhashedBlock { index }
            | Self::HashMismatch { index }
            | Self::BrokenLink { index }
            | Self::InsufficientWork { index, .. } => *index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MineError {
    #[error("block {index}: no qualifying nonce within {attempts} attempts")]
    Exhausted { index: u64, attempts: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("difficulty must be at least 1")]
    ZeroDifficulty,

    #[error("difficulty {difficulty} exceeds the {max} hex digits of a digest")]
    DifficultyTooHigh { difficulty: u32, max: u32 },
}
