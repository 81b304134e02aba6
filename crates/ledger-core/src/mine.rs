use crate::{error::MineError, pow::meets_difficulty, sha256, Block};
use rayon::prelude::*;
use tracing::info;

/// Mines a block by searching nonces in parallel, starting at the block's current
/// nonce, until its hex digest has at least `difficulty` leading zeros.
///
/// Any qualifying nonce may win, so the result can differ from the sequential
/// [`Block::mine`]; it always satisfies the same predicate and its stored hash
/// always matches its fields.
pub fn mine_block_parallel(mut block: Block, difficulty: u32) -> Result<Block, MineError> {
    let start = block.nonce;
    if let Some(hash) = block.hash {
        if meets_difficulty(&hash, difficulty) {
            return Ok(block);
        }
    }

    // Only the nonce varies between attempts; hash the tx batch once.
    let tx_root = block.tx_root();
    let template = &block;

    // Rayon splits the remaining nonce range across threads.
    let found = (start..u64::MAX).into_par_iter().find_any(|nonce| {
        let hash = sha256(&template.hash_bytes_with(&tx_root, *nonce));
        meets_difficulty(&hash, difficulty)
    });

    let Some(nonce) = found else {
        return Err(MineError::Exhausted {
            index: block.index,
            attempts: u64::MAX - start,
        });
    };

    block.nonce = nonce;
    let hash = block.assign_hash();
    info!(
        "Mined block {} with nonce {} and hash {} (parallel)",
        block.index,
        nonce,
        hex::encode(hash)
    );
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Transaction, ZERO_HASH};

    fn sample_block() -> Block {
        let txs = vec![
            Transaction::new("Alice", "Bob", 10),
            Transaction::new("Bob", "Charlie", 5),
        ];
        let mut block = Block::new(1, ZERO_HASH, txs);
        block.timestamp = 1_600_000_200;
        block
    }

    #[test]
    fn parallel_mining_meets_difficulty() {
        let mined = mine_block_parallel(sample_block(), 3).unwrap();
        let hash = mined.hash.unwrap();
        assert!(hex::encode(hash).starts_with("000"));
        assert_eq!(mined.compute_hash(), hash);
    }

    #[test]
    fn parallel_mining_does_not_search_below_start() {
        let mut block = sample_block();
        block.nonce = 5_000;
        let mined = mine_block_parallel(block, 2).unwrap();
        assert!(mined.nonce >= 5_000);
    }

    #[test]
    fn already_qualifying_block_is_returned_as_is() {
        let mut block = sample_block();
        block.mine(2);
        let mined = mine_block_parallel(block.clone(), 2).unwrap();
        assert_eq!(mined, block);
    }
}
