use ledger_core::{Chain, ChainConfig, Transaction};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const MINER: &str = "miner-address";

pub fn chain_with_difficulty(difficulty: u32) -> Chain {
    let config = ChainConfig::new(difficulty, 10).expect("valid config");
    Chain::with_config(config).expect("chain")
}

/// Deterministic batch of transfers between a handful of addresses.
pub fn random_txs(seed: u64, count: usize) -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let from = format!("addr-{}", rng.gen_range(0..5));
            let to = format!("addr-{}", rng.gen_range(0..5));
            Transaction::new(from, to, rng.gen_range(1..100))
        })
        .collect()
}

/// Net flow for `address` computed directly from a list of transactions.
pub fn expected_balance<'a>(txs: impl IntoIterator<Item = &'a Transaction>, address: &str) -> i128 {
    txs.into_iter().fold(0, |acc, tx| {
        let mut acc = acc;
        if tx.from() == Some(address) {
            acc -= i128::from(tx.amount());
        }
        if tx.to() == address {
            acc += i128::from(tx.amount());
        }
        acc
    })
}
