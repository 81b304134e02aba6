use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use ledger_core::{
    constants::{DEFAULT_DIFFICULTY, DEFAULT_MINING_REWARD},
    Chain, ChainConfig, Transaction,
};
use std::collections::BTreeSet;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ledger-cli")]
#[command(about = "Drive an in-memory proof-of-work ledger")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Two transfers, three mining rounds, then a validity check
    Demo {
        #[command(flatten)]
        mining: MiningArgs,
    },
    /// Submit the given transfers and mine a number of blocks
    Run {
        #[command(flatten)]
        mining: MiningArgs,
        /// Transfer as FROM:TO:AMOUNT; repeatable, AMOUNT may be negative
        #[arg(long = "tx", value_parser = parse_tx)]
        txs: Vec<Transaction>,
        /// Blocks to mine after submitting
        #[arg(long, default_value_t = 1)]
        rounds: u32,
    },
}

#[derive(Args, Debug)]
struct MiningArgs {
    /// Leading zero hex digits required of each block hash
    #[arg(long, default_value_t = DEFAULT_DIFFICULTY)]
    difficulty: u32,
    /// Amount minted to the miner per block
    #[arg(long, default_value_t = DEFAULT_MINING_REWARD, allow_hyphen_values = true)]
    reward: i64,
    /// Address credited with mining rewards
    #[arg(long, default_value = "miner-address")]
    miner: String,
    /// Search nonces on all cores
    #[arg(long)]
    parallel: bool,
    /// Give up on a block after this many nonces
    #[arg(long, conflicts_with = "parallel")]
    max_attempts: Option<u64>,
    /// Print the whole chain as JSON before the validity check
    #[arg(long)]
    dump: bool,
}

impl MiningArgs {
    fn chain(&self) -> Result<Chain> {
        let config = ChainConfig::new(self.difficulty, self.reward)?;
        Ok(Chain::with_config(config)?)
    }

    fn mine(&self, chain: &mut Chain) -> Result<()> {
        let block = if self.parallel {
            chain.mine_pending_parallel(self.miner.as_str())?
        } else if let Some(max) = self.max_attempts {
            chain.try_mine_pending(self.miner.as_str(), max)?
        } else {
            chain.mine_pending(self.miner.as_str())
        };
        println!(
            "Block mined! Index: {}, Nonce: {}, Hash: {}",
            block.index,
            block.nonce,
            block.hash_hex().unwrap_or_default()
        );
        Ok(())
    }

    fn finish(&self, chain: &Chain) -> Result<()> {
        if self.dump {
            println!("{}", chain.export_json()?);
        }
        let verdict = chain.validate();
        println!("Is Chain Valid? {}", verdict.is_ok());
        verdict.context("chain is invalid")
    }
}

fn parse_tx(raw: &str) -> Result<Transaction> {
    let mut parts = raw.splitn(3, ':');
    let (Some(from), Some(to), Some(amount)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(anyhow!("expected FROM:TO:AMOUNT, got {raw:?}"));
    };
    let amount = amount
        .parse::<i64>()
        .with_context(|| format!("invalid amount in {raw:?}"))?;
    Ok(Transaction::new(from, to, amount))
}

fn demo(mining: &MiningArgs) -> Result<()> {
    let mut chain = mining.chain()?;
    chain.submit_transaction(Transaction::new("address1", "address2", 75));
    chain.submit_transaction(Transaction::new("address2", "address1", 25));

    println!("Starting mining process...");
    mining.mine(&mut chain)?;
    println!("Miner balance: {}", chain.balance_of(&mining.miner));

    println!("Mining again to receive the reward...");
    mining.mine(&mut chain)?;
    println!("Miner balance: {}", chain.balance_of(&mining.miner));

    chain.submit_transaction(Transaction::new("address1", "address2", 200));
    println!("Mining again to receive the reward...");
    mining.mine(&mut chain)?;
    println!("Miner balance: {}", chain.balance_of(&mining.miner));

    mining.finish(&chain)
}

fn run(mining: &MiningArgs, txs: Vec<Transaction>, rounds: u32) -> Result<()> {
    let mut chain = mining.chain()?;
    let mut addresses: BTreeSet<String> = BTreeSet::new();
    addresses.insert(mining.miner.clone());
    for tx in txs {
        addresses.extend(tx.from().map(str::to_owned));
        addresses.insert(tx.to().to_owned());
        chain.submit_transaction(tx);
    }

    for _ in 0..rounds {
        mining.mine(&mut chain)?;
    }
    info!(height = chain.height(), "mining finished");

    for address in &addresses {
        println!("{address}: {}", chain.balance_of(address));
    }
    mining.finish(&chain)
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Demo { mining } => demo(&mining),
        Command::Run { mining, txs, rounds } => run(&mining, txs, rounds),
    }
}
