use assert_cmd::Command;
use predicates::prelude::*;

fn ledger() -> Command {
    Command::cargo_bin("ledger-cli").unwrap()
}

#[test]
fn demo_reports_balances_and_validity() {
    ledger()
        .args(["demo", "--difficulty", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting mining process..."))
        .stdout(predicate::str::contains("Miner balance: 0"))
        .stdout(predicate::str::contains("Miner balance: 10"))
        .stdout(predicate::str::contains("Miner balance: 20"))
        .stdout(predicate::str::contains("Is Chain Valid? true"));
}

#[test]
fn demo_dump_prints_chain_json() {
    let output = ledger()
        .args(["demo", "--difficulty", "1", "--dump"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let start = stdout.find('[').unwrap();
    let end = stdout.rfind(']').unwrap();
    let blocks: serde_json::Value = serde_json::from_str(&stdout[start..=end]).unwrap();
    let blocks = blocks.as_array().unwrap();
    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[0]["prior_hash"], "0".repeat(64));
    assert_eq!(blocks[2]["transactions"][0]["from"], serde_json::Value::Null);
}

#[test]
fn run_mines_submitted_transfers() {
    ledger()
        .args([
            "run",
            "--difficulty",
            "1",
            "--reward",
            "5",
            "--miner",
            "m",
            "--tx",
            "alice:bob:30",
            "--tx",
            "bob:carol:10",
            "--rounds",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice: -30"))
        .stdout(predicate::str::contains("bob: 20"))
        .stdout(predicate::str::contains("carol: 10"))
        .stdout(predicate::str::contains("m: 5"));
}

#[test]
fn run_accepts_negative_transfer() {
    ledger()
        .args(["run", "--difficulty", "1", "--miner", "m", "--tx=a:b:-5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a: 5"))
        .stdout(predicate::str::contains("b: -5"))
        .stdout(predicate::str::contains("Is Chain Valid? true"));
}

#[test]
fn parallel_flag_produces_valid_chain() {
    ledger()
        .args(["demo", "--difficulty", "2", "--parallel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Is Chain Valid? true"));
}

#[test]
fn exhausted_search_fails() {
    ledger()
        .args(["demo", "--difficulty", "64", "--max-attempts", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no qualifying nonce"));
}

#[test]
fn rejects_zero_difficulty() {
    ledger()
        .args(["demo", "--difficulty", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("difficulty must be at least 1"));
}

#[test]
fn rejects_malformed_transfer() {
    ledger()
        .args(["run", "--tx", "alice-bob-30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FROM:TO:AMOUNT"));
}
