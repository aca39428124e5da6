use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn splitledger(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("splitledger").unwrap();
    cmd.env("SPLITLEDGER_DATA_DIR", data_dir.path())
        .env_remove("SPLITLEDGER_USER")
        .env_remove("RUST_LOG");
    cmd
}

/// Initialized data dir with group Trip (Alice, Bob, Carol)
fn trip() -> TempDir {
    let dir = TempDir::new().unwrap();

    splitledger(&dir).arg("init").assert().success();
    splitledger(&dir)
        .args(["group", "create", "Trip", "--creator", "Alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created group: Trip"));

    for name in ["Bob", "Carol"] {
        splitledger(&dir)
            .args(["group", "add-member", "Trip", name])
            .assert()
            .success();
    }

    dir
}

#[test]
fn test_init_and_config() {
    let dir = TempDir::new().unwrap();

    splitledger(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data").join("ledger.json").exists());

    splitledger(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Remainder policy:     distribute"));
}

#[test]
fn test_group_show_lists_members() {
    let dir = trip();

    splitledger(&dir)
        .args(["group", "show", "trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Members (3)"))
        .stdout(predicate::str::contains("Carol"));

    splitledger(&dir)
        .args(["group", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trip"));
}

#[test]
fn test_equal_expense_with_remainder() {
    let dir = trip();

    splitledger(&dir)
        .args(["expense", "add", "Trip", "3.01", "Dinner", "--as", "Alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice: $1.01"))
        .stdout(predicate::str::contains("Bob: $1.00"));

    splitledger(&dir)
        .args(["balance", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Alice\s+-\$2\.00\s+is owed").unwrap())
        .stdout(predicate::str::is_match(r"Bob\s+\$1\.00\s+owes").unwrap())
        .stdout(predicate::str::is_match(r"TOTAL\s+\$0\.00").unwrap());
}

#[test]
fn test_exact_expense_with_external_payer() {
    let dir = trip();

    splitledger(&dir)
        .args([
            "expense", "add", "Trip", "5", "Taxi", "--as", "Alice", "--split", "exact", "--exact",
            "Bob=2", "--exact", "Carol=3",
        ])
        .assert()
        .success();

    splitledger(&dir)
        .args(["balance", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Alice\s+-\$5\.00").unwrap())
        .stdout(predicate::str::is_match(r"Carol\s+\$3\.00").unwrap());
}

#[test]
fn test_exact_mismatch_fails_and_writes_nothing() {
    let dir = trip();

    splitledger(&dir)
        .args([
            "expense", "add", "Trip", "5", "Taxi", "--as", "Bob", "--split", "exact", "--exact",
            "Alice=2", "--exact", "Bob=2.50",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Split amounts total $4.50 but the expense is $5.00",
        ));

    splitledger(&dir)
        .args(["expense", "list", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No expenses found."));
}

#[test]
fn test_actor_from_environment() {
    let dir = trip();

    splitledger(&dir)
        .env("SPLITLEDGER_USER", "Bob")
        .args(["expense", "add", "Trip", "9", "Groceries", "--with", "Bob", "--with", "Carol"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paid by: Bob"));

    splitledger(&dir)
        .args(["expense", "list", "Trip"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("$9.00"));
}

#[test]
fn test_unknown_actor_rejected() {
    let dir = trip();

    splitledger(&dir)
        .args(["expense", "add", "Trip", "10", "Lunch", "--as", "Mallory"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Member not found"));
}

#[test]
fn test_invalid_amount_rejected() {
    let dir = trip();

    for amount in ["0", "1.234", "abc"] {
        splitledger(&dir)
            .args(["expense", "add", "Trip", amount, "Lunch", "--as", "Alice"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid amount"));
    }
}

#[test]
fn test_audit_records_creates() {
    let dir = trip();

    splitledger(&dir)
        .args(["expense", "add", "Trip", "12", "Tickets", "--as", "Carol"])
        .assert()
        .success();

    splitledger(&dir)
        .args(["audit", "--limit", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE Group"))
        .stdout(predicate::str::contains("CREATE Member"))
        .stdout(predicate::str::contains("CREATE Expense"));
}
