use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{rl, setup_test_db};

fn init_with_members(db_path: &str) {
    rl().args(["--db", db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    rl().args(["--db", db_path, "add", "memberA", "10000"])
        .assert()
        .success();
    rl().args(["--db", db_path, "add", "memberB", "10000"])
        .assert()
        .success();
    rl().args(["--db", db_path, "add", "ex", "10000"])
        .assert()
        .success();
}

#[test]
fn test_transfer_updates_both_balances() {
    let (_dir, db_path) = setup_test_db("cli_transfer_ok");
    init_with_members(&db_path);

    rl().args(["--db", &db_path, "transfer", "memberA", "memberB", "2000"])
        .assert()
        .success()
        .stdout(contains("Transferred 2000"));

    rl().args(["--db", &db_path, "get", "memberA"])
        .assert()
        .success()
        .stdout(contains("8000"));
    rl().args(["--db", &db_path, "get", "memberB"])
        .assert()
        .success()
        .stdout(contains("12000"));
}

#[test]
fn test_transfer_to_blocked_member_fails_and_rolls_back() {
    let (_dir, db_path) = setup_test_db("cli_transfer_blocked");
    init_with_members(&db_path);

    rl().args(["--db", &db_path, "transfer", "memberA", "ex", "2000"])
        .assert()
        .failure()
        .stderr(contains("account_transfer").and(contains("cannot receive transfers")));

    rl().args(["--db", &db_path, "get", "memberA"])
        .assert()
        .success()
        .stdout(contains("10000").and(contains("8000").not()));
}

#[test]
fn test_transfer_to_self_is_refused() {
    let (_dir, db_path) = setup_test_db("cli_transfer_self");
    init_with_members(&db_path);

    rl().args(["--db", &db_path, "transfer", "memberA", "memberA", "2000"])
        .assert()
        .failure()
        .stderr(contains("to itself"));

    rl().args(["--db", &db_path, "get", "memberA"])
        .assert()
        .success()
        .stdout(contains("10000").and(contains("12000").not()));
}

#[test]
fn test_get_unknown_member_reports_not_found() {
    let (_dir, db_path) = setup_test_db("cli_get_missing");
    init_with_members(&db_path);

    rl().args(["--db", &db_path, "get", "nobody"])
        .assert()
        .failure()
        .stderr(contains("Member not found: nobody"));
}

#[test]
fn test_duplicate_add_fails_unless_retry_requested() {
    let (_dir, db_path) = setup_test_db("cli_duplicate");
    init_with_members(&db_path);

    rl().args(["--db", &db_path, "add", "memberA", "0"])
        .assert()
        .failure()
        .stderr(contains("Duplicate key"));

    rl().args(["--db", &db_path, "add", "memberA", "0", "--retry-on-duplicate"])
        .assert()
        .success()
        .stdout(contains("created"));
}

#[test]
fn test_list_json_is_sorted() {
    let (_dir, db_path) = setup_test_db("cli_list_json");
    init_with_members(&db_path);

    let output = rl()
        .args(["--db", &db_path, "list", "--json"])
        .output()
        .expect("failed to list members");
    assert!(output.status.success());

    let members: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("list --json prints JSON");
    let ids: Vec<&str> = members
        .as_array()
        .expect("array")
        .iter()
        .map(|m| m["member_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["ex", "memberA", "memberB"]);
}

#[test]
fn test_update_delete_and_clear() {
    let (_dir, db_path) = setup_test_db("cli_update_delete");
    init_with_members(&db_path);

    rl().args(["--db", &db_path, "update", "memberA", "20000"])
        .assert()
        .success();
    rl().args(["--db", &db_path, "get", "memberA"])
        .assert()
        .success()
        .stdout(contains("20000"));

    rl().args(["--db", &db_path, "del", "memberA"])
        .assert()
        .success();
    rl().args(["--db", &db_path, "del", "memberA"])
        .assert()
        .failure()
        .stderr(contains("Member not found"));

    rl().args(["--db", &db_path, "clear"])
        .assert()
        .success()
        .stdout(contains("2 member(s) deleted"));
    rl().args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("No members found"));
}

#[test]
fn test_log_records_only_committed_transfers() {
    let (_dir, db_path) = setup_test_db("cli_log");
    init_with_members(&db_path);

    rl().args(["--db", &db_path, "transfer", "memberA", "memberB", "1"])
        .assert()
        .success();
    rl().args(["--db", &db_path, "transfer", "memberA", "ex", "1"])
        .assert()
        .failure();

    rl().args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(
            contains("transfer (memberA->memberB)")
                .and(contains("memberA->ex").not())
                .and(contains("init")),
        );
}
