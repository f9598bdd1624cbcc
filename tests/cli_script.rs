use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn tally(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tally_cli").unwrap();
    cmd.env("TALLY_CLI_SCRIPT", "1")
        .env("TALLY_HOME", home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = TempDir::new().unwrap();
    let input = "addExpense 12.50 /description pizza /tag food\nbudget 200\nexit\n";

    tally(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Added expense"))
        .stdout(contains("Total: $12.50"))
        .stdout(contains("== Budget =="))
        .stdout(contains("Goodbye!"));

    let saved = std::fs::read_to_string(home.path().join("data").join("expenses.txt")).unwrap();
    assert!(saved.contains("description:pizza"));
    assert!(saved.contains("tag:food"));
}

#[test]
fn data_is_reloaded_on_next_start() {
    let home = TempDir::new().unwrap();
    tally(&home)
        .write_stdin("addIncome 300 /description bonus\nexit\n")
        .assert()
        .success();

    tally(&home)
        .write_stdin("goto income\nexit\n")
        .assert()
        .success()
        .stdout(contains("bonus"))
        .stdout(contains("Total: $300"));
}

#[test]
fn bad_lines_are_reported_and_the_session_continues() {
    let home = TempDir::new().unwrap();
    tally(&home)
        .write_stdin("addExpnse 5\nadd 5\naddIncome 5 /description ok\n")
        .assert()
        .success()
        .stdout(contains("I don't know what command `addExpnse` is!"))
        .stdout(contains("Did you mean `addExpense`?"))
        .stdout(contains("I don't know what command `add` is!"))
        .stdout(contains("Added income"))
        .stdout(contains("\u{1b}[").not());
}

#[test]
fn corrupt_data_file_is_quarantined_at_startup() {
    let home = TempDir::new().unwrap();
    let data = home.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(data.join("payments.txt"), "not a record").unwrap();

    tally(&home)
        .write_stdin("exit\n")
        .assert()
        .success()
        .stdout(contains("payments.txt.bak"));
    assert!(data.join("payments.txt.bak").exists());
}
