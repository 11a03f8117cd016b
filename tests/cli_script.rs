mod common;

use assert_cmd::Command;
use common::temp_base;
use predicates::str::contains;

fn grocer(base: &std::path::Path, today: &str) -> Command {
    let mut cmd = Command::cargo_bin("grocer_cli").expect("binary");
    cmd.env("GROCER_CLI_SCRIPT", "1")
        .env("GROCER_CORE_HOME", base)
        .env("GROCER_CORE_TODAY", today)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_records_and_reports_targets() {
    let base = temp_base();
    let input = "add income 100 2025-01-07 --category Sales\n\
                 add income 200 2025-02-04\n\
                 targets --months 2\n\
                 exit\n";
    grocer(&base, "2025-03-04")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Added income R$ 100,00 on 2025-01-07"))
        .stdout(contains("R$ 150,00"));

    let blob = std::fs::read_to_string(base.join("records").join("expenses.json"))
        .expect("snapshot written");
    assert!(blob.contains("\"category\": \"Sales\""));
}

#[test]
fn script_mode_pays_and_exports_pending_week() {
    let base = temp_base();
    let out = base.join("week.csv");
    let input = format!(
        "add expense 50 2025-11-20 --due 2025-11-29 --description Produce\n\
         add expense 30 2025-11-20 --due 2025-12-03\n\
         pending week\n\
         export week --out {}\n\
         pay week\n\
         pending week\n",
        out.display()
    );
    grocer(&base, "2025-11-26")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("1 expense(s), total R$ 50,00"))
        .stdout(contains("Exported 1 expense(s)"))
        .stdout(contains("1 expense(s) marked as paid."))
        .stdout(contains("Nothing pending for this period."));

    let csv = std::fs::read_to_string(&out).expect("export written");
    assert!(csv.contains("\"Produce\""));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let base = temp_base();
    grocer(&base, "2025-03-04")
        .write_stdin("pendng week\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `pendng`"))
        .stdout(contains("Suggestion: `pending`?"));
}

#[test]
fn invalid_today_override_fails_fast() {
    let base = temp_base();
    grocer(&base, "04/03/2025")
        .write_stdin("exit\n")
        .assert()
        .failure();
}
