use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const EXPORT: &str = "日時,キーワード,順位,前日比,グループ,ランクインしているURL
2024/01/05 06:00,shoes,2,4,\"A,B\",https://example.com/shoes
2024/01/05 06:00,boots,15,-5,B,https://example.com/boots
2024/01/05 06:00,hats,圏外,0,,
2024/01/04 06:00,shoes,6,0,A,https://example.com/shoes
";

fn setup() -> TempDir {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("export.csv"), EXPORT).unwrap();
    temp
}

#[allow(deprecated)]
fn rankbook(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rankbook").expect("binary");
    cmd.current_dir(workdir);
    cmd
}

#[test]
fn sync_writes_one_report_per_group() {
    let temp = setup();
    rankbook(temp.path())
        .args(["sync", "--csv", "export.csv", "--date", "2024-01-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 succeeded, 0 failed"));

    let reports = temp.path().join("reports");
    let a = fs::read_to_string(reports.join("A.csv")).unwrap();
    assert!(a.contains("keyword,url,2024-01-05"));
    assert!(a.contains("shoes,https://example.com/shoes,2"));
    assert!(!a.contains("boots"));
    assert!(a.contains("1-3,,100.00% (1)"));

    let b = fs::read_to_string(reports.join("B.csv")).unwrap();
    assert!(b.contains("shoes") && b.contains("boots"));

    let unclassified = fs::read_to_string(reports.join("unclassified.csv")).unwrap();
    assert!(unclassified.contains("hats,,0"));
}

#[test]
fn sync_json_reports_each_outcome() {
    let temp = setup();
    let output = rankbook(temp.path())
        .args([
            "sync",
            "--csv",
            "export.csv",
            "--date",
            "2024-01-05",
            "--layout",
            "matrix-only",
            "--overall-report",
            "all",
            "--concurrency",
            "2",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["date"], "2024-01-05");
    let outcomes = body["outcomes"].as_array().unwrap();
    assert_eq!(outcomes.len(), 4);
    assert_eq!(outcomes[0]["report"], "all");
    assert_eq!(outcomes[0]["records"], 3);
    assert!(outcomes.iter().all(|o| o.get("error").is_none()));

    let a = fs::read_to_string(temp.path().join("reports/A.csv")).unwrap();
    assert!(a.starts_with("keyword,url,2024-01-05"));
}

#[test]
fn later_day_is_inserted_before_earlier_one() {
    let temp = setup();
    for date in ["2024-01-04", "2024-01-05"] {
        rankbook(temp.path())
            .args(["sync", "--csv", "export.csv", "--date", date, "--quiet"])
            .assert()
            .success();
    }

    rankbook(temp.path())
        .args(["show", "A"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "keyword,url,2024-01-05,2024-01-04",
        ))
        .stdout(predicate::str::contains(
            "shoes,https://example.com/shoes,2,6",
        ));
}

#[test]
fn failing_report_sets_exit_code_but_others_are_written() {
    let temp = setup();
    // A directory where the report file should be makes reading it fail.
    fs::create_dir_all(temp.path().join("reports/B.csv")).unwrap();

    rankbook(temp.path())
        .args(["sync", "--csv", "export.csv", "--date", "2024-01-05"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAILED  B"))
        .stdout(predicate::str::contains("2 succeeded, 1 failed"));

    assert!(temp.path().join("reports/A.csv").exists());
    assert!(temp.path().join("reports/unclassified.csv").exists());
}

#[test]
fn digest_prints_distribution_and_movers() {
    let temp = setup();
    let output = rankbook(temp.path())
        .args(["digest", "--csv", "export.csv", "--date", "2024/01/05"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["date"], "2024-01-05");
    assert_eq!(body["distribution"]["total"], 3);
    assert_eq!(body["changes"]["improved"], 1);
    assert_eq!(body["changes"]["worsened"], 1);
    assert_eq!(body["changes"]["big_winners"][0]["keyword"], "shoes");
    assert_eq!(body["changes"]["big_losers"][0]["keyword"], "boots");
}

#[test]
fn digest_for_a_day_without_records_fails() {
    let temp = setup();
    rankbook(temp.path())
        .args(["digest", "--csv", "export.csv", "--date", "2023-12-31"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No digest for 2023-12-31"));
}

#[test]
fn show_lists_reports_and_rejects_unknown_ones() {
    let temp = setup();
    rankbook(temp.path())
        .args(["sync", "--csv", "export.csv", "--date", "2024-01-05", "--quiet"])
        .assert()
        .success();

    rankbook(temp.path())
        .arg("show")
        .assert()
        .success()
        .stdout("A\nB\nunclassified\n");

    rankbook(temp.path())
        .args(["show", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn config_file_selects_store_and_layout() {
    let temp = setup();
    fs::write(
        temp.path().join("custom.toml"),
        "[store]\ndir = \"out\"\nformat = \"json\"\n\n[sync]\nlayout = \"matrix_only\"\nunclassified_report = \"misc\"\n",
    )
    .unwrap();

    rankbook(temp.path())
        .args([
            "--config",
            "custom.toml",
            "sync",
            "--csv",
            "export.csv",
            "--date",
            "2024-01-05",
        ])
        .assert()
        .success();

    let misc: Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("out/misc.json")).unwrap())
            .unwrap();
    assert_eq!(misc["name"], "misc");
    assert_eq!(misc["rows"][0][0], "keyword");
}

#[test]
fn malformed_date_is_rejected_by_argument_parsing() {
    let temp = setup();
    rankbook(temp.path())
        .args(["sync", "--csv", "export.csv", "--date", "05.01.2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected YYYY-MM-DD"));
}
