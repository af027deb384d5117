// End-to-end tests for the har-compare binary

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write_har(dir: &Path, name: &str, entries: &[(&str, u16, &str)]) -> PathBuf {
    let entries: Vec<String> = entries
        .iter()
        .map(|(url, status, timings)| {
            format!(
                r#"{{"request": {{"method": "GET", "url": "{}"}}, "response": {{"status": {}}}, "timings": {}}}"#,
                url, status, timings
            )
        })
        .collect();
    let path = dir.join(name);
    fs::write(
        &path,
        format!(r#"{{"log": {{"version": "1.2", "entries": [{}]}}}}"#, entries.join(",")),
    )
    .unwrap();
    path
}

fn fixture(dir: &Path) -> (PathBuf, PathBuf) {
    let baseline = write_har(
        dir,
        "baseline.har",
        &[
            (
                "https://example.com/api/users",
                200,
                r#"{"blocked": 5, "dns": 10, "connect": 30, "send": 5, "wait": 100, "receive": 50}"#,
            ),
            (
                "https://example.com/api/posts",
                200,
                r#"{"blocked": 3, "dns": 8, "connect": 25, "send": 4, "wait": 80, "receive": 40}"#,
            ),
            (
                "https://example.com/missing",
                404,
                r#"{"blocked": 0, "dns": -1, "connect": -1, "send": 1, "wait": 20, "receive": 1}"#,
            ),
        ],
    );
    let candidate = write_har(
        dir,
        "candidate.har",
        &[
            (
                "https://example.com/api/users",
                200,
                r#"{"blocked": 7, "dns": 12, "connect": 35, "send": 6, "wait": 120, "receive": 60}"#,
            ),
            (
                "https://example.com/api/posts",
                200,
                r#"{"blocked": 4, "dns": 9, "connect": 28, "send": 5, "wait": 90, "receive": 45}"#,
            ),
            (
                "https://example.com/missing",
                404,
                r#"{"blocked": 0, "dns": -1, "connect": -1, "send": 1, "wait": 90, "receive": 1}"#,
            ),
        ],
    );
    (baseline, candidate)
}

fn har_compare() -> Command {
    Command::cargo_bin("har-compare").unwrap()
}

#[test]
fn report_and_all_outputs() {
    let tmp = TempDir::new().unwrap();
    let (baseline, candidate) = fixture(tmp.path());
    let out_dir = tmp.path().join("out");

    har_compare()
        .arg(&baseline)
        .arg(&candidate)
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("https://example.com/missing"))
        .stdout(predicate::str::contains("Δ total"))
        .stdout(predicate::str::contains("+70.00 ms"))
        .stdout(predicate::str::contains("Wrote"));

    let csv = fs::read_to_string(out_dir.join("slowest_requests.csv")).unwrap();
    let rows: Vec<_> = csv.lines().collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[1].starts_with("1,"));
    assert!(rows[1].contains("https://example.com/missing"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.join("slowest_requests.json")).unwrap())
            .unwrap();
    assert_eq!(json["ranked"].as_array().unwrap().len(), 3);
    assert_eq!(json["ranked"][0]["total_delta"], 70.0);
    assert!(json["ranked"][0]["deltas"]["dns"].is_null());
    assert_eq!(json["summary"]["matched_pairs"], 3);

    let svg = fs::read_to_string(out_dir.join("latency_deltas.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
}

#[test]
fn top_n_truncates() {
    let tmp = TempDir::new().unwrap();
    let (baseline, candidate) = fixture(tmp.path());
    let out_dir = tmp.path().join("out");

    har_compare()
        .arg(&baseline)
        .arg(&candidate)
        .args(["--top", "1", "--no-chart", "--out-dir"])
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Top 1 of 3"));

    let csv = fs::read_to_string(out_dir.join("slowest_requests.csv")).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(!out_dir.join("latency_deltas.svg").exists());
}

#[test]
fn status_and_domain_filters() {
    let tmp = TempDir::new().unwrap();
    let (baseline, candidate) = fixture(tmp.path());

    har_compare()
        .arg(&baseline)
        .arg(&candidate)
        .args(["--status", "404", "--no-export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://example.com/missing"))
        .stdout(predicate::str::contains("/api/users").not());

    har_compare()
        .arg(&baseline)
        .arg(&candidate)
        .args(["--domain", "/api/", "--no-export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/api/users"))
        .stdout(predicate::str::contains("/missing").not());
}

#[test]
fn no_common_urls_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let a = write_har(tmp.path(), "a.har", &[("https://example.com/api1", 200, "{}")]);
    let b = write_har(tmp.path(), "b.har", &[("https://example.com/api2", 200, "{}")]);
    let out_dir = tmp.path().join("out");

    har_compare()
        .arg(&a)
        .arg(&b)
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No common URLs found"))
        .stdout(predicate::str::contains("Unmatched: 1 baseline-only, 1 candidate-only"));

    assert!(!out_dir.exists());
}

#[test]
fn zero_top_n_is_rejected_before_loading() {
    let tmp = TempDir::new().unwrap();
    har_compare()
        .arg(tmp.path().join("does-not-exist.har"))
        .arg(tmp.path().join("also-missing.har"))
        .args(["--top", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid filter: top_n"));
}

#[test]
fn out_of_range_status_is_a_usage_error() {
    let tmp = TempDir::new().unwrap();
    let (baseline, candidate) = fixture(tmp.path());
    har_compare()
        .arg(&baseline)
        .arg(&candidate)
        .args(["--status", "1000", "--no-export"])
        .assert()
        .code(2);
}

#[test]
fn empty_url_entries_are_compared() {
    let tmp = TempDir::new().unwrap();
    let a = write_har(tmp.path(), "a.har", &[("", 200, r#"{"wait": 10}"#)]);
    let b = write_har(tmp.path(), "b.har", &[("", 200, r#"{"wait": 25}"#)]);

    har_compare()
        .arg(&a)
        .arg(&b)
        .arg("--no-export")
        .assert()
        .success()
        .stdout(predicate::str::contains("Top 1 of 1"))
        .stdout(predicate::str::contains("+15.00 ms"));
}

#[test]
fn malformed_capture_fails() {
    let tmp = TempDir::new().unwrap();
    let bad = tmp.path().join("bad.har");
    fs::write(&bad, "{ invalid json content").unwrap();
    let (_, candidate) = fixture(tmp.path());

    har_compare()
        .arg(&bad)
        .arg(&candidate)
        .arg("--no-export")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot load"))
        .stderr(predicate::str::contains("malformed capture"));
}

#[test]
fn missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    let (baseline, _) = fixture(tmp.path());
    har_compare()
        .arg(&baseline)
        .arg(tmp.path().join("nonexistent_file.har"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn strict_mode_rejects_partial_timings() {
    let tmp = TempDir::new().unwrap();
    let a = write_har(tmp.path(), "a.har", &[("/x", 200, r#"{"wait": 100}"#)]);
    let b = write_har(tmp.path(), "b.har", &[("/x", 200, r#"{"wait": 150}"#)]);

    har_compare()
        .arg(&a)
        .arg(&b)
        .arg("--no-export")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loader: 10 missing fields"));

    har_compare()
        .arg(&a)
        .arg(&b)
        .args(["--strict", "--no-export"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing field: entry 0: timings.blocked"));
}

#[test]
fn missing_arguments_is_usage_error() {
    har_compare().assert().code(2);
}
