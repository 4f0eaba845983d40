use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn lessonbook() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lessonbook"));
    cmd.env_remove("LESSONBOOK_CONFIG_FILE")
        .env_remove("RUST_LOG")
        .env_remove("LESSONBOOK__RUNNER__ENABLED")
        .env_remove("LESSONBOOK__OUTPUT__DIRECTORY");
    cmd
}

fn write_manifest(dir: &Path, manifest: &str) {
    fs::write(dir.join("items.toml"), manifest).expect("manifest should be written");
}

#[test]
fn static_factory_demo_prints_expected_lines() {
    lessonbook()
        .args(["demo", "static-factory"])
        .assert()
        .success()
        .stdout("medium\ntrue\nfalse\nlarge\ntrue\ntrue\n");
}

#[test]
fn singleton_demo_prints_expected_lines() {
    lessonbook()
        .args(["demo", "singleton"])
        .assert()
        .success()
        .stdout("Singleton data\nSingleton is doing something\nsame instance: true\n");
}

#[test]
fn unknown_demo_exits_with_status_two() {
    lessonbook()
        .args(["demo", "no-such-demo"])
        .assert()
        .code(2)
        .stderr(contains("unknown demo `no-such-demo`"));
}

#[test]
fn list_prints_embedded_items_in_order() {
    let assert = lessonbook()
        .args(["list", "--log-level", "warn"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let ids: Vec<_> = stdout
        .lines()
        .map(|line| line.split('\t').next().expect("id column"))
        .collect();
    assert_eq!(ids, ["1", "2", "3", "4", "5", "6", "7", "8"]);
    assert!(stdout.contains("1\tConsider static factory methods instead of constructors"));
}

#[test]
fn build_of_embedded_content_runs_every_demo() {
    let temp = TempDir::new().expect("temp dir should be created");
    let out = temp.path().join("site");

    lessonbook()
        .args(["build", "--log-level", "warn", "--output-dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("Built 8 of 8 item pages"));

    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out.join("report.json")).expect("report should exist"),
    )
    .expect("report should be json");
    let items = report["items"].as_array().expect("items array");
    assert_eq!(items.len(), 8);
    for item in items {
        assert_eq!(item["outcome"]["status"], "rendered", "{item}");
        for sample in item["samples"].as_array().expect("samples array") {
            assert_eq!(sample["outcome"]["status"], "passed", "{sample}");
        }
    }

    let page = items[0]["outcome"]["page"].as_str().expect("page name");
    let html = fs::read_to_string(out.join(page)).expect("page should exist");
    assert!(html.contains("Pizza.java"));
    assert!(html.contains("medium\ntrue\nfalse\nlarge\ntrue\ntrue"));
    assert!(out.join("index.html").is_file());
    assert!(out.join("styles/code.css").is_file());
}

#[test]
fn duplicate_ids_abort_before_writing() {
    let temp = TempDir::new().expect("temp dir should be created");
    write_manifest(
        temp.path(),
        r#"
        [[items]]
        id = 1
        title = "One"
        description = "first"

        [[items]]
        id = 1
        title = "Again"
        description = "second"
        "#,
    );
    let out = temp.path().join("site");

    lessonbook()
        .arg("build")
        .arg(temp.path())
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .failure()
        .stderr(contains("duplicate item id 1"));

    assert!(!out.exists(), "no output may be written");
}

#[test]
fn render_failure_fails_the_build_but_keeps_other_pages() {
    let temp = TempDir::new().expect("temp dir should be created");
    write_manifest(
        temp.path(),
        r#"
        [[items]]
        id = 1
        title = "Good"
        description = "fine"

        [[items]]
        id = 2
        title = "Unlabeled"
        description = "broken"

        [[items.samples]]
        source = "fn main() {}"
        "#,
    );
    let out = temp.path().join("site");

    lessonbook()
        .arg("build")
        .arg(temp.path())
        .args(["--no-run", "--log-level", "warn", "--output-dir"])
        .arg(&out)
        .assert()
        .code(1)
        .stdout(contains("FAILED  item 2"));

    assert!(out.join("item-1-good.html").is_file());
    assert!(!out.join("item-2-unlabeled.html").exists());
    let index = fs::read_to_string(out.join("index.html")).expect("index should exist");
    assert!(index.contains("Unlabeled"));
}

#[cfg(unix)]
#[test]
fn failing_examples_are_warnings_only() {
    let temp = TempDir::new().expect("temp dir should be created");
    write_manifest(
        temp.path(),
        r#"
        [[items]]
        id = 1
        title = "Slow"
        description = "sleeps"

        [[items.samples]]
        label = "slow.sh"
        source = "sleep 10"
        command = ["sh", "-c", "sleep 10"]

        [[items]]
        id = 2
        title = "Broken"
        description = "exits"

        [[items.samples]]
        label = "broken.sh"
        source = "exit 3"
        command = ["sh", "-c", "echo nope >&2; exit 3"]
        "#,
    );
    let out = temp.path().join("site");

    lessonbook()
        .arg("build")
        .arg(temp.path())
        .args(["--run-timeout-ms", "300", "--log-level", "error", "--output-dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("timed out after 300 ms"))
        .stdout(contains("exited with status 3: nope"));

    assert!(out.join("item-1-slow.html").is_file());
    assert!(out.join("item-2-broken.html").is_file());
}

#[test]
fn show_prints_one_assembled_page() {
    lessonbook()
        .args(["show", "2", "--no-run", "--log-level", "warn"])
        .assert()
        .success()
        .stdout(contains("Consider a builder when faced with many constructor parameters"))
        .stdout(contains("Computer.java"));
}

#[test]
fn show_unknown_item_fails() {
    lessonbook()
        .args(["show", "99", "--no-run"])
        .assert()
        .failure()
        .stderr(contains("item 99 not found"));
}
