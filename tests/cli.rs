//! CLI behavior tests: exit codes, output formats, init.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const SITE: &str = "test-fixtures/site";
const GOOD_PAGE: &str = "test-fixtures/site/index.html";
const WEAK_PAGE: &str = "test-fixtures/site/weak.html";

fn seoscope_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_seoscope"));
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    let s = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(s.trim()).expect("valid JSON")
}

#[test]
fn no_args_returns_error_not_panic() {
    let mut cmd = seoscope_cmd();
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("PATH").or(predicate::str::contains("path")));
}

#[test]
fn good_page_passes_threshold() {
    let mut cmd = seoscope_cmd();
    cmd.arg(GOOD_PAGE).arg("--threshold").arg("90");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("100%"));
}

#[test]
fn below_threshold_exit_1() {
    let mut cmd = seoscope_cmd();
    cmd.arg(WEAK_PAGE).arg("--threshold").arg("50");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("below threshold 50"));
}

#[test]
fn threshold_at_exact_boundary() {
    // weak.html scores 25
    let mut cmd = seoscope_cmd();
    cmd.arg(WEAK_PAGE).arg("--threshold").arg("25");
    cmd.assert().success();

    let mut cmd = seoscope_cmd();
    cmd.arg(WEAK_PAGE).arg("--threshold").arg("26");
    cmd.assert().failure().code(1);
}

#[test]
fn file_not_found_exit_2() {
    let mut cmd = seoscope_cmd();
    cmd.arg("nonexistent.html");
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("nonexistent"));
}

#[test]
fn json_output_for_single_page() {
    let mut cmd = seoscope_cmd();
    cmd.arg(WEAK_PAGE).arg("--json");
    let parsed = json_stdout(&mut cmd);

    assert_eq!(parsed["filePath"], WEAK_PAGE);
    assert_eq!(parsed["score"]["value"], 25);
    assert_eq!(parsed["score"]["tier"], "bad");
    assert_eq!(parsed["headings"]["h1"], 2);
    assert_eq!(parsed["images"]["missingAlt"], 1);
    assert_eq!(parsed["faviconExists"], true);
    assert_eq!(parsed["normalizedKeywords"][0]["word"], "photo");

    let rules: Vec<&str> = parsed["deductions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["rule"].as_str().unwrap())
        .collect();
    assert_eq!(
        rules,
        vec![
            "title-missing",
            "description-length",
            "image-alt",
            "h1-count",
            "h2-count"
        ]
    );
}

#[test]
fn json_output_for_directory_has_summary() {
    let mut cmd = seoscope_cmd();
    cmd.arg(SITE).arg("--json");
    let parsed = json_stdout(&mut cmd);

    let results = parsed["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    // sorted paths
    assert_eq!(results[0]["filePath"], "test-fixtures/site/blog/post.html");
    // site/favicon.ico applies to the nested page too
    assert_eq!(results[0]["faviconExists"], true);
    assert_eq!(results[0]["score"]["value"], 75);
    assert_eq!(parsed["summary"]["filesAnalyzed"], 3);
    // (75 + 100 + 25) / 3
    assert_eq!(parsed["summary"]["averageScore"], 66);
    assert_eq!(parsed["summary"]["averageTier"], "warning");
}

#[test]
fn favicon_flags_change_the_score() {
    let post = "test-fixtures/site/blog/post.html";

    // a single file's own directory is the site root; blog/ has no favicon
    let mut cmd = seoscope_cmd();
    cmd.arg(post).arg("--json");
    assert_eq!(json_stdout(&mut cmd)["score"]["value"], 60);

    let mut cmd = seoscope_cmd();
    cmd.arg(post).arg("--json").arg("--has-favicon");
    assert_eq!(json_stdout(&mut cmd)["score"]["value"], 75);

    let mut cmd = seoscope_cmd();
    cmd.arg(post)
        .arg("--json")
        .arg("--favicon")
        .arg("test-fixtures/site/favicon.ico");
    assert_eq!(json_stdout(&mut cmd)["faviconExists"], true);

    let mut cmd = seoscope_cmd();
    cmd.arg(GOOD_PAGE).arg("--json").arg("--no-favicon");
    assert_eq!(json_stdout(&mut cmd)["score"]["value"], 85);
}

#[test]
fn favicon_flags_conflict() {
    let mut cmd = seoscope_cmd();
    cmd.arg(GOOD_PAGE).arg("--has-favicon").arg("--no-favicon");
    cmd.assert().failure().code(2);
}

#[test]
fn title_override_replaces_document_title() {
    let mut cmd = seoscope_cmd();
    cmd.arg(GOOD_PAGE).arg("--json").arg("--title").arg("Hi");
    let parsed = json_stdout(&mut cmd);
    assert_eq!(parsed["title"]["value"], "Hi");
    assert_eq!(parsed["score"]["value"], 85);
}

#[test]
fn site_url_flag_classifies_links() {
    let mut cmd = seoscope_cmd();
    cmd.arg(GOOD_PAGE)
        .arg("--json")
        .arg("--site-url")
        .arg("https://other.org");
    let parsed = json_stdout(&mut cmd);
    assert_eq!(parsed["links"]["total"], 2);
    assert_eq!(parsed["links"]["internal"], 2);
    assert_eq!(parsed["links"]["external"], 0);
}

#[test]
fn quiet_prints_one_line_per_page() {
    let mut cmd = seoscope_cmd();
    cmd.arg(SITE).arg("--quiet");
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "{}", stdout);
    assert!(lines[1].contains("index.html: 100"));
    assert!(lines[2].contains("weak.html: 25"));
}

#[test]
fn console_output_lists_deductions_and_recommendations() {
    let mut cmd = seoscope_cmd();
    cmd.arg(WEAK_PAGE);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Title is missing"))
        .stdout(predicate::str::contains("Expected exactly one H1 heading, found 2"))
        .stdout(predicate::str::contains("Recommendations"));
}

#[test]
fn quick_mode_json() {
    let mut cmd = seoscope_cmd();
    cmd.arg(GOOD_PAGE).arg("--quick").arg("--json");
    let parsed = json_stdout(&mut cmd);
    assert_eq!(parsed["audit"]["passed"], 4);
    assert_eq!(parsed["audit"]["total"], 4);
    assert_eq!(parsed["audit"]["tier"], "good");
}

#[test]
fn quick_mode_threshold_uses_passed_percentage() {
    let mut cmd = seoscope_cmd();
    cmd.arg(WEAK_PAGE).arg("--quick").arg("--threshold").arg("1");
    cmd.assert().failure().code(1);
}

#[test]
fn parallel_matches_sequential() {
    let mut seq = seoscope_cmd();
    seq.arg(SITE).arg("--json");
    let mut par = seoscope_cmd();
    par.arg(SITE).arg("--json").arg("--parallel").arg("--jobs").arg("2");
    assert_eq!(json_stdout(&mut seq), json_stdout(&mut par));
}

#[test]
fn config_threshold_applies() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("page.html"), "<h1>Only</h1>\n<p>text</p>").unwrap();
    fs::write(dir.path().join(".seoscoperc.json"), r#"{ "threshold": 95 }"#).unwrap();

    let mut cmd = seoscope_cmd();
    cmd.arg(dir.path());
    cmd.assert().failure().code(1);

    // CLI threshold wins over config
    let mut cmd = seoscope_cmd();
    cmd.arg(dir.path()).arg("--threshold").arg("0");
    cmd.assert().success();
}

#[test]
fn config_ignore_skips_pages() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("drafts")).unwrap();
    fs::write(dir.path().join("a.html"), "<h1>A</h1>").unwrap();
    fs::write(dir.path().join("drafts/b.html"), "<h1>B</h1>").unwrap();
    fs::write(
        dir.path().join(".seoscoperc.json"),
        r#"{ "ignore": ["**/drafts/**"] }"#,
    )
    .unwrap();

    let mut cmd = seoscope_cmd();
    cmd.arg(dir.path()).arg("--quiet");
    let output = cmd.output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1, "{}", stdout);
    assert!(stdout.contains("a.html"));
}

#[test]
fn empty_directory_warns() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut cmd = seoscope_cmd();
    cmd.arg(dir.path());
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("No HTML pages found"));
}

#[test]
fn init_creates_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join(".seoscoperc.json");
    let mut cmd = seoscope_cmd();
    cmd.arg("init").arg("--dir").arg(dir.path());
    cmd.assert().success();

    assert!(config_path.exists(), ".seoscoperc.json should be created");
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
    assert_eq!(parsed["threshold"], 70);
    assert_eq!(parsed["siteUrl"], "https://example.com");
    assert_eq!(parsed["favicon"], "favicon.ico");
}

#[test]
fn init_with_options() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut cmd = seoscope_cmd();
    cmd.arg("init")
        .arg("--dir")
        .arg(dir.path())
        .arg("--threshold")
        .arg("85")
        .arg("--site-url")
        .arg("https://mysite.dev");
    cmd.assert().success();

    let content = fs::read_to_string(dir.path().join(".seoscoperc.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["threshold"], 85);
    assert_eq!(parsed["siteUrl"], "https://mysite.dev");
}

#[test]
fn init_does_not_overwrite_existing_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join(".seoscoperc.json");
    fs::write(&config_path, r#"{ "threshold": 12 }"#).unwrap();

    let mut cmd = seoscope_cmd();
    cmd.arg("init").arg("--dir").arg(dir.path());
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(
        fs::read_to_string(&config_path).unwrap(),
        r#"{ "threshold": 12 }"#
    );
}

#[test]
fn mcp_answers_initialize_over_stdio() {
    let mut cmd = seoscope_cmd();
    cmd.arg("mcp").write_stdin(
        "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\"}\n\
         {\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n",
    );
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "notifications get no reply: {}", stdout);
    let resp: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(resp["id"], 1);
    assert_eq!(resp["result"]["serverInfo"]["name"], "seoscope");
}
