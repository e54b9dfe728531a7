use std::fs::write;
use std::process::Command;

use tempfile::tempdir;

fn exe() -> Command {
    Command::new(env!("CARGO_BIN_EXE_seo-analyzer"))
}

#[test]
fn check_accepts_valid_config() {
    let td = tempdir().expect("tempdir");
    let cfg = td.path().join("seo.yaml");
    write(&cfg, "results: 3\ncompetitor_urls:\n  - https://a.test\n").expect("write config");

    let output = exe()
        .args(["check", "--config", cfg.to_str().unwrap()])
        .output()
        .expect("run check");

    assert!(output.status.success(), "check failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Config is valid"));
    assert!(stdout.contains("Results: 3"));
    assert!(stdout.contains("Result selector: div.tF2Cxc"));
}

#[test]
fn check_rejects_invalid_config() {
    let td = tempdir().expect("tempdir");
    let cfg = td.path().join("seo.toml");
    write(&cfg, "timeout_secs = 0\n").expect("write config");

    let output = exe()
        .args(["check", "--config", cfg.to_str().unwrap()])
        .output()
        .expect("run check");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Config error"));
}

#[test]
fn analyze_requires_keyword_and_url() {
    let output = exe()
        .args(["analyze", "--url", "https://mine.test"])
        .output()
        .expect("run analyze");

    assert_eq!(output.status.code(), Some(2));
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("Please enter both a keyword and your content URL.")
    );
}

#[test]
fn analyze_reports_a_single_error_line() {
    let td = tempdir().expect("tempdir");
    let cfg = td.path().join("seo.json");
    // Nothing listens on port 9: every fetch fails, so no competitor survives.
    write(
        &cfg,
        r#"{"competitor_urls": ["http://127.0.0.1:9/a"], "timeout_secs": 2}"#,
    )
    .expect("write config");

    let output = exe()
        .args([
            "analyze",
            "--keyword",
            "widget",
            "--url",
            "http://127.0.0.1:9/mine",
            "--config",
            cfg.to_str().unwrap(),
            "--quiet",
        ])
        .output()
        .expect("run analyze");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Something went wrong"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Score:"));
}

#[tokio::test(flavor = "multi_thread")]
async fn analyze_prints_report_when_stderr_is_not_a_terminal() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    for (route, body) in [
        ("/rival", "<p>widget guide with many more words than mine</p>"),
        ("/mine", "<h1>widget</h1><p>short widget page</p>"),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
            .mount(&server)
            .await;
    }

    let td = tempdir().expect("tempdir");
    let cfg = td.path().join("seo.json");
    write(
        &cfg,
        format!(r#"{{"competitor_urls": ["{}/rival"]}}"#, server.uri()),
    )
    .expect("write config");
    let target = format!("{}/mine", server.uri());

    // No --quiet: the spinner is active, and piped stderr hides its draw target.
    let output = tokio::task::spawn_blocking(move || {
        exe()
            .args([
                "analyze",
                "--keyword",
                "widget",
                "--url",
                target.as_str(),
                "--config",
                cfg.to_str().unwrap(),
            ])
            .output()
            .expect("run analyze")
    })
    .await
    .expect("join");

    assert!(output.status.success(), "analyze failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Score:"), "report missing from stdout: {stdout}");
    assert!(stdout.contains("Word count is below average"));
    assert!(stdout.contains("/rival"));
}
