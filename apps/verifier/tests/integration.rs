//! Integration tests for the package-verifier CLI

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write_config(dir: &Path, extra: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    let contents = format!(
        r#"
[app_settings]
repository_cache_interval_minutes = 30
is_debug_mode = false
github_user_name = "verifier-bot"
github_password = "hunter2"
site_url = "https://verifier.example.org"
system_email_address = "verifier@example.org"
insert_test_data = "false"

[connection_strings]
"chocolatey.package.verifier" = "Server=db;Database=verifier"
{extra}
"#
    );
    std::fs::write(&path, contents).unwrap();
    path
}

fn verifier(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_package-verifier"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("VERIFIER_LOG")
        .env_remove("VERIFIER_CONTENT_ROOT")
        .output()
        .expect("Failed to execute package-verifier")
}

#[test]
fn test_cli_version() {
    let output = verifier(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("package-verifier"));
}

#[test]
fn test_cli_help() {
    let output = verifier(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Verifies submitted packages"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("show-config"));
}

#[test]
fn test_cli_invalid_command() {
    let output = verifier(&["invalid-command"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn test_show_config_json() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "");
    let output = verifier(&["--json", "--config", config.to_str().unwrap(), "show-config"]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["repository_cache_interval_minutes"]["value"], 30);
    assert_eq!(value["site_url"]["value"], "https://verifier.example.org");
    assert_eq!(value["github_password"]["value"], "********");
    assert_eq!(value["is_debug"]["value"], false);
    assert_eq!(value["insert_test_data"]["value"], false);
}

#[test]
fn test_show_config_reports_missing_settings() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("empty.toml");
    std::fs::write(&config, "").unwrap();
    let output = verifier(&["--json", "--config", config.to_str().unwrap(), "show-config"]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["site_url"]["value"].is_null());
    assert!(value["site_url"]["error"].is_string());
    assert_eq!(value["is_debug"]["value"], false);
}

#[test]
fn test_run_once_starts_and_stops_tasks() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "");
    let output = verifier(&["--config", config.to_str().unwrap(), "run", "--once"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("work completed"));
}

#[test]
fn test_missing_pickup_directory_fails_startup() {
    let temp = TempDir::new().unwrap();
    let config = write_config(
        temp.path(),
        "[mail]\ndelivery_method = \"specified_pickup_directory\"\n",
    );
    let output = verifier(&["--config", config.to_str().unwrap(), "run", "--once"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("mail.pickup_directory_not_configured"));
}

#[test]
fn test_send_test_mail_writes_to_resolved_pickup_directory() {
    let temp = TempDir::new().unwrap();
    let config = write_config(
        temp.path(),
        "[mail]\ndelivery_method = \"specified_pickup_directory\"\npickup_directory_location = \"mail_drop\"\n",
    );
    let output = verifier(&[
        "--config",
        config.to_str().unwrap(),
        "--content-root",
        temp.path().to_str().unwrap(),
        "send-test-mail",
        "--to",
        "maintainer@example.org",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let drop = temp.path().join("mail_drop");
    let files: Vec<_> = std::fs::read_dir(&drop)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].extension().and_then(|e| e.to_str()), Some("eml"));

    let contents = std::fs::read_to_string(&files[0]).unwrap();
    assert!(contents.contains("From: verifier@example.org\r\n"));
    assert!(contents.contains("To: maintainer@example.org\r\n"));
}

#[test]
fn test_log_filter_from_environment_applies_to_console() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "[logging]\nfilter = \"off\"\n");

    let quiet = verifier(&["--config", config.to_str().unwrap(), "show-config"]);
    assert!(quiet.status.success());
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("Starting package-verifier"));

    let output = Command::new(env!("CARGO_BIN_EXE_package-verifier"))
        .args(["--config", config.to_str().unwrap(), "show-config"])
        .env_remove("RUST_LOG")
        .env_remove("VERIFIER_CONTENT_ROOT")
        .env("VERIFIER_LOG", "info")
        .output()
        .expect("Failed to execute package-verifier");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Starting package-verifier"));
}

#[test]
fn test_relative_content_root_resolves_pickup_directory() {
    let temp = TempDir::new().unwrap();
    let config = write_config(
        temp.path(),
        "[mail]\ndelivery_method = \"specified_pickup_directory\"\npickup_directory_location = \"mail_drop\"\n",
    );
    let output = Command::new(env!("CARGO_BIN_EXE_package-verifier"))
        .current_dir(temp.path())
        .args([
            "--config",
            config.to_str().unwrap(),
            "--content-root",
            "site",
            "send-test-mail",
            "--to",
            "maintainer@example.org",
        ])
        .env_remove("RUST_LOG")
        .env_remove("VERIFIER_CONTENT_ROOT")
        .output()
        .expect("Failed to execute package-verifier");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let drop = temp.path().join("site").join("mail_drop");
    assert_eq!(std::fs::read_dir(&drop).unwrap().count(), 1);
}

#[test]
fn test_json_mode_reports_errors_on_stdout() {
    let temp = TempDir::new().unwrap();
    let config = write_config(
        temp.path(),
        "[mail]\ndelivery_method = \"specified_pickup_directory\"\n",
    );
    let output = verifier(&["--json", "--config", config.to_str().unwrap(), "run", "--once"]);

    assert!(!output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["error"]["code"], "mail.pickup_directory_not_configured");
    assert_eq!(value["error"]["retryable"], false);
    assert_eq!(value["error"]["detail"]["Mail"], "PickupDirectoryNotConfigured");
}
