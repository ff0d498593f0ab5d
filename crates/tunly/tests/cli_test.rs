//! Integration tests for the `tunly` CLI binary.
//!
//! Every test points `--config` into a temp directory so the user's real
//! configuration is never read or written.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const EU_NODE: &str = "vless://11111111-2222-3333-4444-555555555555@203.0.113.5:443\
    ?security=tls&type=ws&path=%2Fws&host=example.com#EU-Node";

/// base64 of two links, a non-vless line, CRLF endings and padding spaces.
const SUBSCRIPTION_B64: &str = "dmxlc3M6Ly9hQG9uZS5leGFtcGxlOjQ0Mz9zZWN1cml0eT10bHMjT25lDQpzczovL2lnbm9yZWQKICB2bGVzczovL2JAdHdvLmV4YW1wbGU6ODQ0MyAgCg==";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `tunly` binary with env isolation.
fn tunly_cmd(config: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tunly");
    cmd.env("HOME", "/tmp/tunly-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/tunly-cli-test-nonexistent")
        .env_remove("TUNLY_CONFIG")
        .env_remove("TUNLY_OUTPUT")
        .env_remove("TUNLY_CORE__LOG_CAPACITY")
        .env_remove("TUNLY_DEFAULTS__OUTPUT")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

fn temp_config() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    (dir, path)
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = cargo_bin_cmd!("tunly").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    let (_dir, config) = temp_config();
    tunly_cmd(&config).arg("--help").assert().success().stdout(
        predicate::str::contains("link")
            .and(predicate::str::contains("sub"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_completions_bash() {
    let (_dir, config) = temp_config();
    tunly_cmd(&config)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tunly"));
}

// ── link ────────────────────────────────────────────────────────────

#[test]
fn test_link_parse_json() {
    let (_dir, config) = temp_config();
    tunly_cmd(&config)
        .args(["link", "parse", EU_NODE, "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""address": "203.0.113.5""#)
                .and(predicate::str::contains(r#""type": "ws""#))
                .and(predicate::str::contains(r#""path": "/ws""#))
                .and(predicate::str::contains(r#""name": "EU-Node""#)),
        );
}

#[test]
fn test_link_parse_plain_prints_canonical_link() {
    let (_dir, config) = temp_config();
    tunly_cmd(&config)
        .args(["link", "parse", EU_NODE, "-o", "plain"])
        .assert()
        .success()
        .stdout(format!("{EU_NODE}\n"));
}

#[test]
fn test_link_parse_table_shows_only_set_params() {
    let (_dir, config) = temp_config();
    tunly_cmd(&config)
        .args(["link", "parse", EU_NODE])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("address")
                .and(predicate::str::contains("example.com"))
                .and(predicate::str::contains("pbk").not()),
        );
}

#[test]
fn test_link_parse_rejects_other_schemes() {
    let (_dir, config) = temp_config();
    tunly_cmd(&config)
        .args(["link", "parse", "vmess://abc@host:1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Not a valid vless:// link"));
}

#[test]
fn test_link_build_minimal() {
    let (_dir, config) = temp_config();
    tunly_cmd(&config)
        .args([
            "link", "build", "--uuid", "u", "--address", "h", "--port", "443", "-o", "plain",
        ])
        .assert()
        .success()
        .stdout("vless://u@h:443?security=none&type=tcp\n");
}

#[test]
fn test_link_build_encodes_name() {
    let (_dir, config) = temp_config();
    tunly_cmd(&config)
        .args([
            "link", "build", "--uuid", "u", "--address", "h", "--port", "443", "--security",
            "reality", "--pbk", "KEY", "--name", "My Node",
        ])
        .assert()
        .success()
        .stdout("vless://u@h:443?security=reality&type=tcp&pbk=KEY#My%20Node\n");
}

#[test]
fn test_link_build_rejects_bad_port() {
    let (_dir, config) = temp_config();
    tunly_cmd(&config)
        .args(["link", "build", "--uuid", "u", "--address", "h", "--port", "70000"])
        .assert()
        .code(2);
}

#[test]
fn test_link_name_falls_back_to_address() {
    let (_dir, config) = temp_config();
    tunly_cmd(&config)
        .args(["link", "name", "vless://u@node.example:1"])
        .assert()
        .success()
        .stdout("node.example\n");
}

// ── sub ─────────────────────────────────────────────────────────────

#[test]
fn test_sub_extract_base64_from_stdin() {
    let (_dir, config) = temp_config();
    tunly_cmd(&config)
        .args(["sub", "extract", "-o", "plain"])
        .write_stdin(SUBSCRIPTION_B64)
        .assert()
        .success()
        .stdout("vless://a@one.example:443?security=tls#One\nvless://b@two.example:8443\n");
}

#[test]
fn test_sub_extract_plain_file_as_json() {
    let (dir, config) = temp_config();
    let body = dir.path().join("sub.txt");
    std::fs::write(&body, format!("# comment\n{EU_NODE}\n")).unwrap();

    tunly_cmd(&config)
        .args(["sub", "extract", "-o", "json-compact"])
        .arg(&body)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name":"EU-Node""#));
}

#[test]
fn test_sub_extract_empty_body_fails() {
    let (_dir, config) = temp_config();
    tunly_cmd(&config)
        .args(["sub", "extract"])
        .write_stdin("nothing to see here\n")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No links found in stdin"));
}

// ── config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    let (_dir, config) = temp_config();
    tunly_cmd(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let (_dir, config) = temp_config();
    tunly_cmd(&config).args(["config", "init"]).assert().success();
    assert!(config.exists());

    tunly_cmd(&config)
        .args(["config", "init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    tunly_cmd(&config)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_show_applies_env_override() {
    let (_dir, config) = temp_config();
    tunly_cmd(&config)
        .env("TUNLY_CORE__LOG_CAPACITY", "42")
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""log_capacity": 42"#));
}

#[test]
fn test_config_show_rejects_zero_capacity() {
    let (_dir, config) = temp_config();
    std::fs::write(&config, "[core]\nevent_channel_capacity = 0\n").unwrap();

    tunly_cmd(&config)
        .args(["config", "show"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("event_channel_capacity"));
}

#[test]
fn test_config_default_output_is_used() {
    let (_dir, config) = temp_config();
    std::fs::write(&config, "[defaults]\noutput = \"json-compact\"\n").unwrap();

    tunly_cmd(&config)
        .args(["link", "name", EU_NODE])
        .assert()
        .success()
        .stdout("{\"name\":\"EU-Node\"}\n");
}
