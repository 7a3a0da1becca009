use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const DEFAULT_URL: &str = "https://github.com/kaw393939";

fn qrstamp(cwd: &Path, args: &[&str]) -> Output {
    qrstamp_with_env(cwd, args, &[])
}

fn qrstamp_with_env(cwd: &Path, args: &[&str], vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_qrstamp"));
    cmd.current_dir(cwd).args(args).env_remove("XDG_CONFIG_HOME");
    for (key, _) in std::env::vars_os() {
        if key.to_string_lossy().starts_with("QRSTAMP_") {
            cmd.env_remove(key);
        }
    }
    cmd.envs(vars.iter().copied());
    cmd.output().expect("run qrstamp")
}

fn json_outcome(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("json on stdout")
}

fn is_timestamped_name(name: &str) -> bool {
    let Some(stamp) = name
        .strip_prefix("QRCode_")
        .and_then(|rest| rest.strip_suffix(".png"))
    else {
        return false;
    };
    stamp.len() == 14 && stamp.chars().all(|c| c.is_ascii_digit())
}

#[test]
fn default_run_encodes_default_url() {
    let dir = tempfile::tempdir().unwrap();

    let output = qrstamp(dir.path(), &["--json", "--verify"]);

    assert_eq!(output.status.code(), Some(0));
    let outcome = json_outcome(&output);
    assert_eq!(outcome["status"], "saved");
    assert_eq!(outcome["url"], DEFAULT_URL);
    assert_eq!(outcome["verified"], true);

    let entries: Vec<String> = fs::read_dir(dir.path().join("qr_codes"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(is_timestamped_name(&entries[0]), "name: {}", entries[0]);
}

#[test]
fn url_flag_overrides_default() {
    let dir = tempfile::tempdir().unwrap();

    let output = qrstamp(dir.path(), &["--json", "--url", "https://example.com/custom"]);

    assert_eq!(output.status.code(), Some(0));
    let outcome = json_outcome(&output);
    assert_eq!(outcome["url"], "https://example.com/custom");
    let path = outcome["file"]["path"].as_str().unwrap();
    let name = Path::new(path).file_name().unwrap().to_string_lossy();
    assert!(is_timestamped_name(&name), "name: {name}");
}

#[test]
fn invalid_url_is_a_soft_failure() {
    let dir = tempfile::tempdir().unwrap();

    let output = qrstamp(dir.path(), &["--json", "--url", "not a url"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(json_outcome(&output)["status"], "invalid_url");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid URL provided"), "stderr: {stderr}");
    assert_eq!(fs::read_dir(dir.path().join("qr_codes")).unwrap().count(), 0);
}

#[test]
fn uncreatable_output_directory_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("blocker"), b"").unwrap();

    let output = qrstamp(dir.path(), &["--output-dir", "blocker/qr_codes"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to create directory"), "stderr: {stderr}");
}

#[test]
fn unknown_color_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();

    let output = qrstamp(dir.path(), &["--fill-color", "blurple"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("qr_codes").exists());
}

#[test]
fn config_file_in_working_directory_is_used() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("qrstamp.toml"),
        "[output]\ndirectory = \"codes\"\nfile_prefix = \"Link\"\n",
    )
    .unwrap();

    let output = qrstamp(dir.path(), &["--json"]);

    assert_eq!(output.status.code(), Some(0));
    let entries: Vec<String> = fs::read_dir(dir.path().join("codes"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with("Link_"), "name: {}", entries[0]);
}

#[test]
fn huge_module_size_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();

    let output = qrstamp_with_env(dir.path(), &[], &[("QRSTAMP_MODULE_SIZE", "4000000000")]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Module size"), "stderr: {stderr}");
    assert!(!dir.path().join("qr_codes").exists());
}

#[test]
fn timestamp_format_with_separator_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("qrstamp.toml"),
        "[output]\ntimestamp_format = \"%Y/%m%d\"\n",
    )
    .unwrap();

    let output = qrstamp(dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("path separators"), "stderr: {stderr}");
    assert!(!dir.path().join("qr_codes").exists());
}
