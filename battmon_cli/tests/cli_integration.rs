use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

// 1792 mV at the pin reads back exactly under 11 dB / 12 bit / 1100 mV;
// through a 1:1 divider that is a 3.584 V battery, 48 % of 3.0..4.2 V.
const VALID: &str = r#"
[adc]
channel = 6

[divider]
r1 = 10000
r2 = 10000

[battery]
v_min = 3.0
v_max = 4.2
low_threshold_v = 3.3

[simulation]
divider_mv = 1792
noise_counts = 0
"#;

fn write_config(dir: &tempfile::TempDir, toml: &str) -> PathBuf {
    let path = dir.path().join("battmon.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn battmon(cfg: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("battmon").unwrap();
    cmd.arg("--config").arg(cfg).arg("--log-level").arg("warn");
    cmd
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["read"], 0, "3.584 V (48%) raw=2048 pin=1792 mV", "stdout")]
#[case(&["read", "--mode", "median"], 0, "3.584 V", "stdout")]
#[case(&["read", "--mode", "ema", "--alpha", "1.0"], 0, "3.584 V", "stdout")]
#[case(&["read", "--mode", "kalman"], 2, "unknown filter mode", "stderr")]
#[case(&["self-check"], 0, "ok: 3.584 V (48%)", "stdout")]
#[case(&["watch", "--interval-ms", "abc"], 2, "invalid value", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, VALID);

    let mut cmd = battmon(&cfg);
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[test]
fn read_json_prints_one_object() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, VALID);

    let out = battmon(&cfg).arg("--json").arg("read").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let v: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(v["raw"], 2048);
    assert_eq!(v["millivolts"], 1792);
    assert_eq!(v["percent"], 48);
    assert_eq!(v["low"], false);
    assert!((v["battery_v"].as_f64().unwrap() - 3.584).abs() < 1e-3);
}

#[test]
fn low_flag_follows_threshold() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, &VALID.replace("low_threshold_v = 3.3", "low_threshold_v = 3.6"));
    battmon(&cfg)
        .arg("read")
        .assert()
        .success()
        .stdout(predicate::str::contains("(48%) LOW"));
}

#[test]
fn watch_stops_after_count() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, VALID);

    let out = battmon(&cfg)
        .args(["--json", "watch", "--interval-ms", "10", "--count", "3"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in lines {
        let v: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(v["raw"], 2048);
    }
}

#[test]
fn trace_replay_feeds_the_reader() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, VALID);
    let trace = dir.path().join("trace.csv");
    let mut f = fs::File::create(&trace).unwrap();
    writeln!(f, "raw").unwrap();
    for _ in 0..15 {
        writeln!(f, "2048").unwrap();
    }

    // The simulator would say 1792 mV too; move it so only the trace can match
    let cfg_text = VALID.replace("divider_mv = 1792", "divider_mv = 1000");
    fs::write(&cfg, cfg_text).unwrap();

    battmon(&cfg)
        .arg("--trace")
        .arg(&trace)
        .arg("read")
        .assert()
        .success()
        .stdout(predicate::str::contains("raw=2048 pin=1792 mV"));
}

#[test]
fn trace_with_bad_header_is_a_config_error() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, VALID);
    let trace = dir.path().join("trace.csv");
    fs::write(&trace, "code\n2048\n").unwrap();

    battmon(&cfg)
        .arg("--trace")
        .arg(&trace)
        .arg("read")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must have header 'raw'"));
}

#[rstest]
#[case("v_min = 3.0", "v_min = 5.0", "battery.v_min must be < battery.v_max")]
#[case("r2 = 10000", "r2 = 0", "divider.r2 must be > 0")]
#[case("[simulation]", "[calibration]\nreference_mv = 900\n\n[simulation]", "calibration.reference_mv")]
fn invalid_config_exits_with_code_two(#[case] from: &str, #[case] to: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, &VALID.replace(from, to));
    battmon(&cfg)
        .arg("read")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(needle));
}

#[test]
fn missing_config_file_exits_with_code_two() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("absent.toml");
    battmon(&cfg)
        .arg("read")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("What happened: Configuration is invalid"));
}

#[test]
fn json_errors_are_structured() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, &VALID.replace("r2 = 10000", "r2 = 0"));
    let out = battmon(&cfg).args(["--json", "read"]).output().unwrap();
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8(out.stderr).unwrap();
    let line = stderr
        .lines()
        .find(|l| l.contains("\"reason\""))
        .expect("json error line");
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["reason"], "Config");
    assert_eq!(v["exit_code"], 2);
}

#[test]
fn log_file_receives_json_lines() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("battmon.log");
    let toml = format!(
        "{VALID}\n[logging]\nfile = {:?}\nlevel = \"info\"\n",
        log.display().to_string()
    );
    let cfg = write_config(&dir, &toml);

    Command::cargo_bin("battmon")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("read")
        .assert()
        .success();

    let text = fs::read_to_string(&log).unwrap();
    assert!(text.lines().any(|l| l.contains("battery read")));
}
