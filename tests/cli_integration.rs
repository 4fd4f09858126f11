use std::process::Command;

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_solar-quote"))
        .args(args)
        .output()
        .expect("solar-quote process should run")
}

fn parse_metric(stdout: &str, label: &str) -> String {
    let line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("missing line `{label}` in output: {stdout}"));
    line.split_once(':')
        .map(|(_, right)| right.trim().to_string())
        .unwrap_or_else(|| panic!("invalid format for line `{line}`"))
}

#[test]
fn sample_quote_prints_report_and_exports_csv() {
    let csv_path = std::env::temp_dir().join(format!("solar-quote-cli-{}.csv", std::process::id()));
    let csv_arg = csv_path.to_string_lossy().to_string();

    let output = run(&["--quote", "quotes/sample_6_6kw.toml", "--projection-out", &csv_arg]);
    assert!(
        output.status.success(),
        "quote run failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    assert_eq!(parse_metric(&stdout, "Certificates:"), "63 STCs");
    assert_eq!(parse_metric(&stdout, "Battery rebate:"), "$2970");
    assert_eq!(parse_metric(&stdout, "Eligible:"), "yes");
    assert_eq!(parse_metric(&stdout, "Compliant:"), "true");
    assert_eq!(parse_metric(&stdout, "Break-even year:"), "7");

    let csv = std::fs::read_to_string(&csv_path).unwrap_or_default();
    let _ = std::fs::remove_file(&csv_path);
    assert_eq!(csv.lines().count(), 26);
}

#[test]
fn three_phase_quote_reports_problems_without_failing() {
    let output = run(&["--quote", "quotes/three_phase_13kw.toml"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout should be valid UTF-8");
    assert_eq!(parse_metric(&stdout, "Certificates:"), "101 STCs");
    assert_eq!(parse_metric(&stdout, "Eligible:"), "no");
    assert_eq!(parse_metric(&stdout, "Compliant:"), "false");
    assert!(stdout.contains("Surge protection recommended"));
}

#[test]
fn missing_quote_file_fails() {
    let output = run(&["--quote", "quotes/does_not_exist.toml"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does_not_exist.toml"));
}

#[test]
fn bad_arguments_exit_with_usage() {
    let output = run(&["--bogus"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown argument: --bogus"));
}
