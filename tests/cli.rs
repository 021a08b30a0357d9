use assert_cmd::Command;

#[test]
fn help_lists_game_options() {
    let output = Command::cargo_bin("huemix")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--mode", "--difficulty", "--time-limit", "--max-actions", "--accuracy-threshold"] {
        assert!(stdout.contains(flag), "missing {flag} in help");
    }
}

#[test]
fn rejects_unknown_mode() {
    Command::cargo_bin("huemix")
        .unwrap()
        .args(["--mode", "blitz"])
        .assert()
        .failure();
}

#[test]
fn rejects_out_of_range_threshold() {
    let output = Command::cargo_bin("huemix")
        .unwrap()
        .args(["--accuracy-threshold", "150"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("out of range"));
}
