use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn annobox() -> Command {
    let mut cmd = Command::cargo_bin("annobox").unwrap();
    cmd.env_remove("ANNOBOX_VIEWPORT")
        .env_remove("ANNOBOX_MIN_BOX_SIZE");
    cmd
}

#[test]
fn runs() {
    annobox().assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = annobox();
    cmd.arg("-V");
    cmd.assert().success().stdout("annobox 0.1.0\n");
}

// Replay subcommand tests

#[test]
fn replay_writes_all_requested_exports() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let out = temp.path().join("out");

    let mut cmd = annobox();
    cmd.args(["replay", "tests/fixtures/session_basic.json", "--out"])
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2 box(es), 3 export(s)"));

    assert_eq!(
        fs::read_to_string(out.join("classes.txt")).unwrap(),
        "car\nperson"
    );
    assert_eq!(
        fs::read_to_string(out.join("street.txt")).unwrap(),
        "1 0.250000 0.500000 0.100000 0.200000\n0 0.700000 0.400000 0.200000 0.400000"
    );

    let coco: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("street.json")).unwrap()).unwrap();
    assert_eq!(coco["annotations"].as_array().unwrap().len(), 2);
    assert_eq!(
        coco["annotations"][1]["bbox"],
        serde_json::json!([600.0, 100.0, 200.0, 200.0])
    );

    let voc = fs::read_to_string(out.join("street.xml")).unwrap();
    roxmltree::Document::parse(&voc).expect("well-formed VOC");
    assert!(voc.contains("<name>person</name>"));
}

#[test]
fn replay_skips_rejected_steps() {
    let temp = tempfile::tempdir().expect("create temp dir");

    let mut cmd = annobox();
    cmd.args(["replay", "tests/fixtures/session_rejected.json", "--out"])
        .arg(temp.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("step 3 skipped"))
        .stdout(predicate::str::contains("already exists"))
        .stdout(predicate::str::contains("1 box(es)"));

    assert_eq!(
        fs::read_to_string(temp.path().join("a.txt")).unwrap(),
        "0 0.187500 0.175000 0.125000 0.100000"
    );
}

#[test]
fn replay_strict_aborts_on_rejected_step() {
    let temp = tempfile::tempdir().expect("create temp dir");

    let mut cmd = annobox();
    cmd.args([
        "replay",
        "tests/fixtures/session_rejected.json",
        "--strict",
        "--out",
    ])
    .arg(temp.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Category 'dog' already exists"));

    assert!(!temp.path().join("a.txt").exists());
}

#[test]
fn replay_missing_script_fails() {
    let mut cmd = annobox();
    cmd.args(["replay", "tests/fixtures/does_not_exist.json"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn replay_probes_image_files_relative_to_script() {
    let temp = tempfile::tempdir().expect("create temp dir");
    fs::write(temp.path().join("tiny.png"), png_header(40, 20)).unwrap();
    fs::write(
        temp.path().join("script.yaml"),
        "steps:
  - op: load_image_file
    path: tiny.png
  - op: add_category
    name: dot
  - op: select_category
    name: dot
  - op: pointer_down
    x: 0
    y: 300
  - op: pointer_up
    x: 800
    y: 500
  - op: export
    format: yolo
",
    )
    .unwrap();
    let out = temp.path().join("labels");

    let mut cmd = annobox();
    cmd.arg("replay")
        .arg(temp.path().join("script.yaml"))
        .arg("--out")
        .arg(&out);
    cmd.assert().success();

    // 40x20 fitted into 800x800: scale 20, centered vertically at y=200.
    assert_eq!(
        fs::read_to_string(out.join("tiny.txt")).unwrap(),
        "0 0.500000 0.500000 1.000000 0.500000"
    );
}

#[test]
fn viewport_flag_changes_fit() {
    let temp = tempfile::tempdir().expect("create temp dir");
    fs::write(
        temp.path().join("script.json"),
        r#"{"steps": [
            {"op": "load_image", "file_name": "sq.png", "mime": "image/png", "width": 100, "height": 100},
            {"op": "add_category", "name": "a"},
            {"op": "select_category", "name": "a"},
            {"op": "pointer_down", "x": 0, "y": 0},
            {"op": "pointer_up", "x": 100, "y": 100},
            {"op": "export", "format": "yolo"}
        ]}"#,
    )
    .unwrap();

    let mut cmd = annobox();
    cmd.arg("--viewport")
        .arg("200x200")
        .arg("replay")
        .arg(temp.path().join("script.json"))
        .arg("--out")
        .arg(temp.path());
    cmd.assert().success();

    assert_eq!(
        fs::read_to_string(temp.path().join("sq.txt")).unwrap(),
        "0 0.250000 0.250000 0.500000 0.500000"
    );
}

#[test]
fn min_box_size_env_discards_small_boxes() {
    let temp = tempfile::tempdir().expect("create temp dir");

    let mut cmd = annobox();
    cmd.env("ANNOBOX_MIN_BOX_SIZE", "200")
        .args(["replay", "tests/fixtures/session_rejected.json", "--out"])
        .arg(temp.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0 box(es)"))
        .stdout(predicate::str::contains("Nothing to export"));
}

#[test]
fn invalid_min_box_size_is_rejected() {
    for raw in ["NaN", "-1"] {
        let mut cmd = annobox();
        cmd.env("ANNOBOX_MIN_BOX_SIZE", raw)
            .args(["check", "tests/fixtures/session_basic.json"]);
        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("Invalid minimum box size"));
    }
}

// Check subcommand tests

#[test]
fn check_clean_session_passes() {
    let mut cmd = annobox();
    cmd.args(["check", "tests/fixtures/session_basic.json"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Session check passed"));
}

#[test]
fn check_does_not_write_exports() {
    let temp = tempfile::tempdir().expect("create temp dir");

    let mut cmd = annobox();
    cmd.current_dir(temp.path())
        .arg("check")
        .arg(std::env::current_dir().unwrap().join("tests/fixtures/session_basic.json"));
    cmd.assert().success();

    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn check_warnings_pass_unless_strict() {
    let mut cmd = annobox();
    cmd.args(["check", "tests/fixtures/session_warnings.yaml"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("BoxTruncated"))
        .stdout(predicate::str::contains("UnusedCategory"));

    let mut cmd = annobox();
    cmd.args(["check", "tests/fixtures/session_warnings.yaml", "--strict"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("0 error(s) and 2 warning(s)"));
}

#[test]
fn check_reports_missing_image() {
    let mut cmd = annobox();
    cmd.args(["check", "tests/fixtures/session_no_image.json"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("NoImageLoaded"))
        .stdout(predicate::str::contains("step 3 skipped"));
}

#[test]
fn check_json_output_format() {
    let mut cmd = annobox();
    cmd.args([
        "check",
        "tests/fixtures/session_warnings.yaml",
        "--output",
        "json",
    ]);
    let output = cmd.assert().success().get_output().stdout.clone();

    let report: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(report["error_count"], 0);
    assert_eq!(report["warning_count"], 2);
    assert_eq!(report["issues"][0]["code"], "box_truncated");
    assert_eq!(report["issues"][0]["context"]["id"], 1);
    assert_eq!(report["issues"][1]["context"]["name"], "sheep");
}

#[test]
fn check_rejects_unknown_script_extension() {
    let mut cmd = annobox();
    cmd.args(["check", "Cargo.toml"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse session script"));
}

/// PNG signature plus an IHDR chunk; enough for a size probe.
fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 2, 0, 0, 0]);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes
}
