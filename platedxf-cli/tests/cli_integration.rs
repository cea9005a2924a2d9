#![expect(clippy::expect_used, reason = "tests may panic")]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TestDir {
    path: PathBuf,
}

impl TestDir {
    fn new(tag: &str) -> Self {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let path =
            std::env::temp_dir().join(format!("platedxf_cli_{tag}_{}_{}", std::process::id(), ts));
        fs::create_dir_all(&path).expect("create temp test dir");
        Self { path }
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_platedxf(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_platedxf"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("run platedxf")
}

fn count(dxf: &str, entity: &str) -> usize {
    dxf.lines()
        .collect::<Vec<_>>()
        .chunks_exact(2)
        .filter(|pair| pair[0] == "0" && pair[1] == entity)
        .count()
}

#[test]
fn literal_mode_writes_one_file_per_number() {
    let dir = TestDir::new("literal");
    let output = run_platedxf(
        &[
            "--prefix",
            "ABC",
            "--number-prefix",
            "7",
            "--start",
            "1",
            "--end",
            "3",
            "-o",
            "out",
            "--text-mode",
            "literal",
        ],
        &dir.path,
    );
    assert!(output.status.success(), "process failed: {output:?}");

    for n in 1..=3 {
        let path = dir.path.join(format!("out/ABC - 7{n}.dxf"));
        let dxf = fs::read_to_string(&path).expect("read dxf output");
        assert!(dxf.starts_with("0\nSECTION\n2\nHEADER\n"));
        assert!(dxf.ends_with("0\nEOF"));
        assert_eq!(count(&dxf, "TEXT"), 3);
        assert!(dxf.contains(&format!("\n1\n7{n}\n")), "number text missing");
        assert_eq!(count(&dxf, "CIRCLE"), 0, "no bitmap directory given");
    }
}

#[test]
fn outlines_with_embedded_fonts_and_bitmap() {
    let dir = TestDir::new("outlines");
    let bitmaps = dir.path.join("bitmaps");
    fs::create_dir_all(&bitmaps).expect("create bitmap dir");
    fs::write(bitmaps.join("AB - 1.txt"), "010\n111\n010\n").expect("write bitmap");

    let output = run_platedxf(
        &["--prefix", "AB", "--bitmap-dir", "bitmaps", "-o", "."],
        &dir.path,
    );
    assert!(output.status.success(), "process failed: {output:?}");

    let dxf = fs::read_to_string(dir.path.join("AB - 1.dxf")).expect("read dxf output");
    assert_eq!(count(&dxf, "CIRCLE"), 5);
    assert!(count(&dxf, "LWPOLYLINE") >= 4);
    assert!(dxf.contains("\nQR_LAYER\n"));
    assert!(dxf.contains("\nTEXT_LAYER\n"));
}

#[test]
fn malformed_bitmap_file_renders_without_barcode() {
    let dir = TestDir::new("bad-bitmap");
    fs::create_dir_all(dir.path.join("bitmaps")).expect("create bitmap dir");
    fs::write(dir.path.join("bitmaps/AB - 1.txt"), "01\n1\n").expect("write bitmap");

    let output = run_platedxf(
        &["--prefix", "AB", "--bitmap-dir", "bitmaps", "-o", "."],
        &dir.path,
    );
    assert!(output.status.success(), "process failed: {output:?}");

    let dxf = fs::read_to_string(dir.path.join("AB - 1.dxf")).expect("read dxf output");
    assert_eq!(count(&dxf, "CIRCLE"), 0);
    assert!(count(&dxf, "LWPOLYLINE") >= 4);
}

#[test]
fn config_file_selects_solid_modules_and_classic_polylines() {
    let dir = TestDir::new("config");
    fs::write(
        dir.path.join("cfg.json"),
        r#"{ "barcode_style": { "style": "solid" }, "polyline_style": "classic" }"#,
    )
    .expect("write config");
    fs::create_dir_all(dir.path.join("bmp")).expect("create bitmap dir");
    fs::write(dir.path.join("bmp/P - 5.txt"), "1\n").expect("write bitmap");

    let output = run_platedxf(
        &[
            "--prefix",
            "P",
            "--start",
            "5",
            "--config",
            "cfg.json",
            "--bitmap-dir",
            "bmp",
        ],
        &dir.path,
    );
    assert!(output.status.success(), "process failed: {output:?}");

    let dxf = fs::read_to_string(dir.path.join("P - 5.dxf")).expect("read dxf output");
    assert_eq!(count(&dxf, "SOLID"), 1);
    assert_eq!(count(&dxf, "LWPOLYLINE"), 0);
    assert!(count(&dxf, "POLYLINE") >= 3);
    assert_eq!(count(&dxf, "POLYLINE"), count(&dxf, "SEQEND"));
}

#[test]
fn unknown_font_fails_with_nonzero_exit() {
    let dir = TestDir::new("bad_font");
    let output = run_platedxf(
        &["--prefix", "A", "--prefix-font", "no-such-font", "-o", "out"],
        &dir.path,
    );
    assert!(!output.status.success(), "expected failure: {output:?}");
    assert!(!dir.path.join("out/A - 1.dxf").exists());
}

#[test]
fn invalid_config_is_reported() {
    let dir = TestDir::new("bad_config");
    fs::write(dir.path.join("cfg.json"), "{ not json").expect("write config");
    let output = run_platedxf(&["--prefix", "A", "--config", "cfg.json"], &dir.path);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid config"), "stderr: {stderr}");
}

#[test]
fn inverted_range_is_rejected() {
    let dir = TestDir::new("range");
    let output = run_platedxf(
        &["--prefix", "A", "--start", "5", "--end", "2"],
        &dir.path,
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("empty range"), "stderr: {stderr}");
}

#[test]
fn unknown_text_mode_is_a_usage_error() {
    let dir = TestDir::new("text_mode");
    let output = run_platedxf(&["--prefix", "A", "--text-mode", "bitmap"], &dir.path);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown text mode"), "stderr: {stderr}");
}
