use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ringmark_gen() -> Command {
    let mut cmd = Command::cargo_bin("ringmark-gen").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn plan_json(args: &[&str]) -> serde_json::Value {
    let output = ringmark_gen().arg("plan").args(args).output().unwrap();
    assert!(output.status.success(), "plan failed: {:?}", output);
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn list_shows_every_width() {
    ringmark_gen()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("standard"))
        .stdout(predicate::str::contains("generated"))
        .stdout(predicate::str::contains("4114"));
}

#[test]
fn codes_for_four_bits() {
    ringmark_gen()
        .args(["codes", "--bits", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 bits, 4 codes (generated)"))
        .stdout(predicate::str::contains("0001"))
        .stdout(predicate::str::contains("0111"))
        .stdout(predicate::str::contains("1111").not());
}

#[test]
fn codes_rejects_bad_width() {
    ringmark_gen()
        .args(["codes", "--bits", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bits must be between 4 and 16"));
}

#[test]
fn default_plan_uses_label_sheet() {
    let plan = plan_json(&[]);
    assert_eq!(plan["layout"], "AVERY 6450");
    assert_eq!(plan["plan"]["capacity"], 63);
    let pages = plan["plan"]["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0]["placements"].as_array().unwrap().len(), 12);
    assert!(pages[0]["calibration"].is_null());
    assert_eq!(pages[0]["placements"][0]["number"], 1);
}

#[test]
fn grid_plan_has_calibration_on_each_page() {
    let plan = plan_json(&["--sheet", "letter", "--bits", "11", "--markers", "150"]);
    let pages = plan["plan"]["pages"].as_array().unwrap();
    assert!(pages.len() >= 2);
    for page in pages {
        assert!(page["calibration"].is_object());
    }
}

#[test]
fn small_padding_warns_but_succeeds() {
    ringmark_gen()
        .args(["plan", "--sheet", "letter", "--padding", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning: Marker padding"));
}

#[test]
fn capacity_overflow_fails() {
    ringmark_gen()
        .args(["plan", "--bits", "4", "--markers", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds the 4 rotation-invariant codes"));
}

#[test]
fn flags_override_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("target.toml");
    std::fs::write(&path, "bits = 12\nmarkers = 3\nsheet = \"a4\"\n").unwrap();

    let plan = plan_json(&["--config", path.to_str().unwrap(), "--markers", "4"]);
    assert_eq!(plan["config"]["bits"], 12);
    assert_eq!(plan["config"]["markers"], 4);
    assert_eq!(plan["config"]["sheet"], "a4");
}

#[test]
fn unknown_config_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("target.toml");
    std::fs::write(&path, "colour = \"red\"\n").unwrap();

    ringmark_gen()
        .args(["plan", "--config", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parsing"));
}

#[test]
fn generate_label_sheet_and_svgs() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("sheet.pdf");
    let out = dir.path().join("targets");

    ringmark_gen()
        .args(["generate", "--markers", "3", "--output-pdf"])
        .arg(&pdf)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated AVERY 6450 PDF:"))
        .stdout(predicate::str::contains("Generated 3 individual SVG files in:"));

    let bytes = std::fs::read(&pdf).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    for n in 1..=3 {
        let svg = std::fs::read_to_string(out.join(format!("target_{n}.svg"))).unwrap();
        assert!(svg.contains("<circle"));
    }
}

#[test]
fn generate_grid_pdf_with_custom_start() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("grid.pdf");
    let out = dir.path().join("svgs");

    ringmark_gen()
        .args(["generate", "--sheet", "a4", "--markers", "2", "--start", "40"])
        .arg("--output-pdf")
        .arg(&pdf)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated combined PDF:"));

    assert!(out.join("target_40.svg").exists());
    assert!(out.join("target_41.svg").exists());
    assert!(!out.join("target_1.svg").exists());
}

#[test]
fn generate_png_markers_only() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("unused.pdf");
    let out = dir.path().join("pngs");

    ringmark_gen()
        .args(["generate", "--markers", "2", "--marker-format", "png", "--skip-pdf"])
        .arg("--output-pdf")
        .arg(&pdf)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 2 individual PNG files in:"))
        .stdout(predicate::str::contains("PDF").not());

    assert!(!pdf.exists());
    let bytes = std::fs::read(out.join("target_1.png")).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn generate_fails_without_writing_on_capacity_error() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("never.pdf");

    ringmark_gen()
        .args(["generate", "--bits", "4", "--markers", "10"])
        .arg("--output-pdf")
        .arg(&pdf)
        .arg("--output-dir")
        .arg(dir.path().join("never"))
        .assert()
        .failure();

    assert!(!pdf.exists());
    assert!(!dir.path().join("never").exists());
}

#[test]
fn verify_passes() {
    ringmark_gen()
        .arg("verify")
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS:  8 bits, 30 codes (standard)"))
        .stdout(predicate::str::contains("FAIL").not());
}

#[test]
fn huge_custom_page_fails_cleanly() {
    ringmark_gen()
        .args(["plan", "--sheet", "custom", "--page-width", "1e12", "--page-height", "1e12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("more slots than can be counted"));
}

#[test]
fn zero_dpi_is_rejected() {
    let dir = TempDir::new().unwrap();
    ringmark_gen()
        .args(["generate", "--marker-format", "png", "--skip-pdf", "--dpi", "0"])
        .arg("--output-dir")
        .arg(dir.path().join("pngs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--dpi"));
    assert!(!dir.path().join("pngs").exists());
}

#[test]
fn narrow_margin_warns_about_calibration() {
    ringmark_gen()
        .args(["plan", "--sheet", "a4", "--margin", "5", "--padding", "20"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning: Calibration dot radius"));
}
