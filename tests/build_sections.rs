use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

const POLAR_CSV: &str = concat!(
    "alpha,cl,cd\n",
    "-2.0,-0.1,0.010\n",
    "0.0,0.1,0.009\n",
    "2.0,0.3,0.010\n",
    "4.0,0.5,0.015\n",
    "6.0,0.7,0.025\n",
    "8.0,0.6,0.050\n",
    "10.0,0.4,0.090\n",
);

fn write_polar(dir: &Path) -> PathBuf {
    // Filename carries the Reynolds tag the importer falls back to.
    let polar = dir.join("T1_Re0.110_M0.00.csv");
    fs::write(&polar, POLAR_CSV).expect("polar write");
    polar
}

fn write_manifest(dir: &Path, body: &str) -> PathBuf {
    let manifest = dir.join("sections.yaml");
    fs::write(&manifest, body).expect("manifest write");
    manifest
}

#[test]
fn end_to_end_block_is_byte_exact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let polar = write_polar(dir.path());
    let manifest = write_manifest(
        dir.path(),
        &format!("- polar: \"{}\"\n  r_over_r: 0.75\n", polar.display()),
    );
    let output = dir.path().join("aero.txt");

    Command::cargo_bin("build_sections")
        .expect("build_sections bin")
        .args([
            "--sections",
            manifest.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let expected = concat!(
        "\n",
        " Section 1   r/R = 0.75\n",
        " ====================================================================\n",
        " Zero-lift alpha (deg):  -1.00        Minimum Cd           : 0.0090\n",
        " d(Cl)/d(alpha)       :  5.730        Cl at minimum Cd     : 0.100\n",
        " d(Cl)/d(alpha)@stall :  5.730        d(Cd)/d(Cl**2)       : 0.0250\n",
        " Maximum Cl           :  0.30         Reference Re number  :  110000.0\n",
        " Minimum Cl           : -0.10         Re scaling exponent  : -0.4000\n",
        " Cl increment to stall: 0.200         Cm                   : -0.100\n",
        "                                      Mcrit                :  0.800\n",
        " ====================================================================\n",
    );
    assert_eq!(fs::read_to_string(&output).expect("report"), expected);
}

#[test]
fn json_sidecar_mirrors_the_fitted_scalars() {
    let dir = tempfile::tempdir().expect("tempdir");
    let polar = write_polar(dir.path());
    let manifest = write_manifest(
        dir.path(),
        &format!("- polar: \"{}\"\n  r_over_r: 0.75\n", polar.display()),
    );
    let output = dir.path().join("aero.txt");
    let sidecar = dir.path().join("aero.json");

    Command::cargo_bin("build_sections")
        .expect("build_sections bin")
        .args([
            "--sections",
            manifest.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--json",
            sidecar.to_str().unwrap(),
        ])
        .assert()
        .success();

    let summaries: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&sidecar).expect("sidecar")).expect("json");
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary["section"], 1);
    assert_eq!(summary["r_over_r"].as_f64(), Some(0.75));
    assert_eq!(summary["reynolds"].as_f64(), Some(110_000.0));
    assert_eq!(summary["max_cl"].as_f64(), Some(0.3));
    let zero_lift = summary["zero_lift_alpha"].as_f64().expect("zero_lift_alpha");
    assert!((zero_lift - (-1.0)).abs() < 1e-9);
}

#[test]
fn overrides_replace_fitted_scalars_in_the_block() {
    let dir = tempfile::tempdir().expect("tempdir");
    let polar = write_polar(dir.path());
    let manifest = write_manifest(
        dir.path(),
        &format!(
            concat!(
                "- polar: \"{path}\"\n",
                "  r_over_r: 0.75\n",
                "  overrides:\n",
                "    max_cl: 1.1\n",
                "    reynolds: 250000\n",
            ),
            path = polar.display()
        ),
    );

    let assert = Command::cargo_bin("build_sections")
        .expect("build_sections bin")
        .args(["--sections", manifest.to_str().unwrap()])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    assert!(stdout.contains(" Maximum Cl           :  1.10 "));
    assert!(stdout.contains(" Reference Re number  :  250000.0"));
    // Untouched scalars keep their fitted values.
    assert!(stdout.contains(" Minimum Cl           : -0.10 "));
}

#[test]
fn missing_manifest_fails_with_context() {
    let dir = tempfile::tempdir().expect("tempdir");
    Command::cargo_bin("build_sections")
        .expect("build_sections bin")
        .args(["--sections", dir.path().join("absent.yaml").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicates::str::contains("loading section manifest"));
}

#[test]
fn broken_polar_names_the_file_in_the_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let polar = dir.path().join("empty.csv");
    fs::write(&polar, "no numbers at all\n").expect("polar write");
    let manifest = write_manifest(
        dir.path(),
        &format!("- polar: \"{}\"\n  r_over_r: 0.5\n", polar.display()),
    );

    Command::cargo_bin("build_sections")
        .expect("build_sections bin")
        .args(["--sections", manifest.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicates::str::contains("reading polar"));
}
