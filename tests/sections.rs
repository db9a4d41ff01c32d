use rotor_section_builder::config::{ConfigError, load_sections};
use std::fs;
use std::path::Path;

#[test]
fn yaml_manifest_keeps_order_and_overrides() {
    let dir = tempfile::tempdir().expect("tempdir");
    let manifest = dir.path().join("sections.yaml");
    fs::write(
        &manifest,
        concat!(
            "- polar: \"data/naca2412.txt\"\n",
            "  r_over_r: 0.3\n",
            "- polar: \"data/T1_Re0.110_M0.00.csv\"\n",
            "  r_over_r: 0.75\n",
            "  overrides:\n",
            "    max_cl: 1.1\n",
            "    reynolds: 250000\n",
        ),
    )
    .expect("manifest write");

    let sections = load_sections(&manifest).expect("yaml manifest");
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].polar, Path::new("data/naca2412.txt"));
    assert_eq!(sections[0].r_over_r, 0.3);
    assert!(sections[0].overrides.is_none());

    let overrides = sections[1].overrides.as_ref().expect("overrides");
    assert_eq!(overrides.max_cl, Some(1.1));
    assert_eq!(overrides.reynolds, Some(250_000.0));
    assert_eq!(overrides.zero_lift_alpha, None);
}

#[test]
fn toml_manifest_uses_section_tables() {
    let dir = tempfile::tempdir().expect("tempdir");
    let manifest = dir.path().join("sections.toml");
    fs::write(
        &manifest,
        concat!(
            "[[section]]\n",
            "polar = \"a.txt\"\n",
            "r_over_r = 0.25\n",
            "\n",
            "[[section]]\n",
            "polar = \"b.txt\"\n",
        ),
    )
    .expect("manifest write");

    let sections = load_sections(&manifest).expect("toml manifest");
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].r_over_r, 0.25);
    // r/R defaults to the root station when omitted.
    assert_eq!(sections[1].r_over_r, 0.0);
}

#[test]
fn malformed_manifest_is_a_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let manifest = dir.path().join("sections.yaml");
    fs::write(&manifest, "- polar: \"a.txt\"\n  r_over_r: not-a-number\n").expect("manifest write");

    let err = load_sections(&manifest).expect_err("must fail");
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn missing_manifest_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_sections(dir.path().join("absent.yaml")).expect_err("must fail");
    assert!(matches!(err, ConfigError::Io(_)));
}
