use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::evaluator::AoEvaluatorKind;
use crate::interfaces::cli::Cli;

const ROOT: &str = env!("CARGO_MANIFEST_DIR");

#[test]
fn test_cli_defaults() {
    let cli = Cli::try_parse_from(["aocheck", "h2.yml"]).unwrap();
    assert_eq!(cli.diagnostic_level(), LevelFilter::Warn);
    let input = cli.input().unwrap();
    assert_eq!(input.trexio_file, Some(PathBuf::from("h2.yml")));
    assert_eq!(input.overlap_check.grid_resolution, 50);
    assert_eq!(input.overlap_check.evaluator, AoEvaluatorKind::Batch);
    assert!(input.overlap_check.write_pairs);
}

#[test]
fn test_cli_overrides() {
    let cli = Cli::try_parse_from([
        "aocheck",
        "h2.yml",
        "-n",
        "30",
        "-e",
        "pointwise",
        "--summary-only",
        "--save",
        "h2_check",
        "-vv",
    ])
    .unwrap();
    assert_eq!(cli.diagnostic_level(), LevelFilter::Debug);
    let params = cli.input().unwrap().overlap_check;
    assert_eq!(params.grid_resolution, 30);
    assert_eq!(params.evaluator, AoEvaluatorKind::Pointwise);
    assert!(!params.write_pairs);
    assert_eq!(params.result_save_name, Some("h2_check".to_string()));
}

#[test]
fn test_cli_config_file() {
    let config = format!("{ROOT}/tests/input/test_input_overlap_check.yml");
    let cli = Cli::try_parse_from(["aocheck", "-c", config.as_str()]).unwrap();
    let input = cli.input().unwrap();
    assert_eq!(
        input.trexio_file,
        Some(PathBuf::from("tests/trexio/oh_spd_pure.yml"))
    );
    assert_eq!(input.overlap_check.grid_resolution, 24);
    assert_eq!(input.overlap_check.evaluator, AoEvaluatorKind::Pointwise);

    let cli =
        Cli::try_parse_from(["aocheck", "other.yml", "-c", config.as_str(), "-e", "batch"])
            .unwrap();
    let input = cli.input().unwrap();
    assert_eq!(input.trexio_file, Some(PathBuf::from("other.yml")));
    assert_eq!(input.overlap_check.grid_resolution, 24);
    assert_eq!(input.overlap_check.evaluator, AoEvaluatorKind::Batch);
}

#[test]
fn test_cli_invalid() {
    assert!(Cli::try_parse_from(["aocheck"]).unwrap().input().is_err());
    assert!(Cli::try_parse_from(["aocheck", "h2.yml", "-n", "1"])
        .unwrap()
        .input()
        .is_err());
    assert!(Cli::try_parse_from(["aocheck", "h2.yml", "-e", "qmckl"]).is_err());
    assert!(Cli::try_parse_from(["aocheck", "-c", "missing.yml"])
        .unwrap()
        .input()
        .is_err());
}
