use std::path::PathBuf;

use crate::evaluator::AoEvaluatorKind;
use crate::interfaces::input::Input;
use crate::interfaces::InputHandle;
use crate::io::read_aocheck_yaml;

const ROOT: &str = env!("CARGO_MANIFEST_DIR");

#[test]
fn test_interfaces_input_overlap_check_parameters() {
    let name = format!("{ROOT}/tests/input/test_input_overlap_check.yml");
    let inp = read_aocheck_yaml::<Input, _>(&name).unwrap();
    assert_eq!(
        inp.trexio_file,
        Some(PathBuf::from("tests/trexio/oh_spd_pure.yml"))
    );
    let params = &inp.overlap_check;
    assert_eq!(params.grid_resolution, 24);
    assert_eq!(params.evaluator, AoEvaluatorKind::Pointwise);
    assert!(!params.write_pairs);
    assert!(params.result_save_name.is_none());
}

#[test]
fn test_interfaces_input_defaults() {
    let inp: Input = serde_yaml::from_str("overlap_check:\n  grid_resolution: 12\n").unwrap();
    assert!(inp.trexio_file.is_none());
    assert_eq!(inp.overlap_check.grid_resolution, 12);
    assert_eq!(inp.overlap_check.evaluator, AoEvaluatorKind::Batch);
    assert!(inp.overlap_check.write_pairs);

    let inp: Input = serde_yaml::from_str("{}").unwrap();
    assert_eq!(inp.overlap_check.grid_resolution, 50);
}

#[test]
fn test_interfaces_input_handle() {
    let mut inp = Input::default();
    assert!(inp.handle().is_err());

    inp.trexio_file = Some(PathBuf::from(format!("{ROOT}/tests/trexio/h_s.yml")));
    inp.overlap_check.grid_resolution = 10;
    inp.handle().unwrap();

    inp.trexio_file = Some(PathBuf::from(format!(
        "{ROOT}/tests/trexio/h_s_no_overlap.yml"
    )));
    assert!(inp.handle().is_err());
}
