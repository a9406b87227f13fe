use std::cell::Cell;

use anyhow;
use approx;
use ndarray::Array2;

use crate::basis::gaussian::BasisSetError;
use crate::basis::BasisKind;
use crate::drivers::overlap_check::{
    OverlapCheckDriver, OverlapCheckError, OverlapCheckParams, OverlapCheckResult,
};
use crate::drivers::AoCheckDriver;
use crate::evaluator::AoEvaluatorKind;
use crate::interfaces::trexio::{
    InMemoryTrexio, TrexioAo, TrexioBasis, TrexioNucleus, TrexioSource,
};
use crate::io::{read_aocheck_binary, AoCheckFileType};

fn fixture(name: &str) -> InMemoryTrexio {
    InMemoryTrexio::from_yaml(format!(
        "{}/tests/trexio/{name}",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

/// A data source recording how often each group is read.
struct CountingSource {
    inner: InMemoryTrexio,
    nucleus_reads: Cell<usize>,
    basis_reads: Cell<usize>,
    ao_reads: Cell<usize>,
    overlap_reads: Cell<usize>,
}

impl CountingSource {
    fn new(inner: InMemoryTrexio) -> Self {
        Self {
            inner,
            nucleus_reads: Cell::new(0),
            basis_reads: Cell::new(0),
            ao_reads: Cell::new(0),
            overlap_reads: Cell::new(0),
        }
    }
}

impl TrexioSource for CountingSource {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn has_ao_1e_int_overlap(&self) -> Result<bool, anyhow::Error> {
        self.inner.has_ao_1e_int_overlap()
    }

    fn read_nucleus(&self) -> Result<TrexioNucleus, anyhow::Error> {
        self.nucleus_reads.set(self.nucleus_reads.get() + 1);
        self.inner.read_nucleus()
    }

    fn read_basis(&self) -> Result<TrexioBasis, anyhow::Error> {
        self.basis_reads.set(self.basis_reads.get() + 1);
        self.inner.read_basis()
    }

    fn read_ao(&self) -> Result<TrexioAo, anyhow::Error> {
        self.ao_reads.set(self.ao_reads.get() + 1);
        self.inner.read_ao()
    }

    fn read_ao_1e_int_overlap(&self) -> Result<Array2<f64>, anyhow::Error> {
        self.overlap_reads.set(self.overlap_reads.get() + 1);
        self.inner.read_ao_1e_int_overlap()
    }
}

fn run_check(
    source: &dyn TrexioSource,
    params: &OverlapCheckParams,
) -> Result<OverlapCheckResult, anyhow::Error> {
    let mut driver = OverlapCheckDriver::builder()
        .parameters(params)
        .source(source)
        .build()
        .unwrap();
    driver.run()?;
    driver.result().cloned()
}

#[test]
fn test_overlap_check_params() {
    let params = OverlapCheckParams::builder().build().unwrap();
    assert_eq!(params.grid_resolution, 50);
    assert_eq!(params.evaluator, AoEvaluatorKind::Batch);
    assert!(params.write_pairs);
    assert!(params.result_save_name.is_none());

    assert!(OverlapCheckParams::builder()
        .grid_resolution(1)
        .build()
        .is_err());

    let params: OverlapCheckParams =
        serde_yaml::from_str("grid_resolution: 30\nevaluator: Pointwise\n").unwrap();
    assert_eq!(params.grid_resolution, 30);
    assert_eq!(params.evaluator, AoEvaluatorKind::Pointwise);
    assert!(params.write_pairs);
}

#[test]
fn test_overlap_check_missing_reference() {
    let _ = env_logger::builder().is_test(true).try_init();
    let source = CountingSource::new(fixture("h_s_no_overlap.yml"));
    let params = OverlapCheckParams::builder()
        .grid_resolution(10)
        .build()
        .unwrap();
    let mut driver = OverlapCheckDriver::builder()
        .parameters(&params)
        .source(&source)
        .build()
        .unwrap();
    let err = driver.run().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<OverlapCheckError>(),
        Some(OverlapCheckError::MissingReference(_))
    ));
    assert!(driver.result().is_err());
    assert_eq!(source.nucleus_reads.get(), 0);
    assert_eq!(source.basis_reads.get(), 0);
    assert_eq!(source.ao_reads.get(), 0);
    assert_eq!(source.overlap_reads.get(), 0);
}

#[test]
fn test_overlap_check_non_gaussian() {
    for evaluator in [AoEvaluatorKind::Batch, AoEvaluatorKind::Pointwise] {
        let source = CountingSource::new(fixture("h_slater.yml"));
        let params = OverlapCheckParams::builder()
            .grid_resolution(10)
            .evaluator(evaluator)
            .build()
            .unwrap();
        let err = run_check(&source, &params).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BasisSetError>(),
            Some(&BasisSetError::NonGaussianBasis(BasisKind::Slater))
        );
        // Nothing is compared against the reference.
        assert_eq!(source.overlap_reads.get(), 0);
    }
}

#[test]
fn test_overlap_check_convergence() {
    let source = fixture("h_s.yml");
    let norms = [10, 20, 40]
        .into_iter()
        .map(|n| {
            let params = OverlapCheckParams::builder()
                .grid_resolution(n)
                .write_pairs(false)
                .build()
                .unwrap();
            run_check(&source, &params).unwrap().error_norm
        })
        .collect::<Vec<_>>();
    assert!(norms[0] > norms[1]);
    assert!(norms[1] >= norms[2] || norms[1] < 1e-12);
    assert!(norms[2] < 1e-6);
}

#[test]
fn test_overlap_check_batch_pointwise_agreement() {
    let source = fixture("oh_spd_pure.yml");
    let results = [AoEvaluatorKind::Batch, AoEvaluatorKind::Pointwise]
        .into_iter()
        .map(|evaluator| {
            let params = OverlapCheckParams::builder()
                .grid_resolution(14)
                .evaluator(evaluator)
                .build()
                .unwrap();
            run_check(&source, &params).unwrap()
        })
        .collect::<Vec<_>>();
    assert_eq!(results[0].steps, results[1].steps);
    for (a, b) in results[0]
        .computed_overlap
        .iter()
        .zip(results[1].computed_overlap.iter())
    {
        approx::assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
    }
    approx::assert_abs_diff_eq!(results[0].error_norm, results[1].error_norm, epsilon = 1e-6);
}

#[test]
fn test_overlap_check_single_s_end_to_end() {
    let source = fixture("h_s.yml");
    let params = OverlapCheckParams::builder()
        .grid_resolution(20)
        .build()
        .unwrap();
    let result = run_check(&source, &params).unwrap();
    assert_eq!(result.ao_num(), 1);
    approx::assert_abs_diff_eq!(result.computed_overlap[(0, 0)], 1.0, epsilon = 1e-2);
    assert!(result.error_norm > 0.0);
    assert!(result.error_norm < 1e-2);
    approx::assert_relative_eq!(result.steps[0], 16.0 / 19.0, epsilon = 1e-12);
    approx::assert_relative_eq!(result.voxel_volume, (16.0_f64 / 19.0).powi(3), epsilon = 1e-12);

    let report = result.to_string();
    let lines = report.lines().collect::<Vec<_>>();
    assert!(lines[0].starts_with("Integration steps: ["));
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], format!("  0   0 {:>15.6} {:>15.6}", result.computed_overlap[(0, 0)], 1.0));
    assert!(lines[3].starts_with("Norm of the error: "));
}

#[test]
fn test_overlap_check_pairs_and_summary_only() {
    let source = fixture("oh_spd_cart.yml");
    let params = OverlapCheckParams::builder()
        .grid_resolution(8)
        .write_pairs(false)
        .build()
        .unwrap();
    let result = run_check(&source, &params).unwrap();
    let nao = result.ao_num();
    assert_eq!(nao, 11);
    assert_eq!(result.pairs().count(), nao * (nao + 1) / 2);
    assert!(result.pairs().all(|(i, j, _, _)| i <= j));
    assert!(!result.to_string().lines().any(|line| line.starts_with("  0   0")));
}

#[test]
fn test_overlap_check_reference_shape() {
    let mut inner = fixture("h_s.yml");
    inner.ao_1e_int.overlap = Some(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    let params = OverlapCheckParams::builder()
        .grid_resolution(6)
        .build()
        .unwrap();
    let err = run_check(&inner, &params).unwrap_err();
    assert_eq!(
        err.downcast_ref::<OverlapCheckError>(),
        Some(&OverlapCheckError::ReferenceShape {
            expected: (1, 1),
            found: (2, 2)
        })
    );
}

#[test]
fn test_overlap_check_save_result() {
    let name = std::env::temp_dir().join(format!("aocheck_save_test_{}", std::process::id()));
    let name = name.to_string_lossy().to_string();
    let source = fixture("h_s.yml");
    let params = OverlapCheckParams::builder()
        .grid_resolution(12)
        .result_save_name(Some(name.clone()))
        .build()
        .unwrap();
    let result = run_check(&source, &params).unwrap();
    let read: OverlapCheckResult = read_aocheck_binary(&name, AoCheckFileType::Ovl).unwrap();
    assert_eq!(read.computed_overlap, result.computed_overlap);
    assert_eq!(read.error_norm, result.error_norm);
    let _ = std::fs::remove_file(format!("{name}.{}", AoCheckFileType::Ovl.ext()));
}
