//! Integration tests for logitopt-optim
//!
//! These tests fit logistic regression models on synthetic data and check
//! the solver against properties of the regularised maximum-likelihood
//! solution.

use approx::assert_relative_eq;
use logitopt_core::{
    compute::{one_hot::assemble_sparse_matrix, sparse::CsrMatrix},
    core::{
        cost_function::CostFunction,
        error::{ModelError, OptimizerError},
        types::{DMatrix, DVector},
    },
};
use logitopt_optim::{
    LinearClassifier, LogisticObjective, LogisticRegression, LogisticRegressionConfig,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Samples drawn from a known logistic model `P(y = 1 | x) = σ(x·w + b)`.
fn synthetic(n: usize, w: &[f64], b: f64, seed: u64) -> (DMatrix<f64>, DVector<f64>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let p = w.len();
    let x = DMatrix::from_fn(n, p, |_, _| rng.gen_range(-2.0..2.0));
    let y = DVector::from_fn(n, |i, _| {
        let o: f64 = (0..p).map(|j| x[(i, j)] * w[j]).sum::<f64>() + b;
        let prob = 1.0 / (1.0 + (-o).exp());
        if rng.gen::<f64>() < prob {
            1.0
        } else {
            0.0
        }
    });
    (x, y)
}

#[test]
fn test_recovers_signs_of_generating_model() {
    let (x, y) = synthetic(400, &[2.0, -1.5, 0.0], 0.5, 7);
    let model = LogisticRegression::new(LogisticRegressionConfig::new().with_c(100.0))
        .fit(&x, &y, true)
        .unwrap();

    assert!(model.converged);
    assert!(model.coefficients[0] > 1.0);
    assert!(model.coefficients[1] < -0.75);
    assert!(model.coefficients[2].abs() < 0.5);
}

#[test]
fn test_stronger_regularisation_shrinks_weights() {
    let (x, y) = synthetic(200, &[1.0, 1.0], 0.0, 11);
    let weak = LogisticRegression::new(LogisticRegressionConfig::new().with_c(10.0))
        .fit(&x, &y, true)
        .unwrap();
    let strong = LogisticRegression::new(LogisticRegressionConfig::new().with_c(0.01))
        .fit(&x, &y, true)
        .unwrap();

    assert!(strong.coefficients.norm() < weak.coefficients.norm());
}

#[test]
fn test_fitted_model_is_stationary() {
    let (x, y) = synthetic(150, &[0.7, -0.2, 1.1], -0.3, 3);
    let config = LogisticRegressionConfig::new().with_c(0.5).with_tolerance(1e-9);
    let model = LogisticRegression::new(config).fit(&x, &y, true).unwrap();

    let signs = y.map(|v| if v > 0.5 { 1.0 } else { -1.0 });
    let objective = LogisticObjective::new(&x, &signs, 0.5, true).unwrap();
    let params = model.coefficients.clone().insert_row(3, model.intercept);
    let gradient = objective.gradient(&params).unwrap();
    assert!(gradient.amax() < 1e-6);
}

#[test]
fn test_dense_and_sparse_fits_agree() {
    let codes = DMatrix::from_row_slice(8, 2, &[
        0_usize, 1,
        1, 0,
        0, 0,
        1, 1,
        0, 1,
        1, 0,
        1, 1,
        0, 0,
    ]);
    let y = DVector::from_vec(vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0]);
    let sparse: CsrMatrix<f64> = assemble_sparse_matrix(&codes, &[2, 2]).unwrap();
    let dense = sparse.to_dense();

    let classifier = LogisticRegression::new(LogisticRegressionConfig::new().with_tolerance(1e-10));
    let a = classifier.fit(&sparse, &y, true).unwrap();
    let b = classifier.fit(&dense, &y, true).unwrap();

    assert_relative_eq!(a.coefficients, b.coefficients, epsilon = 1e-6);
    assert_relative_eq!(a.intercept, b.intercept, epsilon = 1e-6);
}

#[test]
fn test_single_class_is_rejected() {
    let (x, _) = synthetic(10, &[1.0], 0.0, 1);
    let y = DVector::from_element(10, 0.0);
    let err = LogisticRegression::default().fit(&x, &y, true).unwrap_err();
    assert!(matches!(
        err,
        OptimizerError::Model(ModelError::InsufficientClasses { .. })
    ));
}

#[test]
fn test_f32_fit() {
    let x = DMatrix::<f32>::from_row_slice(6, 1, &[-3.0, -2.0, -1.0, 1.0, 2.0, 3.0]);
    let y = DVector::<f32>::from_vec(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
    let model = LogisticRegression::<f32>::default().fit(&x, &y, true).unwrap();
    assert!(model.coefficients[0] > 0.0);
    assert!(model.intercept.is_finite());
}
