//! Property-based tests for the stable logistic kernels.

use logitopt_core::numerical::logistic::{binary_logistic_loss, binary_logistic_loss_grad};
use logitopt_core::numerical::stability::{log1pexp_scalar, sigmoid_scalar};
use logitopt_core::types::DVector;
use proptest::prelude::*;

proptest! {
    #[test]
    fn log1pexp_bounds(x in -1.0e4_f64..1.0e4) {
        let v = log1pexp_scalar(x);
        prop_assert!(v.is_finite());
        prop_assert!(v >= 0.0);
        prop_assert!(v >= x);
        prop_assert!(v <= x.max(0.0) + std::f64::consts::LN_2 + 1e-12);
    }

    #[test]
    fn sigmoid_is_symmetric(x in -700.0_f64..700.0) {
        let s = sigmoid_scalar(x) + sigmoid_scalar(-x);
        prop_assert!((s - 1.0).abs() <= 1e-12);
    }

    #[test]
    fn sigmoid_is_monotone(a in -50.0_f64..50.0, b in -50.0_f64..50.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(sigmoid_scalar(lo) <= sigmoid_scalar(hi));
    }

    #[test]
    fn loss_is_non_negative_and_sums_to_mean(
        pairs in prop::collection::vec((-30.0_f64..30.0, prop::bool::ANY), 1..40)
    ) {
        let n = pairs.len();
        let o = DVector::from_iterator(n, pairs.iter().map(|(o, _)| *o));
        let y = DVector::from_iterator(n, pairs.iter().map(|(_, pos)| if *pos { 1.0 } else { -1.0 }));

        let loss = binary_logistic_loss(&o, &y).unwrap();
        prop_assert!(loss.iter().all(|v| *v >= 0.0));

        let mean = o
            .iter()
            .zip(y.iter())
            .map(|(o, y)| log1pexp_scalar(-y * o))
            .sum::<f64>()
            / n as f64;
        prop_assert!((loss.sum() - mean).abs() <= 1e-12 * (1.0 + mean));
    }

    #[test]
    fn gradient_points_against_label(o in -30.0_f64..30.0, positive in prop::bool::ANY) {
        let label = if positive { 1.0 } else { -1.0 };
        let grad = binary_logistic_loss_grad(
            &DVector::from_vec(vec![o]),
            &DVector::from_vec(vec![label]),
        )
        .unwrap();
        prop_assert!(grad[0] * label <= 0.0);
        prop_assert!(grad[0].abs() <= 1.0);
    }
}
