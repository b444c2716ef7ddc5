//! L2-regularised binary logistic regression objective.
//!
//! For a design matrix `X` with `n` rows, labels `y_i ∈ {-1, +1}` and
//! parameters `θ = [w; b]` (the intercept `b` only when fitted):
//!
//! ```text
//! f(θ) = (1/n) Σ_i log(1 + exp(-y_i (x_iᵀ w + b))) + ‖w‖² / (2 C n)
//! ∇_w f = Xᵀ r + w / (C n)
//! ∂_b f = Σ_i r_i
//! ```
//!
//! where `r` is the per-sample derivative returned by
//! [`binary_logistic_loss_grad`]. This is the inverse-regularisation `C`
//! objective divided by `C n`, so it has the same minimiser while staying
//! on the scale of the mean loss.

use logitopt_core::{
    compute::design::DesignMatrix,
    core::{
        cost_function::CostFunction,
        error::{ModelError, Result},
        types::{DVector, Scalar},
    },
    numerical::logistic::{binary_logistic_loss, binary_logistic_loss_grad},
};
use num_traits::Float;

/// Logistic loss of a linear model over a fixed dataset.
#[derive(Debug)]
pub struct LogisticObjective<'a, T, X>
where
    T: Scalar,
    X: DesignMatrix<T>,
{
    x: &'a X,
    y: &'a DVector<T>,
    l2: T,
    fit_intercept: bool,
}

impl<'a, T, X> LogisticObjective<'a, T, X>
where
    T: Scalar,
    X: DesignMatrix<T>,
{
    /// Creates the objective for features `x`, labels `y` in `{-1, +1}` and
    /// inverse regularisation strength `c`.
    pub fn new(x: &'a X, y: &'a DVector<T>, c: T, fit_intercept: bool) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(ModelError::dimension_mismatch(
                format!("{} labels", x.nrows()),
                format!("{} labels", y.len()),
            ));
        }
        if x.nrows() == 0 {
            return Err(ModelError::invalid_parameter(
                "at least one sample is required",
            ));
        }
        if !(c > T::zero()) || !Float::is_finite(c) {
            return Err(ModelError::invalid_parameter(format!(
                "inverse regularisation strength must be positive and finite, got {c}"
            )));
        }

        let n_samples = <T as Scalar>::from_usize(x.nrows());
        Ok(Self {
            x,
            y,
            l2: T::one() / (c * n_samples),
            fit_intercept,
        })
    }

    /// Number of features.
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Whether the last parameter is an intercept.
    pub fn fit_intercept(&self) -> bool {
        self.fit_intercept
    }

    /// Splits a parameter vector into coefficients and intercept.
    pub fn split(&self, params: &DVector<T>) -> (DVector<T>, T) {
        let p = self.n_features();
        let w = params.rows(0, p).into_owned();
        let b = if self.fit_intercept {
            params[p]
        } else {
            T::zero()
        };
        (w, b)
    }

    fn linear_output(&self, params: &DVector<T>) -> Result<(DVector<T>, DVector<T>)> {
        if params.len() != self.dimension() {
            return Err(ModelError::dimension_mismatch(
                format!("{} parameters", self.dimension()),
                format!("{} parameters", params.len()),
            ));
        }
        let (w, b) = self.split(params);
        let mut o = self.x.mul_vec(&w)?;
        if self.fit_intercept {
            o.add_scalar_mut(b);
        }
        Ok((w, o))
    }

    fn penalty(&self, w: &DVector<T>) -> T {
        <T as Scalar>::from_f64(0.5) * self.l2 * w.norm_squared()
    }
}

impl<T, X> CostFunction<T> for LogisticObjective<'_, T, X>
where
    T: Scalar,
    X: DesignMatrix<T>,
{
    fn dimension(&self) -> usize {
        self.n_features() + usize::from(self.fit_intercept)
    }

    fn cost(&self, params: &DVector<T>) -> Result<T> {
        let (w, o) = self.linear_output(params)?;
        let loss = binary_logistic_loss(&o, self.y)?.sum();
        Ok(loss + self.penalty(&w))
    }

    fn cost_and_gradient(&self, params: &DVector<T>) -> Result<(T, DVector<T>)> {
        let (w, o) = self.linear_output(params)?;
        let loss = binary_logistic_loss(&o, self.y)?.sum();
        let r = binary_logistic_loss_grad(&o, self.y)?;

        let grad_w = self.x.tr_mul_vec(&r)? + &w * self.l2;
        let mut gradient = DVector::zeros(self.dimension());
        gradient.rows_mut(0, grad_w.len()).copy_from(&grad_w);
        if self.fit_intercept {
            gradient[grad_w.len()] = r.sum();
        }

        Ok((loss + self.penalty(&w), gradient))
    }
}
