//! Weighted residual (chi-square) objective.
//!
//! For a candidate parameter vector `p`, the objective is
//!
//! ```text
//! chi2(p) = Σ_i ((y_i - model(x_i, p)) / sigma_i)^2
//! ```
//!
//! accumulated in observation order. The objective is a pure function of `p`
//! over immutable captured data: minimizers call it many times with arbitrary
//! trial vectors, possibly from several threads at once, so there is no
//! per-call scratch state to race on.

use crate::domain::Observations;
use crate::error::CalError;
use crate::fit::driver::Objective;
use crate::fit::model::{AdaptedModel, Model};

/// Sum-of-squared-standardized-residuals objective over a fixed dataset.
pub struct Chi2Objective<M> {
    model: AdaptedModel<M>,
    data: Observations,
}

impl<M: Model> Chi2Objective<M> {
    pub fn new(model: AdaptedModel<M>, data: Observations) -> Self {
        Self { model, data }
    }

    pub fn model(&self) -> &AdaptedModel<M> {
        &self.model
    }

    pub fn n_observations(&self) -> usize {
        self.data.len()
    }

    /// Evaluate the objective for one trial parameter vector.
    ///
    /// Fails with a domain error naming the offending observation when the
    /// model produces a non-finite value; the failure is surfaced to the
    /// minimizer rather than folded into the sum as NaN.
    pub fn value(&self, params: &[f64]) -> Result<f64, CalError> {
        let n_par = self.model.parameter_count();
        if params.len() != n_par {
            return Err(CalError::config(format!(
                "objective called with {} parameters, model declares {n_par}",
                params.len()
            )));
        }

        let x = self.data.x();
        let y = self.data.y();
        let sigma = self.data.sigma();

        let mut chi2 = 0.0;
        for i in 0..self.data.len() {
            let predicted = self.model.evaluate(x[i], params);
            if !predicted.is_finite() {
                return Err(CalError::domain(format!(
                    "model evaluation is non-finite at observation {i} (x={})",
                    x[i]
                )));
            }
            let r = (y[i] - predicted) / sigma[i];
            chi2 += r * r;
        }
        Ok(chi2)
    }
}

impl<M: Model + Sync> Objective for Chi2Objective<M> {
    fn parameter_names(&self) -> &[String] {
        self.model.parameter_names()
    }

    fn value(&self, params: &[f64]) -> Result<f64, CalError> {
        Chi2Objective::value(self, params)
    }
}
