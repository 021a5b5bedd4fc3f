//! Fit driver: hand the objective to an external minimizer and package the
//! result.
//!
//! The search algorithm itself lives behind the [`Minimizer`] trait; this
//! module only owns the bookkeeping around it:
//!
//! - refuse to report a non-converged solution as a fit
//! - extract per-parameter standard errors (directly, or from a covariance
//!   matrix for engines that report one)
//! - compute degrees of freedom and the reduced chi-square, which is left
//!   undefined (`None`) when `dof <= 0`

use nalgebra::DMatrix;

use crate::domain::FitReport;
use crate::error::CalError;
use crate::fit::model::Model;
use crate::fit::objective::Chi2Objective;

/// The objective callable contract a minimizer consumes: a declared parameter
/// list and a pure `params -> scalar` evaluation.
pub trait Objective: Sync {
    fn parameter_names(&self) -> &[String];

    fn value(&self, params: &[f64]) -> Result<f64, CalError>;
}

/// External minimization engine.
///
/// `initial` is an optional starting vector (one entry per declared
/// parameter); when `None` the engine picks its own starting point. Engines
/// that support cancellation or bounds handle those themselves — nothing here
/// re-implements them.
pub trait Minimizer {
    fn minimize(
        &self,
        objective: &dyn Objective,
        initial: Option<&[f64]>,
    ) -> Result<MinimizerSolution, CalError>;
}

/// Raw solution reported by a minimizer.
///
/// Standard errors may come back either directly (`errors`) or as a parameter
/// covariance matrix; at least one must be present on a converged solution.
#[derive(Debug, Clone)]
pub struct MinimizerSolution {
    pub parameters: Vec<f64>,
    pub errors: Option<Vec<f64>>,
    pub covariance: Option<DMatrix<f64>>,
    /// Objective value at `parameters`.
    pub fval: f64,
    pub converged: bool,
}

/// Run the minimizer against a chi-square objective and assemble a
/// [`FitReport`].
///
/// Fails with `NotConverged` when the engine stops without satisfying its
/// criterion — the last iterate is never passed off as a fit.
pub fn fit<M: Model + Sync>(
    minimizer: &dyn Minimizer,
    objective: &Chi2Objective<M>,
    initial: Option<&[f64]>,
) -> Result<FitReport, CalError> {
    let names = objective.model().parameter_names().to_vec();
    let n_par = names.len();

    let solution = minimizer.minimize(objective, initial)?;
    if !solution.converged {
        return Err(CalError::not_converged(format!(
            "minimizer stopped before convergence (fval={})",
            solution.fval
        )));
    }
    if solution.parameters.len() != n_par {
        return Err(CalError::config(format!(
            "minimizer returned {} parameter estimates, expected {n_par}",
            solution.parameters.len()
        )));
    }

    let errors = standard_errors(&solution, n_par)?;

    let n_obs = objective.n_observations();
    let dof = n_obs as i64 - n_par as i64;
    let reduced_chi2 = if dof > 0 {
        Some(solution.fval / dof as f64)
    } else {
        None
    };

    Ok(FitReport {
        parameter_names: names,
        parameters: solution.parameters,
        errors,
        chi2: solution.fval,
        n_observations: n_obs,
        dof,
        reduced_chi2,
    })
}

/// Per-parameter standard errors from whichever representation the engine
/// provided.
fn standard_errors(solution: &MinimizerSolution, n_par: usize) -> Result<Vec<f64>, CalError> {
    if let Some(errors) = &solution.errors {
        if errors.len() != n_par {
            return Err(CalError::config(format!(
                "minimizer returned {} standard errors, expected {n_par}",
                errors.len()
            )));
        }
        return Ok(errors.clone());
    }

    let Some(cov) = &solution.covariance else {
        return Err(CalError::config(
            "minimizer reported neither standard errors nor a covariance matrix",
        ));
    };
    if cov.nrows() != n_par || cov.ncols() != n_par {
        return Err(CalError::config(format!(
            "covariance matrix is {}x{}, expected {n_par}x{n_par}",
            cov.nrows(),
            cov.ncols()
        )));
    }

    let mut out = Vec::with_capacity(n_par);
    for i in 0..n_par {
        let variance = cov[(i, i)];
        if !variance.is_finite() || variance < 0.0 {
            return Err(CalError::domain(format!(
                "covariance diagonal entry {i} is not a variance: {variance}"
            )));
        }
        out.push(variance.sqrt());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observations;
    use crate::fit::model::{FnModel, adapt};

    /// Canned engine for exercising the driver's bookkeeping.
    struct FixedSolution(MinimizerSolution);

    impl Minimizer for FixedSolution {
        fn minimize(
            &self,
            _objective: &dyn Objective,
            _initial: Option<&[f64]>,
        ) -> Result<MinimizerSolution, CalError> {
            Ok(self.0.clone())
        }
    }

    fn linear_objective(n_points: usize) -> Chi2Objective<FnModel<impl Fn(f64, &[f64]) -> f64>> {
        let model = adapt(FnModel::new(&["a", "b"], |x, p: &[f64]| p[0] + p[1] * x)).unwrap();
        let x: Vec<f64> = (0..n_points).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 1.0 + 2.0 * v).collect();
        let sigma = vec![0.1; n_points];
        Chi2Objective::new(model, Observations::new(x, y, sigma).unwrap())
    }

    fn converged(parameters: Vec<f64>, errors: Option<Vec<f64>>) -> MinimizerSolution {
        MinimizerSolution {
            parameters,
            errors,
            covariance: None,
            fval: 0.5,
            converged: true,
        }
    }

    #[test]
    fn dof_is_observations_minus_parameters() {
        let objective = linear_objective(5);
        let engine = FixedSolution(converged(vec![1.0, 2.0], Some(vec![0.1, 0.1])));
        let report = fit(&engine, &objective, None).unwrap();
        assert_eq!(report.dof, 3);
        assert_eq!(report.n_observations, 5);
        let reduced = report.reduced_chi2.unwrap();
        assert!((reduced - 0.5 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn reduced_chi2_is_undefined_when_underdetermined() {
        // Two points, two parameters: dof = 0.
        let objective = linear_objective(2);
        let engine = FixedSolution(converged(vec![1.0, 2.0], Some(vec![0.1, 0.1])));
        let report = fit(&engine, &objective, None).unwrap();
        assert_eq!(report.dof, 0);
        assert_eq!(report.reduced_chi2, None);
    }

    #[test]
    fn non_convergence_is_surfaced() {
        let objective = linear_objective(5);
        let mut solution = converged(vec![1.0, 2.0], Some(vec![0.1, 0.1]));
        solution.converged = false;
        let engine = FixedSolution(solution);
        let err = fit(&engine, &objective, None).unwrap_err();
        assert!(matches!(err, CalError::NotConverged(_)));
    }

    #[test]
    fn errors_derived_from_covariance_diagonal() {
        let objective = linear_objective(5);
        let mut solution = converged(vec![1.0, 2.0], None);
        solution.covariance = Some(DMatrix::from_row_slice(2, 2, &[0.04, 0.01, 0.01, 0.09]));
        let engine = FixedSolution(solution);
        let report = fit(&engine, &objective, None).unwrap();
        assert!((report.errors[0] - 0.2).abs() < 1e-12);
        assert!((report.errors[1] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn missing_errors_and_covariance_is_a_configuration_error() {
        let objective = linear_objective(5);
        let engine = FixedSolution(converged(vec![1.0, 2.0], None));
        let err = fit(&engine, &objective, None).unwrap_err();
        assert!(matches!(err, CalError::Configuration(_)));
    }

    #[test]
    fn negative_variance_is_a_domain_error() {
        let objective = linear_objective(5);
        let mut solution = converged(vec![1.0, 2.0], None);
        solution.covariance = Some(DMatrix::from_row_slice(2, 2, &[-0.04, 0.0, 0.0, 0.09]));
        let engine = FixedSolution(solution);
        let err = fit(&engine, &objective, None).unwrap_err();
        assert!(matches!(err, CalError::Domain(_)));
    }
}
