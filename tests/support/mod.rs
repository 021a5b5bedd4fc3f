//! Test support: a self-contained stand-in for the external minimizer
//! collaborator.
//!
//! Nelder-Mead downhill simplex over the objective, plus a central-difference
//! Hessian at the minimum to report a MINUIT-style covariance matrix
//! (`cov = 2 * H^-1` for a chi-square surface). Good enough to exercise the
//! fit driver end to end; not a production engine.

use std::cmp::Ordering;

use nalgebra::DMatrix;
use sigcal::error::CalError;
use sigcal::fit::{Minimizer, MinimizerSolution, Objective};

pub struct SimplexMinimizer {
    pub max_iters: usize,
    /// Relative spread of simplex function values at which we stop.
    pub f_tolerance: f64,
    /// Initial simplex edge length along each axis.
    pub initial_step: f64,
}

impl Default for SimplexMinimizer {
    fn default() -> Self {
        Self {
            max_iters: 5000,
            f_tolerance: 1e-12,
            initial_step: 0.5,
        }
    }
}

impl SimplexMinimizer {
    /// Failed or non-finite evaluations are treated as infinitely bad, which
    /// steers the simplex away without aborting the search.
    fn eval(objective: &dyn Objective, params: &[f64]) -> f64 {
        match objective.value(params) {
            Ok(v) if v.is_finite() => v,
            _ => f64::INFINITY,
        }
    }
}

fn sort_simplex(simplex: &mut [(Vec<f64>, f64)]) {
    simplex.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
}

impl Minimizer for SimplexMinimizer {
    fn minimize(
        &self,
        objective: &dyn Objective,
        initial: Option<&[f64]>,
    ) -> Result<MinimizerSolution, CalError> {
        let n = objective.parameter_names().len();
        let start: Vec<f64> = match initial {
            Some(v) => v.to_vec(),
            None => vec![0.0; n],
        };
        if start.len() != n {
            return Err(CalError::config(format!(
                "initial guess has {} entries, objective declares {n} parameters",
                start.len()
            )));
        }

        let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
        let f0 = Self::eval(objective, &start);
        simplex.push((start.clone(), f0));
        for i in 0..n {
            let mut vertex = start.clone();
            vertex[i] += self.initial_step;
            let f = Self::eval(objective, &vertex);
            simplex.push((vertex, f));
        }

        let mut converged = false;
        for _ in 0..self.max_iters {
            sort_simplex(&mut simplex);
            let fl = simplex[0].1;
            let fh = simplex[n].1;
            if (fh - fl).abs() <= self.f_tolerance * (1.0 + fl.abs()) {
                converged = true;
                break;
            }

            let centroid: Vec<f64> = (0..n)
                .map(|j| simplex[..n].iter().map(|(v, _)| v[j]).sum::<f64>() / n as f64)
                .collect();
            let worst = simplex[n].0.clone();

            let reflected: Vec<f64> = (0..n)
                .map(|j| centroid[j] + (centroid[j] - worst[j]))
                .collect();
            let fr = Self::eval(objective, &reflected);

            if fr < fl {
                let expanded: Vec<f64> = (0..n)
                    .map(|j| centroid[j] + 2.0 * (reflected[j] - centroid[j]))
                    .collect();
                let fe = Self::eval(objective, &expanded);
                simplex[n] = if fe < fr { (expanded, fe) } else { (reflected, fr) };
            } else if fr < simplex[n - 1].1 {
                simplex[n] = (reflected, fr);
            } else {
                let contracted: Vec<f64> = (0..n)
                    .map(|j| centroid[j] + 0.5 * (worst[j] - centroid[j]))
                    .collect();
                let fc = Self::eval(objective, &contracted);
                if fc < simplex[n].1 {
                    simplex[n] = (contracted, fc);
                } else {
                    // Shrink the whole simplex toward the best vertex.
                    let best = simplex[0].0.clone();
                    for vertex in simplex.iter_mut().skip(1) {
                        let shrunk: Vec<f64> = (0..n)
                            .map(|j| best[j] + 0.5 * (vertex.0[j] - best[j]))
                            .collect();
                        vertex.1 = Self::eval(objective, &shrunk);
                        vertex.0 = shrunk;
                    }
                }
            }
        }

        sort_simplex(&mut simplex);
        let (parameters, fval) = simplex[0].clone();
        let covariance = if converged {
            chi2_covariance(objective, &parameters)
        } else {
            None
        };

        Ok(MinimizerSolution {
            parameters,
            errors: None,
            covariance,
            fval,
            converged,
        })
    }
}

/// Covariance from the central-difference Hessian of the chi-square surface.
fn chi2_covariance(objective: &dyn Objective, at: &[f64]) -> Option<DMatrix<f64>> {
    let n = at.len();
    let f0 = objective.value(at).ok()?;
    let h: Vec<f64> = at.iter().map(|v| 1e-4 * (1.0 + v.abs())).collect();

    let mut hess = DMatrix::zeros(n, n);
    for i in 0..n {
        let mut plus = at.to_vec();
        plus[i] += h[i];
        let mut minus = at.to_vec();
        minus[i] -= h[i];
        let fp = objective.value(&plus).ok()?;
        let fm = objective.value(&minus).ok()?;
        hess[(i, i)] = (fp - 2.0 * f0 + fm) / (h[i] * h[i]);
    }
    for i in 0..n {
        for j in (i + 1)..n {
            let mut pp = at.to_vec();
            pp[i] += h[i];
            pp[j] += h[j];
            let mut pm = at.to_vec();
            pm[i] += h[i];
            pm[j] -= h[j];
            let mut mp = at.to_vec();
            mp[i] -= h[i];
            mp[j] += h[j];
            let mut mm = at.to_vec();
            mm[i] -= h[i];
            mm[j] -= h[j];
            let value = (objective.value(&pp).ok()? - objective.value(&pm).ok()?
                - objective.value(&mp).ok()?
                + objective.value(&mm).ok()?)
                / (4.0 * h[i] * h[j]);
            hess[(i, j)] = value;
            hess[(j, i)] = value;
        }
    }

    hess.try_inverse().map(|inverse| inverse * 2.0)
}
