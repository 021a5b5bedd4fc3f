//! Initial-guess seeding via a deterministic parameter grid.
//!
//! Why a grid?
//!
//! - Descent engines started far from the basin can stall in local minima; a
//!   coarse scan finds a reasonable basin first.
//! - It is deterministic given the same ranges, so fits reproduce exactly.
//! - Candidate evaluations are independent and run in parallel.
//!
//! This is seeding only: the returned vector goes into `fit(..., initial)`
//! and the actual search stays with the external minimizer.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::error::CalError;
use crate::fit::driver::Objective;

/// Inclusive per-parameter seed range.
#[derive(Debug, Clone, Copy)]
pub struct SeedRange {
    pub min: f64,
    pub max: f64,
    pub steps: usize,
}

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
pub fn lin_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, CalError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(CalError::config(format!(
            "invalid seed range: min={min}, max={max} (must be finite and max>min)"
        )));
    }
    if steps < 2 {
        return Err(CalError::config("seed steps must be >= 2"));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push(min + step * i as f64);
    }
    Ok(out)
}

/// Evaluate the cartesian grid of candidate parameter vectors and return the
/// one with the lowest chi-square.
///
/// Candidates whose objective evaluation fails (non-finite model values) are
/// skipped rather than failing the scan. Ties break by original grid index,
/// so the result is deterministic regardless of thread scheduling.
pub fn best_seed<O: Objective + ?Sized>(
    objective: &O,
    ranges: &[SeedRange],
) -> Result<Vec<f64>, CalError> {
    let n_par = objective.parameter_names().len();
    if ranges.len() != n_par {
        return Err(CalError::config(format!(
            "seed scan given {} ranges, model declares {n_par} parameters",
            ranges.len()
        )));
    }

    let axes: Vec<Vec<f64>> = ranges
        .iter()
        .map(|r| lin_space(r.min, r.max, r.steps))
        .collect::<Result<_, _>>()?;
    let total: usize = axes.iter().map(|a| a.len()).product();

    let best = (0..total)
        .into_par_iter()
        .filter_map(|idx| {
            let params = decode_candidate(idx, &axes);
            match objective.value(&params) {
                Ok(chi2) if chi2.is_finite() => Some((idx, params, chi2)),
                _ => None,
            }
        })
        .min_by(|a, b| {
            a.2.partial_cmp(&b.2)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

    match best {
        Some((_, params, _)) => Ok(params),
        None => Err(CalError::config(
            "no seed candidate produced a finite chi-square",
        )),
    }
}

/// Map a flat grid index to its parameter vector (last axis varies fastest).
fn decode_candidate(mut idx: usize, axes: &[Vec<f64>]) -> Vec<f64> {
    let mut out = vec![0.0; axes.len()];
    for (slot, axis) in axes.iter().enumerate().rev() {
        out[slot] = axis[idx % axis.len()];
        idx /= axis.len();
    }
    out
}
