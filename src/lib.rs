//! `sigcal` library crate.
//!
//! Signal-calibration core with two independent pipelines:
//!
//! - `fit`: weighted least-squares (chi-square) curve fitting — wrap a model
//!   with a declared parameter list, build a residual objective over
//!   `(x, y, sigma)` observations, and drive an externally supplied minimizer
//! - `correct`: position-dependent amplitude correction — recover observed
//!   coordinates, look up named calibration surfaces, and produce corrected
//!   per-channel amplitudes
//!
//! The minimizer engine, the correction-map file format, and the event source
//! are collaborators behind traits/plain records, so the core stays testable
//! without any of them.

pub mod correct;
pub mod domain;
pub mod error;
pub mod fit;
