//! Domain types used throughout both pipelines.
//!
//! This module defines:
//!
//! - the validated observation set consumed by the fit objective
//! - fit outputs (`FitReport`)
//! - per-event correction inputs and outputs (`EventRecord`,
//!   `CorrectionConfig`, `CorrectedAmplitudes`)

pub mod types;

pub use types::*;
