//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can
//! be:
//!
//! - used in-memory during fitting and per-event correction
//! - exported to JSON alongside batch results
//! - reloaded later for comparisons across calibration versions

use serde::{Deserialize, Serialize};

use crate::error::CalError;

/// A validated set of weighted observations `(x_i, y_i, sigma_i)`.
///
/// Construction enforces the invariants the residual objective relies on:
/// equal lengths, at least one point, finite values, and strictly positive
/// uncertainties. The fields are private so a constructed set can be shared
/// freely without re-checking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observations {
    x: Vec<f64>,
    y: Vec<f64>,
    sigma: Vec<f64>,
}

impl Observations {
    pub fn new(x: Vec<f64>, y: Vec<f64>, sigma: Vec<f64>) -> Result<Self, CalError> {
        if x.len() != y.len() || x.len() != sigma.len() {
            return Err(CalError::config(format!(
                "observation arrays have mismatched lengths: x={}, y={}, sigma={}",
                x.len(),
                y.len(),
                sigma.len()
            )));
        }
        if x.is_empty() {
            return Err(CalError::config("observation set is empty"));
        }
        for (i, (&xi, &yi)) in x.iter().zip(y.iter()).enumerate() {
            if !(xi.is_finite() && yi.is_finite()) {
                return Err(CalError::config(format!(
                    "observation {i} is not finite: x={xi}, y={yi}"
                )));
            }
        }
        for (i, &si) in sigma.iter().enumerate() {
            if !(si.is_finite() && si > 0.0) {
                return Err(CalError::config(format!(
                    "uncertainty {i} must be finite and > 0, got {si}"
                )));
            }
        }
        Ok(Self { x, y, sigma })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn sigma(&self) -> &[f64] {
        &self.sigma
    }
}

/// Output of a completed fit.
///
/// `dof = n_observations - parameter count` exactly; `reduced_chi2` is `None`
/// (not `0.0`) whenever `dof <= 0`, so an over-parameterized fit stays
/// distinguishable from a perfect one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReport {
    pub parameter_names: Vec<String>,
    pub parameters: Vec<f64>,
    /// Per-parameter standard errors, position-matched to `parameters`.
    pub errors: Vec<f64>,
    /// Minimized objective value.
    pub chi2: f64,
    pub n_observations: usize,
    /// Degrees of freedom; may be zero or negative.
    pub dof: i64,
    pub reduced_chi2: Option<f64>,
}

impl FitReport {
    /// Best-fit value for a named parameter.
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.index_of(name).map(|i| self.parameters[i])
    }

    /// Standard error for a named parameter.
    pub fn error(&self, name: &str) -> Option<f64> {
        self.index_of(name).map(|i| self.errors[i])
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.parameter_names.iter().position(|n| n == name)
    }
}

/// A 3-D position (detector coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Which coordinates key the correction-surface lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateMode {
    /// Use the event's reconstructed coordinates as-is.
    Raw,
    /// Undo the per-event r/z distortion offsets first, so the lookup uses the
    /// observed position the map was measured against.
    BackTransformed,
}

/// Read-only view of the per-event fields the correction pipeline consumes.
///
/// The event source owns these records; the pipeline never mutates them.
/// `saturation_correction` should be set to `1.0` when the processing version
/// does not provide one, and the r/z offsets are `None` when the source ran
/// without a field-distortion correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Total signal amplitude (photoelectrons).
    pub area: f64,
    /// Fraction of `area` seen by the top channel, in `[0, 1]`.
    pub area_fraction_top: f64,
    pub lifetime_correction: f64,
    pub saturation_correction: f64,
    /// Reconstructed (corrected) coordinates.
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Radial distortion offset already applied by reconstruction, if any.
    pub r_offset: Option<f64>,
    /// Axial distortion offset already applied by reconstruction, if any.
    pub z_offset: Option<f64>,
}

/// Configuration for one corrected-amplitude computation.
///
/// One parameterized computation covers every map version: inject the
/// `CorrectionMap` instance to use, name the surface triad it provides, and
/// say whether the lookup wants raw or back-transformed coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionConfig {
    pub combined_surface: String,
    pub top_surface: String,
    pub bottom_surface: String,
    pub coordinates: CoordinateMode,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            combined_surface: "combined".to_string(),
            top_surface: "top".to_string(),
            bottom_surface: "bottom".to_string(),
            coordinates: CoordinateMode::Raw,
        }
    }
}

/// Per-event correction outputs.
///
/// Every field is an independent scalar; only the non-spatial factor is shared
/// between channels. Produced fresh per event, no identity across events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectedAmplitudes {
    /// Uncorrected top-channel amplitude (`area * area_fraction_top`).
    pub amplitude_top: f64,
    /// Uncorrected bottom-channel amplitude.
    pub amplitude_bottom: f64,
    /// Shared lifetime x saturation factor.
    pub non_spatial_correction: f64,
    /// Reciprocal response of the combined surface at the lookup position.
    pub spatial_correction: f64,
    pub spatial_correction_top: f64,
    pub spatial_correction_bottom: f64,
    pub corrected_total: f64,
    pub corrected_top: f64,
    pub corrected_bottom: f64,
    /// Coordinates actually used for the surface lookup.
    pub lookup_position: Position,
}

impl CorrectedAmplitudes {
    /// Flatten to an ordered name -> value mapping, the shape batch writers
    /// expect for one row of output.
    pub fn labeled(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("amplitude_top", self.amplitude_top),
            ("amplitude_bottom", self.amplitude_bottom),
            ("non_spatial_correction", self.non_spatial_correction),
            ("spatial_correction", self.spatial_correction),
            ("spatial_correction_top", self.spatial_correction_top),
            ("spatial_correction_bottom", self.spatial_correction_bottom),
            ("corrected_total", self.corrected_total),
            ("corrected_top", self.corrected_top),
            ("corrected_bottom", self.corrected_bottom),
            ("x_lookup", self.lookup_position.x),
            ("y_lookup", self.lookup_position.y),
            ("z_lookup", self.lookup_position.z),
        ]
    }
}
