//! Named correction surfaces.
//!
//! A surface stores the detector's position-dependent *response*; the
//! multiplicative correction applied to an amplitude is its reciprocal. One
//! [`CorrectionMap`] holds every surface of a calibration version (e.g. a
//! combined/top/bottom triad) and is read-only after construction, so a single
//! long-lived instance can serve any number of concurrent evaluations.
//!
//! Map instances are constructed explicitly and passed in by the caller —
//! one per calibration version — rather than living in process-wide state,
//! so two versions can be compared side by side.

use std::collections::BTreeMap;

use crate::error::CalError;

/// A scalar calibration response over the (x, y) plane.
///
/// How a surface handles coordinates outside its measured support is its own
/// business: it may extrapolate from the edge or return a NaN sentinel. The
/// sentinel is honored downstream — [`CorrectionMap::correction`] refuses to
/// build a correction out of it.
pub trait Surface: Send + Sync {
    fn response(&self, x: f64, y: f64) -> f64;
}

impl<F> Surface for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn response(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// Read-only collection of named surfaces over one 2-D domain.
#[derive(Default)]
pub struct CorrectionMap {
    surfaces: BTreeMap<String, Box<dyn Surface>>,
}

impl CorrectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style surface registration.
    pub fn with_surface(mut self, name: impl Into<String>, surface: impl Surface + 'static) -> Self {
        self.surfaces.insert(name.into(), Box::new(surface));
        self
    }

    /// Registered surface names, sorted.
    pub fn surface_names(&self) -> Vec<&str> {
        self.surfaces.keys().map(String::as_str).collect()
    }

    /// Raw response of a named surface at `(x, y)`.
    ///
    /// An out-of-support sentinel (NaN) is returned as-is; only an unknown
    /// surface name is an error here.
    pub fn evaluate(&self, name: &str, x: f64, y: f64) -> Result<f64, CalError> {
        let surface = self.surfaces.get(name).ok_or_else(|| {
            CalError::config(format!("unknown correction surface '{name}'"))
        })?;
        Ok(surface.response(x, y))
    }

    /// Multiplicative correction at `(x, y)`: the reciprocal of the response.
    ///
    /// Fails with a domain error when the response is non-finite or not
    /// strictly positive — a bogus reciprocal never propagates into a result.
    pub fn correction(&self, name: &str, x: f64, y: f64) -> Result<f64, CalError> {
        let response = self.evaluate(name, x, y)?;
        if !response.is_finite() {
            return Err(CalError::domain(format!(
                "surface '{name}' response is undefined at ({x}, {y})"
            )));
        }
        if response <= 0.0 {
            return Err(CalError::domain(format!(
                "surface '{name}' response {response} at ({x}, {y}) has no reciprocal correction"
            )));
        }
        Ok(1.0 / response)
    }
}
