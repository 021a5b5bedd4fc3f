//! Corrected-amplitude computation.
//!
//! Splits a total signal amplitude into top/bottom channel amplitudes,
//! applies the event's non-spatial factor (lifetime x saturation), and the
//! per-channel spatial correction from a [`CorrectionMap`]. One computation
//! covers every calibration version: the map instance, the surface-name
//! triad, and whether the lookup uses raw or back-transformed coordinates
//! all come from [`CorrectionConfig`].
//!
//! A failure (bad event fields, undefined surface response, zero-radius
//! back-transform) aborts that event only; batch-level partial-failure policy
//! belongs to the caller.

use crate::correct::surface::CorrectionMap;
use crate::correct::transform::back_transform;
use crate::domain::{CoordinateMode, CorrectedAmplitudes, CorrectionConfig, EventRecord, Position};
use crate::error::CalError;

/// Compute corrected amplitudes for one event.
pub fn correct_event(
    map: &CorrectionMap,
    config: &CorrectionConfig,
    event: &EventRecord,
) -> Result<CorrectedAmplitudes, CalError> {
    validate_event(event)?;

    let amplitude_top = event.area * event.area_fraction_top;
    let amplitude_bottom = event.area * (1.0 - event.area_fraction_top);
    let non_spatial = event.lifetime_correction * event.saturation_correction;

    let lookup = lookup_position(config, event)?;

    let spatial = map.correction(&config.combined_surface, lookup.x, lookup.y)?;
    let spatial_top = map.correction(&config.top_surface, lookup.x, lookup.y)?;
    let spatial_bottom = map.correction(&config.bottom_surface, lookup.x, lookup.y)?;

    Ok(CorrectedAmplitudes {
        amplitude_top,
        amplitude_bottom,
        non_spatial_correction: non_spatial,
        spatial_correction: spatial,
        spatial_correction_top: spatial_top,
        spatial_correction_bottom: spatial_bottom,
        corrected_total: event.area * non_spatial * spatial,
        corrected_top: amplitude_top * non_spatial * spatial_top,
        corrected_bottom: amplitude_bottom * non_spatial * spatial_bottom,
        lookup_position: lookup,
    })
}

/// Resolve the coordinates that key the surface lookup.
fn lookup_position(config: &CorrectionConfig, event: &EventRecord) -> Result<Position, CalError> {
    match config.coordinates {
        CoordinateMode::Raw => Ok(Position {
            x: event.x,
            y: event.y,
            z: event.z,
        }),
        CoordinateMode::BackTransformed => {
            let (Some(r_offset), Some(z_offset)) = (event.r_offset, event.z_offset) else {
                return Err(CalError::domain(
                    "event carries no r/z distortion offsets; cannot recover observed coordinates",
                ));
            };
            back_transform(event.x, event.y, r_offset, event.z, z_offset)
        }
    }
}

fn validate_event(event: &EventRecord) -> Result<(), CalError> {
    if !event.area.is_finite() {
        return Err(CalError::domain(format!(
            "event amplitude is not finite: {}",
            event.area
        )));
    }
    // NaN fails the range check too.
    if !(0.0..=1.0).contains(&event.area_fraction_top) {
        return Err(CalError::domain(format!(
            "area fraction {} is outside [0, 1]",
            event.area_fraction_top
        )));
    }
    if !(event.lifetime_correction.is_finite() && event.saturation_correction.is_finite()) {
        return Err(CalError::domain(
            "event non-spatial correction factors are not finite",
        ));
    }
    Ok(())
}
