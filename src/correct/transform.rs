//! Observed-coordinate recovery.
//!
//! Reconstruction applies a field-distortion correction that shifts each
//! event radially (by `r_offset`) and axially (by `z_offset`). Correction
//! surfaces, however, are measured against the *observed* position — where
//! the signal was actually detected. This back-transform undoes the offsets:
//!
//! - `r_observed = sqrt(x^2 + y^2) - r_offset`
//! - `z_observed = z - z_offset`
//! - x and y rescale by `r_observed / r_corrected`, preserving the angular
//!   direction of the position vector.

use crate::domain::Position;
use crate::error::CalError;

/// Recover the observed coordinates from corrected ones.
///
/// Undefined at zero radius: the radial rescale would divide by zero, and no
/// direction exists to preserve. That case fails with a domain error rather
/// than producing NaN coordinates.
pub fn back_transform(
    x: f64,
    y: f64,
    r_offset: f64,
    z: f64,
    z_offset: f64,
) -> Result<Position, CalError> {
    let r_corrected = (x * x + y * y).sqrt();
    if !r_corrected.is_finite() {
        return Err(CalError::domain(format!(
            "radius is not finite for position ({x}, {y})"
        )));
    }
    if r_corrected == 0.0 {
        return Err(CalError::domain(
            "back-transform is undefined at zero radius",
        ));
    }

    let r_observed = r_corrected - r_offset;
    let scale = r_observed / r_corrected;
    Ok(Position {
        x: scale * x,
        y: scale * y,
        z: z - z_offset,
    })
}
