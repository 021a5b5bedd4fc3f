//! Position-dependent amplitude correction.
//!
//! Responsibilities:
//!
//! - evaluate named calibration surfaces and their reciprocal corrections
//!   (`surface`)
//! - recover observed coordinates from r/z distortion offsets (`transform`)
//! - combine both into per-event corrected amplitudes (`amplitude`)

pub mod amplitude;
pub mod surface;
pub mod transform;

pub use amplitude::*;
pub use surface::*;
pub use transform::*;
