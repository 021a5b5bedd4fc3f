//! Weighted least-squares fitting.
//!
//! Responsibilities:
//!
//! - adapt a user model and its declared parameter list (`model`)
//! - build the chi-square objective over weighted observations (`objective`)
//! - seed initial guesses from a deterministic parameter grid (`seed`)
//! - drive an external minimizer and package the result (`driver`)

pub mod driver;
pub mod model;
pub mod objective;
pub mod seed;

pub use driver::*;
pub use model::*;
pub use objective::*;
pub use seed::*;
