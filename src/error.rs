//! Error type shared by the fit and correction pipelines.
//!
//! Three failure classes, kept deliberately coarse:
//!
//! - `Configuration`: the caller wired something up wrong (zero-parameter
//!   model, mismatched observation arrays, unknown surface name).
//! - `Domain`: the inputs hit a numerically undefined case (non-finite model
//!   value, zero correction response, zero-radius back-transform).
//! - `NotConverged`: the minimizer stopped without meeting its criterion.
//!
//! None of these are swallowed downstream; every operation returns them to
//! its immediate caller.

#[derive(Clone, PartialEq, Eq)]
pub enum CalError {
    Configuration(String),
    Domain(String),
    NotConverged(String),
}

impl CalError {
    pub fn config(message: impl Into<String>) -> Self {
        CalError::Configuration(message.into())
    }

    pub fn domain(message: impl Into<String>) -> Self {
        CalError::Domain(message.into())
    }

    pub fn not_converged(message: impl Into<String>) -> Self {
        CalError::NotConverged(message.into())
    }

    fn kind(&self) -> &'static str {
        match self {
            CalError::Configuration(_) => "configuration error",
            CalError::Domain(_) => "domain error",
            CalError::NotConverged(_) => "fit did not converge",
        }
    }

    fn message(&self) -> &str {
        match self {
            CalError::Configuration(m) | CalError::Domain(m) | CalError::NotConverged(m) => m,
        }
    }
}

impl std::fmt::Display for CalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind(), self.message())
    }
}

impl std::fmt::Debug for CalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalError")
            .field("kind", &self.kind())
            .field("message", &self.message())
            .finish()
    }
}

impl std::error::Error for CalError {}
