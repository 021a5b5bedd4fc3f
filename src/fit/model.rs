//! Model adaptation.
//!
//! A model is a function of one independent variable plus N named free
//! parameters. The author states the parameter list right next to the
//! function — there is no signature reflection to discover it — and
//! adaptation snapshots that list once, so the residual loop never re-queries
//! the model for structure.

use crate::error::CalError;

/// A user-supplied model function.
///
/// `evaluate` receives the independent variable first and the free parameters
/// positionally, in the order given by `parameter_names`.
pub trait Model {
    /// Ordered free-parameter names, excluding the independent variable.
    fn parameter_names(&self) -> &[String];

    fn evaluate(&self, x: f64, params: &[f64]) -> f64;
}

/// A model wrapped for fitting.
///
/// The parameter-name list is fixed at adaptation time and is guaranteed
/// non-empty. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct AdaptedModel<M> {
    model: M,
    names: Vec<String>,
}

/// Wrap a model for use in the fit pipeline.
///
/// Fails if the model declares no free parameters beyond the independent
/// variable: there would be nothing to fit.
pub fn adapt<M: Model>(model: M) -> Result<AdaptedModel<M>, CalError> {
    let names = model.parameter_names().to_vec();
    if names.is_empty() {
        return Err(CalError::config(
            "model declares no free parameters beyond the independent variable",
        ));
    }
    Ok(AdaptedModel { model, names })
}

impl<M: Model> AdaptedModel<M> {
    pub fn parameter_names(&self) -> &[String] {
        &self.names
    }

    pub fn parameter_count(&self) -> usize {
        self.names.len()
    }

    /// Forward evaluation to the wrapped model.
    ///
    /// # Panics
    /// Debug builds assert that `params` matches the declared parameter count;
    /// the objective guarantees this for all minimizer-driven calls.
    pub fn evaluate(&self, x: f64, params: &[f64]) -> f64 {
        debug_assert_eq!(params.len(), self.names.len());
        self.model.evaluate(x, params)
    }
}

/// Closure-backed model: a parameter-name list plus an evaluation function.
///
/// The convenient way to express small analytic models, e.g. a line:
///
/// ```
/// use sigcal::fit::FnModel;
///
/// let linear = FnModel::new(&["a", "b"], |x, p: &[f64]| p[0] + p[1] * x);
/// ```
pub struct FnModel<F> {
    names: Vec<String>,
    f: F,
}

impl<F> std::fmt::Debug for FnModel<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnModel")
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

impl<F> FnModel<F>
where
    F: Fn(f64, &[f64]) -> f64,
{
    pub fn new(names: &[&str], f: F) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            f,
        }
    }
}

impl<F> Model for FnModel<F>
where
    F: Fn(f64, &[f64]) -> f64,
{
    fn parameter_names(&self) -> &[String] {
        &self.names
    }

    fn evaluate(&self, x: f64, params: &[f64]) -> f64 {
        (self.f)(x, params)
    }
}
