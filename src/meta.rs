//! Problem metadata shared by leaves and wrappers.

use crate::error::{check_dim, ModelError, Result};

/// Dimensions and descriptive data attached to every model.
///
/// Built once through [`NlpMeta::new`], which checks that the initial
/// vectors match the declared counts. Wrappers derive a fresh record from
/// their base's instead of mutating it.
#[derive(Debug, Clone, PartialEq)]
pub struct NlpMeta {
    nvar: usize,
    ncon: usize,
    x0: Vec<f64>,
    y0: Vec<f64>,
    minimize: bool,
    name: String,
}

impl NlpMeta {
    /// Metadata for a minimization problem with `nvar` variables and `ncon`
    /// constraints, starting from `x0` with dual estimate `y0`.
    pub fn new(nvar: usize, ncon: usize, x0: Vec<f64>, y0: Vec<f64>) -> Result<Self> {
        if nvar == 0 {
            return Err(ModelError::InvalidConfig(
                "a model needs at least one variable".into(),
            ));
        }
        check_dim("initial primal point", nvar, x0.len())?;
        check_dim("initial dual point", ncon, y0.len())?;
        Ok(NlpMeta {
            nvar,
            ncon,
            x0,
            y0,
            minimize: true,
            name: "Generic".into(),
        })
    }

    /// Metadata for an unconstrained problem starting at `x0`.
    pub fn unconstrained(x0: Vec<f64>) -> Result<Self> {
        NlpMeta::new(x0.len(), 0, x0, Vec::new())
    }

    /// Replace the display name (default `"Generic"`).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Mark the problem as a maximization. Models still evaluate `f` as
    /// given; the flag only tells a solver which way to go.
    pub fn maximize(mut self) -> Self {
        self.minimize = false;
        self
    }

    /// A new record for a model derived from this one: name gets `suffix`
    /// appended, the optimization sense is kept.
    pub fn derive(&self, suffix: &str, x0: Vec<f64>, y0: Vec<f64>) -> Result<Self> {
        let mut meta = NlpMeta::new(x0.len(), y0.len(), x0, y0)?
            .with_name(format!("{}-{}", self.name, suffix));
        meta.minimize = self.minimize;
        Ok(meta)
    }

    /// Number of variables.
    #[inline]
    pub fn nvar(&self) -> usize {
        self.nvar
    }

    /// Number of constraints.
    #[inline]
    pub fn ncon(&self) -> usize {
        self.ncon
    }

    /// Initial primal point.
    pub fn x0(&self) -> &[f64] {
        &self.x0
    }

    /// Initial dual point.
    pub fn y0(&self) -> &[f64] {
        &self.y0
    }

    /// `false` after [`NlpMeta::maximize`].
    pub fn is_minimize(&self) -> bool {
        self.minimize
    }

    /// Display name; wrappers append `-slack`, `-prox`, `-auglag` or `-feas`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when the model has no constraints.
    #[inline]
    pub fn is_unconstrained(&self) -> bool {
        self.ncon == 0
    }
}
