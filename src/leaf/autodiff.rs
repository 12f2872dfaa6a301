//! [`AdModel`] and the traits its objective and constraint functions implement.

use tracing::debug;

use crate::ad::{self, Scalar};
use crate::counters::Counters;
use crate::error::{check_dim, ModelError, Result};
use crate::meta::NlpMeta;
use crate::model::Model;

/// A smooth objective written once for every [`Scalar`] type.
///
/// ```
/// use nlpmodels::ad::Scalar;
/// use nlpmodels::ScalarFunction;
///
/// struct SumSquares;
///
/// impl ScalarFunction for SumSquares {
///     fn eval<T: Scalar>(&self, x: &[T]) -> T {
///         x.iter().fold(T::zero(), |acc, &xi| acc + xi * xi)
///     }
/// }
/// ```
pub trait ScalarFunction {
    fn eval<T: Scalar>(&self, x: &[T]) -> T;
}

/// A smooth vector map `c : R^n → R^m` written once for every [`Scalar`] type.
pub trait VectorFunction {
    fn eval<T: Scalar>(&self, x: &[T]) -> Vec<T>;
}

/// The empty constraint map.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConstraints;

impl VectorFunction for NoConstraints {
    fn eval<T: Scalar>(&self, _x: &[T]) -> Vec<T> {
        Vec::new()
    }
}

/// Leaf model whose derivatives come from automatic differentiation.
///
/// The gradient is a reverse sweep over `f`, `jprod` a forward (dual number)
/// pass over `c` and `jtprod` a reverse sweep over `c` seeded with `v`. There is no
/// proximable term and no constraint set: `prox` and `proj` fail with
/// [`ModelError::NotImplemented`], except `proj` on a model without
/// constraints which has nothing to project.
pub struct AdModel<F, C = NoConstraints> {
    meta: NlpMeta,
    f: F,
    c: C,
    counters: Counters,
}

impl<F: ScalarFunction> AdModel<F> {
    /// Unconstrained model `minimize f(x)` starting at `x0`.
    pub fn new(f: F, x0: Vec<f64>) -> Result<Self> {
        AdModel::with_constraints(f, NoConstraints, x0, Vec::new())
    }
}

impl<F: ScalarFunction, C: VectorFunction> AdModel<F, C> {
    /// Model `minimize f(x)` with constraint map `c`; `y0` fixes the number
    /// of constraints and `c(x0)` must have that length.
    pub fn with_constraints(f: F, c: C, x0: Vec<f64>, y0: Vec<f64>) -> Result<Self> {
        let meta = NlpMeta::new(x0.len(), y0.len(), x0, y0)?.with_name("AdModel");
        let c0 = c.eval::<f64>(meta.x0());
        check_dim("constraint map output", meta.ncon(), c0.len())?;
        debug!(nvar = meta.nvar(), ncon = meta.ncon(), "built autodiff model");
        Ok(AdModel {
            meta,
            f,
            c,
            counters: Counters::default(),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.meta = self.meta.with_name(name);
        self
    }

    /// The objective this model differentiates.
    pub fn objective_fn(&self) -> &F {
        &self.f
    }

    pub fn constraint_fn(&self) -> &C {
        &self.c
    }

    pub fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }

    fn not_implemented(&self, op: &'static str) -> ModelError {
        ModelError::NotImplemented {
            op,
            model: self.meta.name().to_string(),
        }
    }
}

impl<F: ScalarFunction, C: VectorFunction> Model for AdModel<F, C> {
    fn meta(&self) -> &NlpMeta {
        &self.meta
    }

    fn eval_obj(&mut self, x: &[f64]) -> Result<f64> {
        self.counters.obj += 1;
        Ok(self.f.eval(x))
    }

    fn eval_grad(&mut self, x: &[f64], g: &mut [f64]) -> Result<()> {
        self.counters.grad += 1;
        let (_, gr) = ad::grad(|xr| self.f.eval(xr), x);
        g.copy_from_slice(&gr);
        Ok(())
    }

    fn eval_objgrad(&mut self, x: &[f64], g: &mut [f64]) -> Result<f64> {
        self.counters.obj += 1;
        self.counters.grad += 1;
        let (fx, gr) = ad::grad(|xr| self.f.eval(xr), x);
        g.copy_from_slice(&gr);
        Ok(fx)
    }

    fn eval_cons(&mut self, x: &[f64], c: &mut [f64]) -> Result<()> {
        self.counters.cons += 1;
        let cx = self.c.eval(x);
        check_dim("constraint map output", c.len(), cx.len())?;
        c.copy_from_slice(&cx);
        Ok(())
    }

    fn eval_jprod(&mut self, x: &[f64], v: &[f64], jv: &mut [f64]) -> Result<()> {
        self.counters.jprod += 1;
        let (_, tangents) = ad::jvp(|xd| self.c.eval(xd), x, v);
        check_dim("constraint map output", jv.len(), tangents.len())?;
        jv.copy_from_slice(&tangents);
        Ok(())
    }

    fn eval_jtprod(&mut self, x: &[f64], v: &[f64], jtv: &mut [f64]) -> Result<()> {
        self.counters.jtprod += 1;
        let (cx, gr) = ad::vjp(|xr| self.c.eval(xr), x, v);
        check_dim("constraint map output", v.len(), cx.len())?;
        jtv.copy_from_slice(&gr);
        Ok(())
    }

    fn eval_proj(&mut self, _v: &[f64], _out: &mut [f64]) -> Result<()> {
        if self.meta.is_unconstrained() {
            return Ok(());
        }
        Err(self.not_implemented("proj"))
    }

    fn eval_prox(&mut self, _x: &[f64], _step: f64, _out: &mut [f64]) -> Result<()> {
        Err(self.not_implemented("prox"))
    }

    fn eval_objprox(&mut self, _x: &[f64], _step: f64, _out: &mut [f64]) -> Result<f64> {
        Err(self.not_implemented("objprox"))
    }

    fn counters(&self) -> Option<&Counters> {
        Some(&self.counters)
    }
}
