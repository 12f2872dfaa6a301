//! Leaf model over a hand-written backend with box constraints.

use tracing::debug;

use crate::counters::Counters;
use crate::error::{check_dim, ModelError, Result};
use crate::linalg;
use crate::meta::NlpMeta;
use crate::model::Model;

/// What an external differentiable-model backend has to provide.
///
/// Evaluations write into caller-sized buffers and may fail; a backend
/// reports its own failures as [`ModelError::Backend`]. Resources the backend
/// holds (file handles, foreign allocations) are released by its `Drop`.
pub trait NlpBackend {
    fn nvar(&self) -> usize;
    fn ncon(&self) -> usize;

    /// Initial primal point, `nvar` long.
    fn x0(&self) -> Vec<f64>;

    /// Initial dual point, `ncon` long.
    fn y0(&self) -> Vec<f64> {
        vec![0.0; self.ncon()]
    }

    fn name(&self) -> String {
        "ExternalModel".to_string()
    }

    fn minimize(&self) -> bool {
        true
    }

    fn obj(&mut self, x: &[f64]) -> Result<f64>;
    fn grad(&mut self, x: &[f64], g: &mut [f64]) -> Result<()>;
    fn cons(&mut self, x: &[f64], c: &mut [f64]) -> Result<()>;
    fn jprod(&mut self, x: &[f64], v: &[f64], jv: &mut [f64]) -> Result<()>;
    fn jtprod(&mut self, x: &[f64], v: &[f64], jtv: &mut [f64]) -> Result<()>;

    fn lvar(&self) -> &[f64];
    fn uvar(&self) -> &[f64];
    fn lcon(&self) -> &[f64];
    fn ucon(&self) -> &[f64];
}

/// Leaf model forwarding every smooth evaluation to an [`NlpBackend`].
///
/// The nonsmooth term is the indicator of the variable box `[lvar, uvar]`
/// and the constraint set is the box `[lcon, ucon]`; both operators are
/// componentwise clamps. The model owns its backend, so dropping the model
/// releases it.
pub struct ExternalModel<B> {
    meta: NlpMeta,
    backend: B,
    counters: Counters,
}

impl<B: NlpBackend> ExternalModel<B> {
    /// Take ownership of `backend` after checking that its dimensions agree
    /// and that every bound pair satisfies `lower <= upper`.
    pub fn new(backend: B) -> Result<Self> {
        let (nvar, ncon) = (backend.nvar(), backend.ncon());
        check_dim("variable lower bound", nvar, backend.lvar().len())?;
        check_dim("variable upper bound", nvar, backend.uvar().len())?;
        check_dim("constraint lower bound", ncon, backend.lcon().len())?;
        check_dim("constraint upper bound", ncon, backend.ucon().len())?;
        check_bounds("variable", backend.lvar(), backend.uvar())?;
        check_bounds("constraint", backend.lcon(), backend.ucon())?;

        let mut meta = NlpMeta::new(nvar, ncon, backend.x0(), backend.y0())?.with_name(backend.name());
        if !backend.minimize() {
            meta = meta.maximize();
        }
        debug!(name = meta.name(), nvar, ncon, "wrapped external backend");
        Ok(ExternalModel {
            meta,
            backend,
            counters: Counters::default(),
        })
    }

    /// Shared access to the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Give the backend back to the caller instead of dropping it.
    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn counters_mut(&mut self) -> &mut Counters {
        &mut self.counters
    }
}

fn check_bounds(kind: &str, lower: &[f64], upper: &[f64]) -> Result<()> {
    match lower.iter().zip(upper).position(|(l, u)| l.is_nan() || u.is_nan() || l > u) {
        Some(i) => Err(ModelError::InvalidConfig(format!(
            "{kind} bounds are inconsistent at index {i}: [{}, {}]",
            lower[i], upper[i]
        ))),
        None => Ok(()),
    }
}

impl<B: NlpBackend> Model for ExternalModel<B> {
    fn meta(&self) -> &NlpMeta {
        &self.meta
    }

    fn eval_obj(&mut self, x: &[f64]) -> Result<f64> {
        self.counters.obj += 1;
        self.backend.obj(x)
    }

    fn eval_grad(&mut self, x: &[f64], g: &mut [f64]) -> Result<()> {
        self.counters.grad += 1;
        self.backend.grad(x, g)
    }

    fn eval_cons(&mut self, x: &[f64], c: &mut [f64]) -> Result<()> {
        self.counters.cons += 1;
        self.backend.cons(x, c)
    }

    fn eval_jprod(&mut self, x: &[f64], v: &[f64], jv: &mut [f64]) -> Result<()> {
        self.counters.jprod += 1;
        self.backend.jprod(x, v, jv)
    }

    fn eval_jtprod(&mut self, x: &[f64], v: &[f64], jtv: &mut [f64]) -> Result<()> {
        self.counters.jtprod += 1;
        self.backend.jtprod(x, v, jtv)
    }

    fn eval_proj(&mut self, v: &[f64], out: &mut [f64]) -> Result<()> {
        self.counters.proj += 1;
        linalg::project_box(v, self.backend.lcon(), self.backend.ucon(), out);
        Ok(())
    }

    fn eval_objprox(&mut self, x: &[f64], _step: f64, out: &mut [f64]) -> Result<f64> {
        self.counters.prox += 1;
        linalg::project_box(x, self.backend.lvar(), self.backend.uvar(), out);
        // Indicator of the box, evaluated at a point inside it.
        Ok(0.0)
    }

    fn counters(&self) -> Option<&Counters> {
        Some(&self.counters)
    }
}
