//! Proximal-point subproblem around an anchor, updated in place between solves.

use tracing::debug;

use crate::counters::Counters;
use crate::error::{check_dim, ModelError, Result};
use crate::meta::NlpMeta;
use crate::model::Model;

/// Proximal-point subproblem of a base model:
///
/// ```text
/// min  (1/2a)‖x − x0‖² + g(x)   s.t.  c(x) ∈ S
/// ```
///
/// Only the smooth part changes; constraints, Jacobian products, projection
/// and the proximal map of `g` all come from the base.
pub struct ProxModel<M> {
    meta: NlpMeta,
    base: M,
    anchor: Vec<f64>,
    step: f64,
}

impl<M: Model> ProxModel<M> {
    pub fn new(base: M, anchor: Vec<f64>, step: f64) -> Result<Self> {
        check_anchor(base.nvar(), &anchor, step)?;
        let meta = base
            .meta()
            .derive("prox", base.meta().x0().to_vec(), base.meta().y0().to_vec())?;
        debug!(nvar = meta.nvar(), step, "built proximal model");
        Ok(ProxModel {
            meta,
            base,
            anchor,
            step,
        })
    }

    /// Move the anchor and step in place.
    pub fn update(&mut self, anchor: &[f64], step: f64) -> Result<()> {
        check_anchor(self.meta.nvar(), anchor, step)?;
        self.anchor.copy_from_slice(anchor);
        self.step = step;
        debug!(step, "re-anchored proximal model");
        Ok(())
    }

    pub fn anchor(&self) -> &[f64] {
        &self.anchor
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn base(&self) -> &M {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut M {
        &mut self.base
    }

    pub fn into_inner(self) -> M {
        self.base
    }
}

fn check_anchor(nvar: usize, anchor: &[f64], step: f64) -> Result<()> {
    check_dim("proximal anchor", nvar, anchor.len())?;
    if !(step > 0.0 && step.is_finite()) {
        return Err(ModelError::InvalidConfig(format!(
            "proximal step must be positive and finite, got {step}"
        )));
    }
    Ok(())
}

impl<M: Model> Model for ProxModel<M> {
    fn meta(&self) -> &NlpMeta {
        &self.meta
    }

    fn eval_obj(&mut self, x: &[f64]) -> Result<f64> {
        let sq: f64 = x
            .iter()
            .zip(&self.anchor)
            .map(|(xi, ai)| (xi - ai) * (xi - ai))
            .sum();
        Ok(sq / (2.0 * self.step))
    }

    fn eval_grad(&mut self, x: &[f64], g: &mut [f64]) -> Result<()> {
        for i in 0..x.len() {
            g[i] = (x[i] - self.anchor[i]) / self.step;
        }
        Ok(())
    }

    fn eval_cons(&mut self, x: &[f64], c: &mut [f64]) -> Result<()> {
        self.base.cons(x, c)
    }

    fn eval_jprod(&mut self, x: &[f64], v: &[f64], jv: &mut [f64]) -> Result<()> {
        self.base.jprod(x, v, jv)
    }

    fn eval_jtprod(&mut self, x: &[f64], v: &[f64], jtv: &mut [f64]) -> Result<()> {
        self.base.jtprod(x, v, jtv)
    }

    fn eval_proj(&mut self, v: &[f64], out: &mut [f64]) -> Result<()> {
        self.base.proj(v, out)
    }

    fn eval_prox(&mut self, x: &[f64], step: f64, out: &mut [f64]) -> Result<()> {
        self.base.prox(x, step, out)
    }

    fn eval_objprox(&mut self, x: &[f64], step: f64, out: &mut [f64]) -> Result<f64> {
        self.base.objprox(x, step, out)
    }

    fn counters(&self) -> Option<&Counters> {
        self.base.counters()
    }
}
