//! Slack reformulation: inequality and range constraints become equalities
//! on `[x; s]` with the constraint set moved onto the slack block.

use tracing::debug;

use crate::counters::Counters;
use crate::error::{check_dim, Result};
use crate::meta::NlpMeta;
use crate::model::Model;

/// Slack reformulation of `min f(x) + g(x) s.t. c(x) ∈ S`:
///
/// ```text
/// min  f(x) + g(x) + δ_S(s)   s.t.  c(x) − s = 0
/// ```
///
/// over `X = [x; s]`. The constraint set becomes `{0}` and membership in `S`
/// moves into the nonsmooth term as an indicator on the slack block, whose
/// proximal map is the base's projection.
pub struct SlackModel<M> {
    meta: NlpMeta,
    base: M,
    n: usize,
}

impl<M: Model> SlackModel<M> {
    /// Wrap `base`. The initial point is `[x0; c(x0)]`, which satisfies the
    /// new equality constraints.
    pub fn new(mut base: M) -> Result<Self> {
        let n = base.nvar();
        let x0 = base.meta().x0().to_vec();
        let s0 = base.cons_vec(&x0)?;
        let mut xs0 = x0;
        xs0.extend_from_slice(&s0);
        let meta = base.meta().derive("slack", xs0, base.meta().y0().to_vec())?;
        debug!(nvar = meta.nvar(), ncon = meta.ncon(), "built slack model");
        Ok(SlackModel { meta, base, n })
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

    /// Split a point of this model into its `(x, s)` blocks.
    ///
    /// `xs` must have length `nvar()`, otherwise `DimensionMismatch`.
    pub fn split<'a>(&self, xs: &'a [f64]) -> Result<(&'a [f64], &'a [f64])> {
        check_dim("x", self.meta.nvar(), xs.len())?;
        Ok(xs.split_at(self.n))
    }
}

impl<M: Model> Model for SlackModel<M> {
    fn meta(&self) -> &NlpMeta {
        &self.meta
    }

    fn eval_obj(&mut self, xs: &[f64]) -> Result<f64> {
        self.base.obj(&xs[..self.n])
    }

    fn eval_grad(&mut self, xs: &[f64], g: &mut [f64]) -> Result<()> {
        let (gx, gs) = g.split_at_mut(self.n);
        self.base.grad(&xs[..self.n], gx)?;
        gs.fill(0.0);
        Ok(())
    }

    fn eval_objgrad(&mut self, xs: &[f64], g: &mut [f64]) -> Result<f64> {
        let (gx, gs) = g.split_at_mut(self.n);
        let f = self.base.objgrad(&xs[..self.n], gx)?;
        gs.fill(0.0);
        Ok(f)
    }

    fn eval_cons(&mut self, xs: &[f64], c: &mut [f64]) -> Result<()> {
        let (x, s) = xs.split_at(self.n);
        self.base.cons(x, c)?;
        c.iter_mut().zip(s).for_each(|(ci, si)| *ci -= si);
        Ok(())
    }

    fn eval_objcons(&mut self, xs: &[f64], c: &mut [f64]) -> Result<f64> {
        let (x, s) = xs.split_at(self.n);
        let f = self.base.objcons(x, c)?;
        c.iter_mut().zip(s).for_each(|(ci, si)| *ci -= si);
        Ok(f)
    }

    fn eval_jprod(&mut self, xs: &[f64], v: &[f64], jv: &mut [f64]) -> Result<()> {
        let (vx, vs) = v.split_at(self.n);
        self.base.jprod(&xs[..self.n], vx, jv)?;
        jv.iter_mut().zip(vs).for_each(|(ji, vi)| *ji -= vi);
        Ok(())
    }

    fn eval_jtprod(&mut self, xs: &[f64], v: &[f64], jtv: &mut [f64]) -> Result<()> {
        let (jx, js) = jtv.split_at_mut(self.n);
        self.base.jtprod(&xs[..self.n], v, jx)?;
        js.iter_mut().zip(v).for_each(|(ji, vi)| *ji = -vi);
        Ok(())
    }

    /// The constraint set is `{0}`.
    fn eval_proj(&mut self, _v: &[f64], out: &mut [f64]) -> Result<()> {
        out.fill(0.0);
        Ok(())
    }

    fn eval_prox(&mut self, xs: &[f64], step: f64, out: &mut [f64]) -> Result<()> {
        let (x, s) = xs.split_at(self.n);
        let (ox, os) = out.split_at_mut(self.n);
        self.base.prox(x, step, ox)?;
        self.base.proj(s, os)
    }

    fn eval_objprox(&mut self, xs: &[f64], step: f64, out: &mut [f64]) -> Result<f64> {
        let (x, s) = xs.split_at(self.n);
        let (ox, os) = out.split_at_mut(self.n);
        let gx = self.base.objprox(x, step, ox)?;
        // δ_S vanishes at the projected slack.
        self.base.proj(s, os)?;
        Ok(gx)
    }

    fn counters(&self) -> Option<&Counters> {
        self.base.counters()
    }
}
