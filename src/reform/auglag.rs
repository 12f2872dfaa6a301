//! Augmented Lagrangian wrapper. The constraints move into a smooth penalty on
//! the distance of `c(x) + mu∘y` to `S`; the nonsmooth term stays.

use tracing::{debug, trace};

use crate::counters::Counters;
use crate::error::{check_dim, ModelError, Result};
use crate::meta::NlpMeta;
use crate::model::Model;

/// Augmented-Lagrangian surrogate of a constrained base model.
///
/// For penalty weights `mu > 0` and multiplier estimates `y`, the smooth part
/// becomes the Moreau-envelope form
///
/// ```text
/// L(x) = f(x) + ½·Σ (w − P_S(w))² / mu − ½·Σ mu·y²,    w = c(x) + mu∘y
/// ∇L(x) = ∇f(x) + J(x)ᵗ·yu,                           yu = (w − P_S(w)) ./ mu
/// ```
///
/// The result has no constraints; `g` and its proximal map are the base's.
/// `yu` from the last evaluation is available through
/// [`AugLagModel::multiplier_estimate`] for outer multiplier updates.
pub struct AugLagModel<M> {
    meta: NlpMeta,
    base: M,
    mu: Vec<f64>,
    y: Vec<f64>,
    // Derived from (mu, y); only `update` writes them.
    muy: Vec<f64>,
    half_muy2: f64,
    // Scratch, sized once.
    cx: Vec<f64>,
    z: Vec<f64>,
    wz: Vec<f64>,
    yu: Vec<f64>,
    jtv: Vec<f64>,
}

impl<M: Model> AugLagModel<M> {
    pub fn new(base: M, mu: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        let (n, m) = (base.nvar(), base.ncon());
        check_penalty(m, &mu, &y)?;
        let meta = base
            .meta()
            .derive("auglag", base.meta().x0().to_vec(), Vec::new())?;
        let mut model = AugLagModel {
            meta,
            base,
            mu,
            y,
            muy: vec![0.0; m],
            half_muy2: 0.0,
            cx: vec![0.0; m],
            z: vec![0.0; m],
            wz: vec![0.0; m],
            yu: vec![0.0; m],
            jtv: vec![0.0; n],
        };
        model.refresh_derived();
        debug!(nvar = n, ncon = m, "built augmented-Lagrangian model");
        Ok(model)
    }

    /// Same penalty `mu` on every constraint, multipliers from the base's `y0`.
    pub fn with_uniform_penalty(base: M, mu: f64) -> Result<Self> {
        let m = base.ncon();
        let y = base.meta().y0().to_vec();
        AugLagModel::new(base, vec![mu; m], y)
    }

    /// Replace penalty weights and multipliers, recomputing `mu∘y` and
    /// `½·Σ mu·y²`. Fails without changing anything if a weight is not
    /// strictly positive.
    pub fn update(&mut self, mu: &[f64], y: &[f64]) -> Result<()> {
        check_penalty(self.mu.len(), mu, y)?;
        self.mu.copy_from_slice(mu);
        self.y.copy_from_slice(y);
        self.refresh_derived();
        debug!(half_muy2 = self.half_muy2, "updated augmented-Lagrangian parameters");
        Ok(())
    }

    fn refresh_derived(&mut self) {
        let mut acc = 0.0;
        for i in 0..self.mu.len() {
            self.muy[i] = self.mu[i] * self.y[i];
            acc += self.muy[i] * self.y[i];
        }
        self.half_muy2 = 0.5 * acc;
    }

    /// Penalty weights `mu`.
    pub fn penalty(&self) -> &[f64] {
        &self.mu
    }

    /// Multiplier estimates `y`.
    pub fn multipliers(&self) -> &[f64] {
        &self.y
    }

    /// `yu = (w − P_S(w)) ./ mu` from the last evaluation.
    pub fn multiplier_estimate(&self) -> &[f64] {
        &self.yu
    }

    /// `w − P_S(w)` from the last evaluation.
    pub fn shifted_residual(&self) -> &[f64] {
        &self.wz
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

    /// Steps 1-5: fills `cx`, `wz`, `yu` and returns `L(x)`.
    fn evaluate(&mut self, x: &[f64]) -> Result<f64> {
        let fx = self.base.objcons(x, &mut self.cx)?;
        for i in 0..self.cx.len() {
            self.wz[i] = self.cx[i] + self.muy[i];
        }
        self.base.proj(&self.wz, &mut self.z)?;

        let mut pen = 0.0;
        for i in 0..self.wz.len() {
            self.wz[i] -= self.z[i];
            self.yu[i] = self.wz[i] / self.mu[i];
            pen += self.wz[i] * self.yu[i];
        }
        trace!(penalty = 0.5 * pen, "evaluated augmented Lagrangian");
        Ok(fx + 0.5 * pen - self.half_muy2)
    }

    /// Step 6, given `yu` from `evaluate` at the same `x`.
    fn add_jtprod(&mut self, x: &[f64], g: &mut [f64]) -> Result<()> {
        self.base.jtprod(x, &self.yu, &mut self.jtv)?;
        g.iter_mut().zip(&self.jtv).for_each(|(gi, ji)| *gi += ji);
        Ok(())
    }
}

fn check_penalty(m: usize, mu: &[f64], y: &[f64]) -> Result<()> {
    check_dim("penalty weights", m, mu.len())?;
    check_dim("multipliers", m, y.len())?;
    if let Some(i) = mu.iter().position(|&w| !(w > 0.0 && w.is_finite())) {
        return Err(ModelError::InvalidConfig(format!(
            "penalty weight mu[{i}] = {} must be positive and finite",
            mu[i]
        )));
    }
    Ok(())
}

impl<M: Model> Model for AugLagModel<M> {
    fn meta(&self) -> &NlpMeta {
        &self.meta
    }

    fn eval_obj(&mut self, x: &[f64]) -> Result<f64> {
        self.evaluate(x)
    }

    fn eval_grad(&mut self, x: &[f64], g: &mut [f64]) -> Result<()> {
        self.eval_objgrad(x, g).map(|_| ())
    }

    fn eval_objgrad(&mut self, x: &[f64], g: &mut [f64]) -> Result<f64> {
        let value = self.evaluate(x)?;
        self.base.grad(x, g)?;
        self.add_jtprod(x, g)?;
        Ok(value)
    }

    fn eval_cons(&mut self, _x: &[f64], _c: &mut [f64]) -> Result<()> {
        Ok(())
    }

    fn eval_jprod(&mut self, _x: &[f64], _v: &[f64], _jv: &mut [f64]) -> Result<()> {
        Ok(())
    }

    fn eval_jtprod(&mut self, _x: &[f64], _v: &[f64], jtv: &mut [f64]) -> Result<()> {
        jtv.fill(0.0);
        Ok(())
    }

    fn eval_proj(&mut self, _v: &[f64], _out: &mut [f64]) -> Result<()> {
        Ok(())
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
