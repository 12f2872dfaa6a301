//! Feasibility problem: minimize a loss of the residual `c(x) − P_S(c(x))`,
//! optionally with a proximal term and the base's nonsmooth part.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::counters::Counters;
use crate::error::{check_dim, ModelError, Result};
use crate::linalg;
use crate::meta::NlpMeta;
use crate::model::Model;

/// Residual norms at or below this count as exact feasibility: the Euclidean
/// loss direction there is zero instead of the unit vector `r/‖r‖₂`.
///
/// Equal to `sqrt(f64::MIN_POSITIVE)`. The norm itself is computed with
/// scaling, so it stays accurate on both sides of the threshold.
pub const EUCLID_ZERO_TOL: f64 = 1.4916681462400413e-154;

/// How the infeasibility residual `r = c(x) − P_S(c(x))` is reduced to a scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Loss {
    /// `‖r‖₁`
    Abs,
    /// `‖r‖₂`
    Euclid,
    /// `½‖r‖₂²`
    #[default]
    EuclidSq,
    /// Quadratic up to `‖r‖₂ = huber_rho`, linear beyond.
    Huber,
}

impl fmt::Display for Loss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Loss::Abs => write!(f, "abs"),
            Loss::Euclid => write!(f, "euclid"),
            Loss::EuclidSq => write!(f, "euclid_sq"),
            Loss::Huber => write!(f, "huber"),
        }
    }
}

impl FromStr for Loss {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "abs" => Ok(Loss::Abs),
            "euclid" => Ok(Loss::Euclid),
            "euclid_sq" => Ok(Loss::EuclidSq),
            "huber" => Ok(Loss::Huber),
            other => Err(ModelError::InvalidConfig(format!(
                "unknown feasibility loss {other:?} (expected abs, euclid, euclid_sq or huber)"
            ))),
        }
    }
}

/// Configuration for [`FeasibilityModel`].
#[derive(Debug, Clone)]
pub struct FeasibilityConfig {
    /// Residual reduction (default: `EuclidSq`).
    pub loss: Loss,
    /// Huber threshold `ρ > 0` (default: 1).
    pub huber_rho: f64,
    /// Huber scale `μ > 0` (default: 1).
    pub huber_mu: f64,
    /// Keep the base's nonsmooth term (default: false, `g ≡ 0`).
    pub with_indicator: bool,
    /// Weight of the proximal term `≥ 0` (default: 0, disabled).
    pub wprox: f64,
    /// Per-variable proximal scaling `≥ 0` (default: all ones).
    pub dprox: Option<Vec<f64>>,
    /// Proximal reference point (default: the base's `x0`).
    pub xprox: Option<Vec<f64>>,
}

impl Default for FeasibilityConfig {
    fn default() -> Self {
        FeasibilityConfig {
            loss: Loss::EuclidSq,
            huber_rho: 1.0,
            huber_mu: 1.0,
            with_indicator: false,
            wprox: 0.0,
            dprox: None,
            xprox: None,
        }
    }
}

/// Infeasibility measure of a base model, for restoration phases:
///
/// ```text
/// min  loss(c(x) − P_S(c(x))) + wprox·½·Σ dprox∘(x − xprox)²  [+ g(x)]
/// ```
///
/// The proximal term is active only when `wprox > 0` and every `dprox > 0`.
/// The base's `g` is kept when `with_indicator` is set, otherwise `prox` is
/// the identity. The residual is cached together with the point it was
/// computed at, so value and gradient at the same `x` share one constraint
/// evaluation.
pub struct FeasibilityModel<M> {
    meta: NlpMeta,
    base: M,
    loss: Loss,
    huber_rho: f64,
    huber_mu: f64,
    with_indicator: bool,
    wprox: f64,
    dprox: Vec<f64>,
    xprox: Vec<f64>,
    with_prox: bool,
    // Residual cache.
    cached_x: Vec<f64>,
    cache_valid: bool,
    cx: Vec<f64>,
    pcx: Vec<f64>,
    r: Vec<f64>,
    // Scratch, sized once.
    dir: Vec<f64>,
}

impl<M: Model> FeasibilityModel<M> {
    pub fn new(base: M, config: FeasibilityConfig) -> Result<Self> {
        let (n, m) = (base.nvar(), base.ncon());
        if !(config.huber_rho > 0.0 && config.huber_mu > 0.0) {
            return Err(ModelError::InvalidConfig(format!(
                "Huber parameters must be positive, got rho = {} and mu = {}",
                config.huber_rho, config.huber_mu
            )));
        }
        let xprox = config
            .xprox
            .unwrap_or_else(|| base.meta().x0().to_vec());
        let dprox = config.dprox.unwrap_or_else(|| vec![1.0; n]);
        check_prox_term(n, &xprox, &dprox, config.wprox)?;

        let meta = base
            .meta()
            .derive("feas", base.meta().x0().to_vec(), Vec::new())?;
        let with_prox = prox_active(config.wprox, &dprox);
        debug!(
            loss = %config.loss,
            with_prox,
            with_indicator = config.with_indicator,
            "built feasibility model"
        );
        Ok(FeasibilityModel {
            meta,
            base,
            loss: config.loss,
            huber_rho: config.huber_rho,
            huber_mu: config.huber_mu,
            with_indicator: config.with_indicator,
            wprox: config.wprox,
            dprox,
            xprox,
            with_prox,
            cached_x: vec![0.0; n],
            cache_valid: false,
            cx: vec![0.0; m],
            pcx: vec![0.0; m],
            r: vec![0.0; m],
            dir: vec![0.0; m],
        })
    }

    /// Replace the proximal term. `with_prox` is recomputed here and nowhere else.
    pub fn update_prox(&mut self, xprox: &[f64], dprox: &[f64], wprox: f64) -> Result<()> {
        check_prox_term(self.meta.nvar(), xprox, dprox, wprox)?;
        self.xprox.copy_from_slice(xprox);
        self.dprox.copy_from_slice(dprox);
        self.wprox = wprox;
        self.with_prox = prox_active(wprox, dprox);
        debug!(wprox, with_prox = self.with_prox, "updated feasibility proximal term");
        Ok(())
    }

    pub fn loss(&self) -> Loss {
        self.loss
    }

    pub fn with_prox(&self) -> bool {
        self.with_prox
    }

    pub fn with_indicator(&self) -> bool {
        self.with_indicator
    }

    /// Loss value of the residual at `x`, without the proximal term.
    pub fn infeasibility(&mut self, x: &[f64]) -> Result<f64> {
        check_dim("x", self.meta.nvar(), x.len())?;
        self.refresh_residual(x)?;
        Ok(self.loss_value())
    }

    /// `‖c(x) − P_S(c(x))‖∞`, whatever the loss.
    pub fn cviolation(&mut self, x: &[f64]) -> Result<f64> {
        check_dim("x", self.meta.nvar(), x.len())?;
        self.refresh_residual(x)?;
        Ok(linalg::norm_inf(&self.r))
    }

    /// `½·Σ dprox∘(x − xprox)²`.
    pub fn proxdist(&self, x: &[f64]) -> Result<f64> {
        check_dim("x", self.meta.nvar(), x.len())?;
        Ok(linalg::weighted_half_sq_dist(x, &self.xprox, &self.dprox))
    }

    /// `wprox·½·Σ dprox∘(x − xprox)²`.
    pub fn scaled_proxdist(&self, x: &[f64]) -> Result<f64> {
        Ok(self.wprox * self.proxdist(x)?)
    }

    /// Residual of the last evaluation.
    pub fn residual(&self) -> &[f64] {
        &self.r
    }

    pub fn base(&self) -> &M {
        &self.base
    }

    /// Mutable access to the base drops the residual cache.
    pub fn base_mut(&mut self) -> &mut M {
        self.cache_valid = false;
        &mut self.base
    }

    pub fn into_inner(self) -> M {
        self.base
    }

    fn refresh_residual(&mut self, x: &[f64]) -> Result<()> {
        if self.cache_valid && self.cached_x.as_slice() == x {
            return Ok(());
        }
        self.cache_valid = false;
        self.base.cons(x, &mut self.cx)?;
        self.base.proj(&self.cx, &mut self.pcx)?;
        for i in 0..self.r.len() {
            self.r[i] = self.cx[i] - self.pcx[i];
        }
        self.cached_x.copy_from_slice(x);
        self.cache_valid = true;
        if tracing::enabled!(tracing::Level::TRACE) {
            trace!(norm = linalg::norm2(&self.r), "refreshed infeasibility residual");
        }
        Ok(())
    }

    fn loss_value(&self) -> f64 {
        match self.loss {
            Loss::Abs => linalg::norm1(&self.r),
            Loss::Euclid => linalg::norm2(&self.r),
            Loss::EuclidSq => 0.5 * linalg::dot(&self.r, &self.r),
            Loss::Huber => {
                let (rho, mu) = (self.huber_rho, self.huber_mu);
                let nr = linalg::norm2(&self.r);
                if nr <= rho {
                    0.5 * mu * nr * nr
                } else {
                    rho * mu * (nr - 0.5 * rho)
                }
            }
        }
    }

    /// Derivative of the loss with respect to `r`, into `dir`.
    fn fill_direction(&mut self) {
        let r = &self.r;
        let dir = &mut self.dir;
        match self.loss {
            Loss::Abs => {
                for (di, &ri) in dir.iter_mut().zip(r) {
                    *di = if ri > 0.0 {
                        1.0
                    } else if ri < 0.0 {
                        -1.0
                    } else {
                        0.0
                    };
                }
            }
            Loss::Euclid => {
                let nr = linalg::norm2(r);
                if nr <= EUCLID_ZERO_TOL {
                    dir.fill(0.0);
                } else {
                    dir.iter_mut().zip(r).for_each(|(di, ri)| *di = ri / nr);
                }
            }
            Loss::EuclidSq => dir.copy_from_slice(r),
            Loss::Huber => {
                let (rho, mu) = (self.huber_rho, self.huber_mu);
                let nr = linalg::norm2(r);
                if nr <= rho {
                    dir.iter_mut().zip(r).for_each(|(di, ri)| *di = mu * ri);
                } else {
                    dir.iter_mut().zip(r).for_each(|(di, ri)| *di = rho * mu * (ri / nr));
                }
            }
        }
    }
}

fn prox_active(wprox: f64, dprox: &[f64]) -> bool {
    wprox > 0.0 && dprox.iter().all(|&d| d > 0.0)
}

fn check_prox_term(n: usize, xprox: &[f64], dprox: &[f64], wprox: f64) -> Result<()> {
    check_dim("proximal reference point", n, xprox.len())?;
    check_dim("proximal scaling", n, dprox.len())?;
    if !(wprox >= 0.0 && wprox.is_finite()) {
        return Err(ModelError::InvalidConfig(format!(
            "proximal weight must be non-negative, got {wprox}"
        )));
    }
    if let Some(i) = dprox.iter().position(|&d| !(d >= 0.0 && d.is_finite())) {
        return Err(ModelError::InvalidConfig(format!(
            "proximal scaling dprox[{i}] = {} must be non-negative",
            dprox[i]
        )));
    }
    Ok(())
}

impl<M: Model> Model for FeasibilityModel<M> {
    fn meta(&self) -> &NlpMeta {
        &self.meta
    }

    fn eval_obj(&mut self, x: &[f64]) -> Result<f64> {
        self.refresh_residual(x)?;
        let mut value = self.loss_value();
        if self.with_prox {
            value += self.wprox * linalg::weighted_half_sq_dist(x, &self.xprox, &self.dprox);
        }
        Ok(value)
    }

    fn eval_grad(&mut self, x: &[f64], g: &mut [f64]) -> Result<()> {
        self.refresh_residual(x)?;
        self.fill_direction();
        self.base.jtprod(x, &self.dir, g)?;
        if self.with_prox {
            for i in 0..g.len() {
                g[i] += self.wprox * self.dprox[i] * (x[i] - self.xprox[i]);
            }
        }
        Ok(())
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
        if self.with_indicator {
            return self.base.prox(x, step, out);
        }
        out.copy_from_slice(x);
        Ok(())
    }

    fn eval_objprox(&mut self, x: &[f64], step: f64, out: &mut [f64]) -> Result<f64> {
        if self.with_indicator {
            return self.base.objprox(x, step, out);
        }
        out.copy_from_slice(x);
        Ok(0.0)
    }

    fn counters(&self) -> Option<&Counters> {
        self.base.counters()
    }
}
