//! The [`Model`] trait every problem representation implements.

use crate::counters::Counters;
use crate::error::{check_dim, ModelError, Result};
use crate::linalg;
use crate::meta::NlpMeta;

/// A problem `minimize f(x) + g(x) subject to c(x) ∈ S`.
///
/// Implementors provide the `eval_*` operators; those are only ever called
/// with arguments whose lengths were already validated. Callers use the
/// checked operators (`obj`, `grad`, `cons`, ...) which reject any length
/// disagreeing with [`NlpMeta::nvar`] / [`NlpMeta::ncon`] with
/// [`ModelError::DimensionMismatch`] before computing anything.
///
/// Operators take `&mut self` so models can keep scratch buffers, caches and
/// counters. Calls on one instance are therefore serialized by the borrow
/// checker; a model holds no locks of its own.
pub trait Model {
    /// Dimensions and descriptive data.
    fn meta(&self) -> &NlpMeta;

    /// `f(x)`.
    fn eval_obj(&mut self, x: &[f64]) -> Result<f64>;

    /// Write `∇f(x)` into `g`.
    fn eval_grad(&mut self, x: &[f64], g: &mut [f64]) -> Result<()>;

    /// Write `c(x)` into `c`.
    fn eval_cons(&mut self, x: &[f64], c: &mut [f64]) -> Result<()>;

    /// Write `J(x)·v` into `jv`.
    fn eval_jprod(&mut self, x: &[f64], v: &[f64], jv: &mut [f64]) -> Result<()>;

    /// Write `J(x)ᵗ·v` into `jtv`.
    fn eval_jtprod(&mut self, x: &[f64], v: &[f64], jtv: &mut [f64]) -> Result<()>;

    /// Write the projection of `v` onto `S` into `out`.
    fn eval_proj(&mut self, v: &[f64], out: &mut [f64]) -> Result<()>;

    /// Write `prox_{step·g}(x)` into `out` and return `g(out)`.
    fn eval_objprox(&mut self, x: &[f64], step: f64, out: &mut [f64]) -> Result<f64>;

    /// Write `prox_{step·g}(x)` into `out`.
    fn eval_prox(&mut self, x: &[f64], step: f64, out: &mut [f64]) -> Result<()> {
        self.eval_objprox(x, step, out).map(|_| ())
    }

    /// Fused `f(x)` and `∇f(x)`. Override when sharing work pays off.
    fn eval_objgrad(&mut self, x: &[f64], g: &mut [f64]) -> Result<f64> {
        let f = self.eval_obj(x)?;
        self.eval_grad(x, g)?;
        Ok(f)
    }

    /// Fused `f(x)` and `c(x)`.
    fn eval_objcons(&mut self, x: &[f64], c: &mut [f64]) -> Result<f64> {
        let f = self.eval_obj(x)?;
        self.eval_cons(x, c)?;
        Ok(f)
    }

    /// Evaluation counters of the underlying leaf, if it keeps any.
    fn counters(&self) -> Option<&Counters> {
        None
    }

    // ── Checked operators ──

    #[inline]
    fn nvar(&self) -> usize {
        self.meta().nvar()
    }

    #[inline]
    fn ncon(&self) -> usize {
        self.meta().ncon()
    }

    #[inline]
    fn is_unconstrained(&self) -> bool {
        self.meta().is_unconstrained()
    }

    fn obj(&mut self, x: &[f64]) -> Result<f64> {
        check_dim("x", self.nvar(), x.len())?;
        self.eval_obj(x)
    }

    fn grad(&mut self, x: &[f64], g: &mut [f64]) -> Result<()> {
        check_dim("x", self.nvar(), x.len())?;
        check_dim("gradient output", self.nvar(), g.len())?;
        self.eval_grad(x, g)
    }

    fn objgrad(&mut self, x: &[f64], g: &mut [f64]) -> Result<f64> {
        check_dim("x", self.nvar(), x.len())?;
        check_dim("gradient output", self.nvar(), g.len())?;
        self.eval_objgrad(x, g)
    }

    fn cons(&mut self, x: &[f64], c: &mut [f64]) -> Result<()> {
        check_dim("x", self.nvar(), x.len())?;
        check_dim("constraint output", self.ncon(), c.len())?;
        self.eval_cons(x, c)
    }

    fn objcons(&mut self, x: &[f64], c: &mut [f64]) -> Result<f64> {
        check_dim("x", self.nvar(), x.len())?;
        check_dim("constraint output", self.ncon(), c.len())?;
        self.eval_objcons(x, c)
    }

    fn jprod(&mut self, x: &[f64], v: &[f64], jv: &mut [f64]) -> Result<()> {
        check_dim("x", self.nvar(), x.len())?;
        check_dim("jprod direction", self.nvar(), v.len())?;
        check_dim("jprod output", self.ncon(), jv.len())?;
        self.eval_jprod(x, v, jv)
    }

    fn jtprod(&mut self, x: &[f64], v: &[f64], jtv: &mut [f64]) -> Result<()> {
        check_dim("x", self.nvar(), x.len())?;
        check_dim("jtprod direction", self.ncon(), v.len())?;
        check_dim("jtprod output", self.nvar(), jtv.len())?;
        self.eval_jtprod(x, v, jtv)
    }

    fn proj(&mut self, v: &[f64], out: &mut [f64]) -> Result<()> {
        check_dim("projection input", self.ncon(), v.len())?;
        check_dim("projection output", self.ncon(), out.len())?;
        self.eval_proj(v, out)
    }

    fn prox(&mut self, x: &[f64], step: f64, out: &mut [f64]) -> Result<()> {
        check_prox_args(self.nvar(), x, step, out)?;
        self.eval_prox(x, step, out)
    }

    fn objprox(&mut self, x: &[f64], step: f64, out: &mut [f64]) -> Result<f64> {
        check_prox_args(self.nvar(), x, step, out)?;
        self.eval_objprox(x, step, out)
    }

    // ── Derived operations ──

    fn grad_vec(&mut self, x: &[f64]) -> Result<Vec<f64>> {
        let mut g = vec![0.0; self.nvar()];
        self.grad(x, &mut g)?;
        Ok(g)
    }

    fn objgrad_vec(&mut self, x: &[f64]) -> Result<(f64, Vec<f64>)> {
        let mut g = vec![0.0; self.nvar()];
        let f = self.objgrad(x, &mut g)?;
        Ok((f, g))
    }

    fn cons_vec(&mut self, x: &[f64]) -> Result<Vec<f64>> {
        let mut c = vec![0.0; self.ncon()];
        self.cons(x, &mut c)?;
        Ok(c)
    }

    fn objcons_vec(&mut self, x: &[f64]) -> Result<(f64, Vec<f64>)> {
        let mut c = vec![0.0; self.ncon()];
        let f = self.objcons(x, &mut c)?;
        Ok((f, c))
    }

    fn jprod_vec(&mut self, x: &[f64], v: &[f64]) -> Result<Vec<f64>> {
        let mut jv = vec![0.0; self.ncon()];
        self.jprod(x, v, &mut jv)?;
        Ok(jv)
    }

    fn jtprod_vec(&mut self, x: &[f64], v: &[f64]) -> Result<Vec<f64>> {
        let mut jtv = vec![0.0; self.nvar()];
        self.jtprod(x, v, &mut jtv)?;
        Ok(jtv)
    }

    fn proj_vec(&mut self, v: &[f64]) -> Result<Vec<f64>> {
        let mut out = vec![0.0; self.ncon()];
        self.proj(v, &mut out)?;
        Ok(out)
    }

    fn prox_vec(&mut self, x: &[f64], step: f64) -> Result<Vec<f64>> {
        let mut out = vec![0.0; self.nvar()];
        self.prox(x, step, &mut out)?;
        Ok(out)
    }

    fn objprox_vec(&mut self, x: &[f64], step: f64) -> Result<(f64, Vec<f64>)> {
        let mut out = vec![0.0; self.nvar()];
        let g = self.objprox(x, step, &mut out)?;
        Ok((g, out))
    }

    /// Euclidean distance from `v` to `S`: `‖proj(v) − v‖₂`.
    fn dist(&mut self, v: &[f64]) -> Result<f64> {
        let mut p = self.proj_vec(v)?;
        for (pi, vi) in p.iter_mut().zip(v) {
            *pi -= vi;
        }
        Ok(linalg::norm2(&p))
    }
}

fn check_prox_args(nvar: usize, x: &[f64], step: f64, out: &[f64]) -> Result<()> {
    check_dim("x", nvar, x.len())?;
    check_dim("prox output", nvar, out.len())?;
    if !(step > 0.0 && step.is_finite()) {
        return Err(ModelError::InvalidConfig(format!(
            "prox step must be positive and finite, got {step}"
        )));
    }
    Ok(())
}

macro_rules! forward_model {
    ($($ty:tt)*) => {
        impl<M: Model + ?Sized> Model for $($ty)* {
            fn meta(&self) -> &NlpMeta {
                (**self).meta()
            }
            fn eval_obj(&mut self, x: &[f64]) -> Result<f64> {
                (**self).eval_obj(x)
            }
            fn eval_grad(&mut self, x: &[f64], g: &mut [f64]) -> Result<()> {
                (**self).eval_grad(x, g)
            }
            fn eval_cons(&mut self, x: &[f64], c: &mut [f64]) -> Result<()> {
                (**self).eval_cons(x, c)
            }
            fn eval_jprod(&mut self, x: &[f64], v: &[f64], jv: &mut [f64]) -> Result<()> {
                (**self).eval_jprod(x, v, jv)
            }
            fn eval_jtprod(&mut self, x: &[f64], v: &[f64], jtv: &mut [f64]) -> Result<()> {
                (**self).eval_jtprod(x, v, jtv)
            }
            fn eval_proj(&mut self, v: &[f64], out: &mut [f64]) -> Result<()> {
                (**self).eval_proj(v, out)
            }
            fn eval_objprox(&mut self, x: &[f64], step: f64, out: &mut [f64]) -> Result<f64> {
                (**self).eval_objprox(x, step, out)
            }
            fn eval_prox(&mut self, x: &[f64], step: f64, out: &mut [f64]) -> Result<()> {
                (**self).eval_prox(x, step, out)
            }
            fn eval_objgrad(&mut self, x: &[f64], g: &mut [f64]) -> Result<f64> {
                (**self).eval_objgrad(x, g)
            }
            fn eval_objcons(&mut self, x: &[f64], c: &mut [f64]) -> Result<f64> {
                (**self).eval_objcons(x, c)
            }
            fn counters(&self) -> Option<&Counters> {
                (**self).counters()
            }
        }
    };
}

// A wrapper may borrow its base from outside code, or hold it type-erased.
forward_model!(&mut M);
forward_model!(Box<M>);
