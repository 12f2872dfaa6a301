//! Central-difference checks of a model's derivatives.

use crate::error::{check_dim, ModelError, Result};
use crate::model::Model;

/// An entry where the analytic derivative and the finite difference disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct Discrepancy {
    /// Constraint index (`0` for the gradient).
    pub row: usize,
    /// Variable index.
    pub col: usize,
    pub analytic: f64,
    pub numeric: f64,
}

/// Compare `grad(x)` with central differences of `obj` using step `h`.
///
/// An entry is reported when `|analytic − numeric| > tol·max(1, |numeric|)`.
pub fn gradient_check<M: Model + ?Sized>(
    model: &mut M,
    x: &[f64],
    h: f64,
    tol: f64,
) -> Result<Vec<Discrepancy>> {
    check_step(h)?;
    let g = model.grad_vec(x)?;
    let mut xp = x.to_vec();
    let mut bad = Vec::new();
    for j in 0..x.len() {
        xp[j] = x[j] + h;
        let fp = model.obj(&xp)?;
        xp[j] = x[j] - h;
        let fm = model.obj(&xp)?;
        xp[j] = x[j];
        let numeric = (fp - fm) / (2.0 * h);
        if (g[j] - numeric).abs() > tol * numeric.abs().max(1.0) {
            bad.push(Discrepancy {
                row: 0,
                col: j,
                analytic: g[j],
                numeric,
            });
        }
    }
    Ok(bad)
}

/// Compare the columns `jprod(x, e_j)` with central differences of `cons`.
pub fn jacobian_check<M: Model + ?Sized>(
    model: &mut M,
    x: &[f64],
    h: f64,
    tol: f64,
) -> Result<Vec<Discrepancy>> {
    check_step(h)?;
    check_dim("x", model.nvar(), x.len())?;
    let n = x.len();
    let mut e = vec![0.0; n];
    let mut xp = x.to_vec();
    let mut bad = Vec::new();
    for j in 0..n {
        e[j] = 1.0;
        let col = model.jprod_vec(x, &e)?;
        e[j] = 0.0;
        xp[j] = x[j] + h;
        let cp = model.cons_vec(&xp)?;
        xp[j] = x[j] - h;
        let cm = model.cons_vec(&xp)?;
        xp[j] = x[j];
        for i in 0..col.len() {
            let numeric = (cp[i] - cm[i]) / (2.0 * h);
            if (col[i] - numeric).abs() > tol * numeric.abs().max(1.0) {
                bad.push(Discrepancy {
                    row: i,
                    col: j,
                    analytic: col[i],
                    numeric,
                });
            }
        }
    }
    Ok(bad)
}

fn check_step(h: f64) -> Result<()> {
    if h > 0.0 && h.is_finite() {
        Ok(())
    } else {
        Err(ModelError::InvalidConfig(format!(
            "finite-difference step must be positive, got {h}"
        )))
    }
}
