#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use nlpmodels::ad::Scalar;
use nlpmodels::{NlpBackend, Result, ScalarFunction, VectorFunction};

// ─── AD test functions ─────────────────────────────────────────────────────

/// f(x) = Σ x_i²
pub struct SumSquares;

impl ScalarFunction for SumSquares {
    fn eval<T: Scalar>(&self, x: &[T]) -> T {
        x.iter().fold(T::zero(), |acc, &xi| acc + xi * xi)
    }
}

/// Rosenbrock chain: Σ (1 − x_i)² + 100 (x_{i+1} − x_i²)²
pub struct Rosenbrock;

impl ScalarFunction for Rosenbrock {
    fn eval<T: Scalar>(&self, x: &[T]) -> T {
        let mut sum = T::zero();
        for i in 0..x.len() - 1 {
            let t1 = T::one() - x[i];
            let t2 = x[i + 1] - x[i] * x[i];
            sum = sum + t1 * t1 + t2 * t2 * 100.0;
        }
        sum
    }
}

/// c(x) = [x0² + x1² − 1, x0·x1 + sin(x2), exp(x0) − x2]
pub struct CurvedCons;

impl VectorFunction for CurvedCons {
    fn eval<T: Scalar>(&self, x: &[T]) -> Vec<T> {
        vec![
            x[0] * x[0] + x[1] * x[1] - 1.0,
            x[0] * x[1] + x[2].sin(),
            x[0].exp() - x[2],
        ]
    }
}

/// Analytic Jacobian of [`CurvedCons`].
pub fn curved_jacobian(x: &[f64]) -> Vec<Vec<f64>> {
    vec![
        vec![2.0 * x[0], 2.0 * x[1], 0.0],
        vec![x[1], x[0], x[2].cos()],
        vec![x[0].exp(), 0.0, -1.0],
    ]
}

pub fn mat_vec(a: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    a.iter()
        .map(|row| row.iter().zip(v).map(|(r, x)| r * x).sum())
        .collect()
}

pub fn mat_t_vec(a: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    let n = a.first().map_or(0, |r| r.len());
    let mut out = vec![0.0; n];
    for (row, vi) in a.iter().zip(v) {
        for (o, r) in out.iter_mut().zip(row) {
            *o += r * vi;
        }
    }
    out
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

// ─── External backend ──────────────────────────────────────────────────────

/// Hand-written backend on three variables:
///
/// f(x) = ‖x‖²,  c(x) = [x0 + x1 + x2, x0·x1]  (or no constraints).
///
/// Counts how many instances were dropped through `released`.
pub struct ToyBackend {
    pub lvar: Vec<f64>,
    pub uvar: Vec<f64>,
    pub lcon: Vec<f64>,
    pub ucon: Vec<f64>,
    pub x0: Vec<f64>,
    pub released: Rc<Cell<usize>>,
    constrained: bool,
}

impl ToyBackend {
    /// Box `[-1, 1]³`, constraints `x0 + x1 + x2 ∈ [0, 1]`, `x0·x1 ∈ [-∞, 0.25]`.
    pub fn new() -> Self {
        ToyBackend::build(true, vec![0.0, f64::NEG_INFINITY], vec![1.0, 0.25])
    }

    /// Same objective and box, no constraints.
    pub fn unconstrained() -> Self {
        ToyBackend::build(false, Vec::new(), Vec::new())
    }

    /// Constraint set replaced by the box `[lcon, ucon]`.
    pub fn with_con_bounds(lcon: Vec<f64>, ucon: Vec<f64>) -> Self {
        ToyBackend::build(true, lcon, ucon)
    }

    fn build(constrained: bool, lcon: Vec<f64>, ucon: Vec<f64>) -> Self {
        ToyBackend {
            lvar: vec![-1.0; 3],
            uvar: vec![1.0; 3],
            lcon,
            ucon,
            x0: vec![0.5, 0.5, 0.5],
            released: Rc::new(Cell::new(0)),
            constrained,
        }
    }

    pub fn jacobian(&self, x: &[f64]) -> Vec<Vec<f64>> {
        if !self.constrained {
            return Vec::new();
        }
        vec![vec![1.0, 1.0, 1.0], vec![x[1], x[0], 0.0]]
    }
}

impl Drop for ToyBackend {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

impl NlpBackend for ToyBackend {
    fn nvar(&self) -> usize {
        3
    }

    fn ncon(&self) -> usize {
        if self.constrained {
            2
        } else {
            0
        }
    }

    fn x0(&self) -> Vec<f64> {
        self.x0.clone()
    }

    fn name(&self) -> String {
        "toy".to_string()
    }

    fn obj(&mut self, x: &[f64]) -> Result<f64> {
        Ok(dot(x, x))
    }

    fn grad(&mut self, x: &[f64], g: &mut [f64]) -> Result<()> {
        for (gi, xi) in g.iter_mut().zip(x) {
            *gi = 2.0 * xi;
        }
        Ok(())
    }

    fn cons(&mut self, x: &[f64], c: &mut [f64]) -> Result<()> {
        if self.constrained {
            c[0] = x[0] + x[1] + x[2];
            c[1] = x[0] * x[1];
        }
        Ok(())
    }

    fn jprod(&mut self, x: &[f64], v: &[f64], jv: &mut [f64]) -> Result<()> {
        let jv_full = mat_vec(&self.jacobian(x), v);
        jv.copy_from_slice(&jv_full);
        Ok(())
    }

    fn jtprod(&mut self, x: &[f64], v: &[f64], jtv: &mut [f64]) -> Result<()> {
        if !self.constrained {
            jtv.fill(0.0);
            return Ok(());
        }
        jtv.copy_from_slice(&mat_t_vec(&self.jacobian(x), v));
        Ok(())
    }

    fn lvar(&self) -> &[f64] {
        &self.lvar
    }

    fn uvar(&self) -> &[f64] {
        &self.uvar
    }

    fn lcon(&self) -> &[f64] {
        &self.lcon
    }

    fn ucon(&self) -> &[f64] {
        &self.ucon
    }
}
