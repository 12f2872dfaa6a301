use super::dual::Dual;
use super::float::Float;
use super::reverse::Reverse;
use super::tape::{Tape, TapeGuard, TapeThreadLocal};

/// Gradient of a scalar function `f : R^n → R` by reverse mode.
///
/// Returns `(f(x), ∇f(x))`.
///
/// ```
/// let (v, g) = nlpmodels::ad::grad(|x| x[0] * x[0] + x[1] * x[1], &[3.0_f64, 4.0]);
/// assert_eq!(v, 25.0);
/// assert_eq!(g, vec![6.0, 8.0]);
/// ```
pub fn grad<F: TapeThreadLocal>(f: impl FnOnce(&[Reverse<F>]) -> Reverse<F>, x: &[F]) -> (F, Vec<F>) {
    let n = x.len();
    let mut tape = Tape::with_capacity(n * 10);
    let inputs = record_inputs(&mut tape, x);

    let output = {
        let _guard = TapeGuard::new(&mut tape);
        f(&inputs)
    };

    let adjoints = tape.reverse_seeded(&[(output.index, F::one())]);
    (output.value, adjoints[..n].to_vec())
}

/// Jacobian-vector product by forward mode: `(f(x), J(x)·v)`.
pub fn jvp<F: Float>(
    f: impl FnOnce(&[Dual<F>]) -> Vec<Dual<F>>,
    x: &[F],
    v: &[F],
) -> (Vec<F>, Vec<F>) {
    assert_eq!(x.len(), v.len(), "x and v must have the same length");
    let inputs: Vec<Dual<F>> = x
        .iter()
        .zip(v.iter())
        .map(|(&xi, &vi)| Dual::new(xi, vi))
        .collect();
    let outputs = f(&inputs);
    let values = outputs.iter().map(|d| d.re).collect();
    let tangents = outputs.iter().map(|d| d.eps).collect();
    (values, tangents)
}

/// Vector-Jacobian product by reverse mode: `(f(x), wᵀ·J(x))`.
///
/// Outputs are paired with weights in order; outputs without a weight are
/// not seeded. Callers that need equal lengths compare `f(x).len()` with
/// `w.len()` on the returned values.
pub fn vjp<F: TapeThreadLocal>(
    f: impl FnOnce(&[Reverse<F>]) -> Vec<Reverse<F>>,
    x: &[F],
    w: &[F],
) -> (Vec<F>, Vec<F>) {
    let n = x.len();
    let mut tape = Tape::with_capacity(n * 10);
    let inputs = record_inputs(&mut tape, x);

    let outputs = {
        let _guard = TapeGuard::new(&mut tape);
        f(&inputs)
    };

    let values = outputs.iter().map(|r| r.value).collect();
    let seeds: Vec<(u32, F)> = outputs
        .iter()
        .zip(w)
        .map(|(r, &wi)| (r.index, wi))
        .collect();
    let adjoints = tape.reverse_seeded(&seeds);
    (values, adjoints[..n].to_vec())
}

fn record_inputs<F: TapeThreadLocal>(tape: &mut Tape<F>, x: &[F]) -> Vec<Reverse<F>> {
    x.iter()
        .map(|&val| Reverse::from_tape(val, tape.new_variable()))
        .collect()
}
