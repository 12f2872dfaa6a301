//! Two-stack tape for reverse-mode AD.
//!
//! Each recorded statement stores the partial derivatives of its result with
//! respect to its operands. The reverse sweep is a single multiply-accumulate
//! loop that skips statements whose adjoint is zero.

use std::cell::Cell;

use super::float::Float;

/// Sentinel index for values not recorded on the tape.
pub const CONSTANT: u32 = u32::MAX;

/// A recorded operation. Its result lives at `lhs_index`; its operand
/// multipliers span `[prev.end_plus_one .. self.end_plus_one)`.
#[derive(Clone, Copy, Debug)]
struct Statement {
    lhs_index: u32,
    end_plus_one: u32,
}

pub struct Tape<F: Float> {
    statements: Vec<Statement>,
    multipliers: Vec<F>,
    indices: Vec<u32>,
    num_variables: u32,
}

impl<F: Float> Default for Tape<F> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<F: Float> Tape<F> {
    /// Create a tape with room for roughly `est_ops` operations.
    pub fn with_capacity(est_ops: usize) -> Self {
        let mut statements = Vec::with_capacity(est_ops + 1);
        // Sentinel so that `statements[i - 1]` is valid for every recorded statement.
        statements.push(Statement {
            lhs_index: 0,
            end_plus_one: 0,
        });
        Tape {
            statements,
            multipliers: Vec::with_capacity(est_ops * 2),
            indices: Vec::with_capacity(est_ops * 2),
            num_variables: 0,
        }
    }

    /// Register an independent variable and return its index.
    ///
    /// Inputs get no statement, so their adjoints survive the sweep.
    #[inline]
    pub fn new_variable(&mut self) -> u32 {
        let idx = self.num_variables;
        self.num_variables += 1;
        idx
    }

    /// Number of indices handed out so far (inputs and intermediates).
    pub fn num_variables(&self) -> usize {
        self.num_variables as usize
    }

    /// Record `result = f(operand)` with `multiplier = df/d(operand)`.
    #[inline]
    pub fn push_unary(&mut self, operand_idx: u32, multiplier: F) -> u32 {
        self.push(&[(operand_idx, multiplier)])
    }

    /// Record a binary operation with precomputed partials.
    #[inline]
    pub fn push_binary(&mut self, lhs_idx: u32, lhs_mult: F, rhs_idx: u32, rhs_mult: F) -> u32 {
        self.push(&[(lhs_idx, lhs_mult), (rhs_idx, rhs_mult)])
    }

    fn push(&mut self, operands: &[(u32, F)]) -> u32 {
        let result_idx = self.num_variables;
        self.num_variables += 1;
        for &(idx, mult) in operands {
            if idx != CONSTANT {
                self.multipliers.push(mult);
                self.indices.push(idx);
            }
        }
        self.statements.push(Statement {
            lhs_index: result_idx,
            end_plus_one: self.multipliers.len() as u32,
        });
        result_idx
    }

    /// Run the reverse sweep from the given `(index, seed)` pairs and return
    /// the full adjoint vector. Constant seeds are ignored.
    pub fn reverse_seeded(&self, seeds: &[(u32, F)]) -> Vec<F> {
        let mut adjoints = vec![F::zero(); self.num_variables as usize];
        for &(idx, seed) in seeds {
            if idx != CONSTANT {
                adjoints[idx as usize] = adjoints[idx as usize] + seed;
            }
        }

        for i in (1..self.statements.len()).rev() {
            let stmt = self.statements[i];
            let a = adjoints[stmt.lhs_index as usize];
            if a == F::zero() {
                continue;
            }
            adjoints[stmt.lhs_index as usize] = F::zero();
            let start = self.statements[i - 1].end_plus_one as usize;
            let end = stmt.end_plus_one as usize;
            for j in start..end {
                let k = self.indices[j] as usize;
                adjoints[k] = adjoints[k] + self.multipliers[j] * a;
            }
        }
        adjoints
    }
}

thread_local! {
    static TAPE_F64: Cell<*mut Tape<f64>> = const { Cell::new(std::ptr::null_mut()) };
}

/// Selects the thread-local tape slot for a float type.
pub trait TapeThreadLocal: Float {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut Tape<Self>>>;
}

impl TapeThreadLocal for f64 {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut Tape<Self>>> {
        &TAPE_F64
    }
}

/// Run `f` against the active tape of the current thread.
///
/// Panics when no tape is active; tracked `Reverse` values are only created
/// inside [`super::grad`], which always installs one.
#[inline]
pub fn with_active_tape<F: TapeThreadLocal, R>(f: impl FnOnce(&mut Tape<F>) -> R) -> R {
    F::cell().with(|cell| {
        let ptr = cell.get();
        assert!(!ptr.is_null(), "no active tape: Reverse values escaped grad()");
        // SAFETY: `TapeGuard` keeps the pointee alive for the whole scope in
        // which the pointer is installed, and the thread-local makes this the
        // only live mutable access.
        let tape = unsafe { &mut *ptr };
        f(tape)
    })
}

/// RAII guard installing a tape as the thread-local active tape; restores
/// the previous one on drop.
pub struct TapeGuard<F: TapeThreadLocal> {
    prev: *mut Tape<F>,
}

impl<F: TapeThreadLocal> TapeGuard<F> {
    pub fn new(tape: &mut Tape<F>) -> Self {
        let prev = F::cell().with(|cell| cell.replace(tape as *mut Tape<F>));
        TapeGuard { prev }
    }
}

impl<F: TapeThreadLocal> Drop for TapeGuard<F> {
    fn drop(&mut self) {
        F::cell().with(|cell| cell.set(self.prev));
    }
}
