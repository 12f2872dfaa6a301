/// Evaluation counts kept by leaf models.
///
/// Reformulations report the counters of the leaf they wrap, so a solver can
/// read the true number of backend calls at any composition depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub obj: usize,
    pub grad: usize,
    pub cons: usize,
    pub jprod: usize,
    pub jtprod: usize,
    pub proj: usize,
    pub prox: usize,
}

impl Counters {
    /// Total number of evaluations of any kind.
    pub fn sum(&self) -> usize {
        self.obj + self.grad + self.cons + self.jprod + self.jtprod + self.proj + self.prox
    }

    pub fn reset(&mut self) {
        *self = Counters::default();
    }
}
