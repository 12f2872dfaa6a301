//! In-memory record of how a solver run ended.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Why a solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Status {
    /// First-order stationary point found.
    FirstOrder,
    /// Solved to within acceptable tolerances.
    Acceptable,
    /// Problem may be infeasible.
    Infeasible,
    /// Residual below tolerance.
    SmallResidual,
    /// Step below tolerance.
    SmallStep,
    /// No further progress.
    Stalled,
    /// Objective below the unboundedness threshold.
    Unbounded,
    /// Iteration limit reached.
    MaxIter,
    /// Evaluation limit reached.
    MaxEval,
    /// Time limit reached.
    MaxTime,
    /// Negative predicted reduction.
    NegPred,
    /// Not a descent direction.
    NotDesc,
    /// Stopped by the user.
    User,
    /// An error interrupted the solver.
    Exception,
    #[default]
    Unknown,
}

impl Status {
    pub const ALL: [Status; 15] = [
        Status::FirstOrder,
        Status::Acceptable,
        Status::Infeasible,
        Status::SmallResidual,
        Status::SmallStep,
        Status::Stalled,
        Status::Unbounded,
        Status::MaxIter,
        Status::MaxEval,
        Status::MaxTime,
        Status::NegPred,
        Status::NotDesc,
        Status::User,
        Status::Exception,
        Status::Unknown,
    ];

    /// Short snake-case name, the form accepted by [`Status::from_str`].
    pub fn name(&self) -> &'static str {
        match self {
            Status::FirstOrder => "first_order",
            Status::Acceptable => "acceptable",
            Status::Infeasible => "infeasible",
            Status::SmallResidual => "small_residual",
            Status::SmallStep => "small_step",
            Status::Stalled => "stalled",
            Status::Unbounded => "unbounded",
            Status::MaxIter => "max_iter",
            Status::MaxEval => "max_eval",
            Status::MaxTime => "max_time",
            Status::NegPred => "neg_pred",
            Status::NotDesc => "not_desc",
            Status::User => "user",
            Status::Exception => "exception",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Status::FirstOrder => "first-order stationary",
            Status::Acceptable => "solved to within acceptable tolerances",
            Status::Infeasible => "problem may be infeasible",
            Status::SmallResidual => "small residual",
            Status::SmallStep => "step too small",
            Status::Stalled => "stalled",
            Status::Unbounded => "objective function may be unbounded from below",
            Status::MaxIter => "maximum iteration",
            Status::MaxEval => "maximum number of function evaluations",
            Status::MaxTime => "maximum elapsed time",
            Status::NegPred => "negative predicted reduction",
            Status::NotDesc => "not a descent direction",
            Status::User => "user-requested stop",
            Status::Exception => "unhandled exception",
            Status::Unknown => "unknown",
        };
        f.write_str(msg)
    }
}

impl FromStr for Status {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .iter()
            .copied()
            .find(|status| status.name() == s)
            .ok_or_else(|| ModelError::UnknownStatus(s.to_string()))
    }
}

/// A solver-specific diagnostic value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SpecificValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Vector(Vec<f64>),
    Text(String),
}

impl From<bool> for SpecificValue {
    fn from(v: bool) -> Self {
        SpecificValue::Bool(v)
    }
}

impl From<i64> for SpecificValue {
    fn from(v: i64) -> Self {
        SpecificValue::Int(v)
    }
}

impl From<f64> for SpecificValue {
    fn from(v: f64) -> Self {
        SpecificValue::Float(v)
    }
}

impl From<Vec<f64>> for SpecificValue {
    fn from(v: Vec<f64>) -> Self {
        SpecificValue::Vector(v)
    }
}

impl From<&str> for SpecificValue {
    fn from(v: &str) -> Self {
        SpecificValue::Text(v.to_string())
    }
}

/// Result record of a solver run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverStats {
    pub status: Status,
    /// Final primal point.
    pub solution: Option<Vec<f64>>,
    /// Final dual point.
    pub multipliers: Option<Vec<f64>>,
    pub objective: Option<f64>,
    /// Optimality residual norm.
    pub dual_feas: Option<f64>,
    /// Feasibility residual norm.
    pub primal_feas: Option<f64>,
    pub iter: Option<usize>,
    /// Seconds.
    pub elapsed_time: Option<f64>,
    pub solver_name: Option<String>,
    pub solver_specific: BTreeMap<String, SpecificValue>,
}

impl SolverStats {
    pub fn new(status: Status) -> Self {
        SolverStats {
            status,
            ..Default::default()
        }
    }

    /// Build from a status name, failing with [`ModelError::UnknownStatus`]
    /// for names outside the enumeration.
    pub fn from_status_name(name: &str) -> Result<Self, ModelError> {
        Ok(SolverStats::new(name.parse()?))
    }

    pub fn with_solution(mut self, x: Vec<f64>) -> Self {
        self.solution = Some(x);
        self
    }

    pub fn with_multipliers(mut self, y: Vec<f64>) -> Self {
        self.multipliers = Some(y);
        self
    }

    pub fn with_objective(mut self, f: f64) -> Self {
        self.objective = Some(f);
        self
    }

    pub fn with_residuals(mut self, dual_feas: f64, primal_feas: f64) -> Self {
        self.dual_feas = Some(dual_feas);
        self.primal_feas = Some(primal_feas);
        self
    }

    pub fn with_iter(mut self, iter: usize) -> Self {
        self.iter = Some(iter);
        self
    }

    pub fn with_elapsed_time(mut self, seconds: f64) -> Self {
        self.elapsed_time = Some(seconds);
        self
    }

    pub fn with_solver_name(mut self, name: impl Into<String>) -> Self {
        self.solver_name = Some(name.into());
        self
    }

    /// Record a solver-specific value, replacing any previous one.
    pub fn set_specific(&mut self, key: impl Into<String>, value: impl Into<SpecificValue>) {
        self.solver_specific.insert(key.into(), value.into());
    }
}

impl fmt::Display for SolverStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Solver stats")?;
        if let Some(name) = &self.solver_name {
            write!(f, " ({name})")?;
        }
        writeln!(f)?;
        writeln!(f, "  status: {}", self.status)?;
        if let Some(v) = self.objective {
            writeln!(f, "  objective value: {v:e}")?;
        }
        if let Some(v) = self.primal_feas {
            writeln!(f, "  primal feasibility: {v:e}")?;
        }
        if let Some(v) = self.dual_feas {
            writeln!(f, "  dual feasibility: {v:e}")?;
        }
        if let Some(v) = self.iter {
            writeln!(f, "  iterations: {v}")?;
        }
        if let Some(v) = self.elapsed_time {
            writeln!(f, "  elapsed time: {v:.3}s")?;
        }
        for (key, value) in &self.solver_specific {
            writeln!(f, "  {key}: {value:?}")?;
        }
        Ok(())
    }
}
