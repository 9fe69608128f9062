use thiserror::Error;

use crate::models::{TimeStep, ID};

/// Reasons a list of tasks is rejected before any scheduling logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskSetError {
    /// Computation time, relative deadline and period must all be positive.
    #[error("task {task}: {field} must be greater than 0")]
    NonPositiveField { task: ID, field: &'static str },

    #[error("task id {0} appears more than once")]
    DuplicateId(ID),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    /// A job still had work left when its absolute deadline was reached.
    #[error("job {job} of task {task} missed its deadline at t = {t}")]
    DeadlineMissed { task: ID, job: ID, t: TimeStep },

    /// The hyperperiod does not fit in a `TimeStep`.
    #[error("hyperperiod overflow computing lcm({a}, {b})")]
    HyperperiodOverflow { a: TimeStep, b: TimeStep },

    /// The end of the feasibility interval does not fit in a `TimeStep`.
    #[error("feasibility interval overflow: hyperperiod {hyperperiod} plus {extra}")]
    IntervalOverflow { hyperperiod: TimeStep, extra: TimeStep },

    /// EDF(k) needs `1 <= k <= n`.
    #[error("EDF(k) needs 1 <= k <= {tasks}, got k = {k}")]
    InvalidK { k: usize, tasks: usize },
}

/// Unknown command-line tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown heuristic '{0}' (valid: ff, nf, bf, wf)")]
    Heuristic(String),

    #[error("unknown sorting order '{0}' (valid: iu, du)")]
    Sorting(String),

    #[error("invalid version '{0}' (valid: partitioned, global, or an integer k >= 1)")]
    Version(String),
}
