use std::collections::HashSet;

use dashu::rational::RBig;

use super::{Job, Task, TimeStep, ID};
use crate::utils::{multiple_lcm, SchedulingError, TaskSetError};

/// Ordered collection of tasks with unique ids and positive `C`, `D`, `T`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    /// Validates `tasks` and wraps them, keeping their order.
    pub fn try_new(tasks: Vec<Task>) -> Result<Self, TaskSetError> {
        let mut seen = HashSet::new();
        for task in tasks.iter() {
            for (field, value) in [
                ("computation time", task.wcet()),
                ("deadline", task.deadline()),
                ("period", task.period()),
            ] {
                if value == 0 {
                    return Err(TaskSetError::NonPositiveField {
                        task: task.id(),
                        field,
                    });
                }
            }
            if !seen.insert(task.id()) {
                return Err(TaskSetError::DuplicateId(task.id()));
            }
        }
        Ok(Self { tasks })
    }

    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn get_tasks(&self) -> &Vec<Task> {
        &self.tasks
    }

    pub fn get_task_by_id(&self, id: ID) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Appends an already validated task; ids must stay unique.
    pub(crate) fn add_task(&mut self, task: Task) {
        debug_assert!(self.get_task_by_id(task.id()).is_none());
        self.tasks.push(task);
    }

    /// Tasks whose id is in `ids`, in this set's order.
    pub fn subset(&self, ids: &[ID]) -> Self {
        Self {
            tasks: self
                .tasks
                .iter()
                .filter(|t| ids.contains(&t.id()))
                .cloned()
                .collect(),
        }
    }

    /// Copy of the set where the tasks in `ids` are boosted.
    pub fn with_boosted(&self, ids: &[ID]) -> Self {
        Self {
            tasks: self
                .tasks
                .iter()
                .map(|t| if ids.contains(&t.id()) { t.boosted() } else { t.clone() })
                .collect(),
        }
    }

    pub fn utilisation(&self) -> RBig {
        self.tasks
            .iter()
            .fold(RBig::ZERO, |sum, t| sum + t.utilisation())
    }

    /// Largest task utilisation, zero for an empty set.
    pub fn max_utilisation(&self) -> RBig {
        self.tasks
            .iter()
            .map(|t| t.utilisation())
            .max()
            .unwrap_or(RBig::ZERO)
    }

    /// `(utilisation, id)` pairs, heaviest first, ties by ascending id.
    pub fn utilisations_desc(&self) -> Vec<(RBig, ID)> {
        let mut pairs: Vec<(RBig, ID)> = self
            .tasks
            .iter()
            .map(|t| (t.utilisation(), t.id()))
            .collect();
        pairs.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        pairs
    }

    pub fn has_implicit_deadlines(&self) -> bool {
        self.tasks.iter().all(|t| t.has_implicit_deadline())
    }

    pub fn has_constrained_deadlines(&self) -> bool {
        self.tasks.iter().all(|t| t.deadline() <= t.period())
    }

    /// All tasks release their first job at the same instant.
    pub fn is_synchronous(&self) -> bool {
        self.tasks.windows(2).all(|w| w[0].offset() == w[1].offset())
    }

    /// Jobs released at `t`, in task order.
    pub fn release_jobs(&self, t: TimeStep) -> Vec<Job> {
        self.tasks.iter().filter_map(|task| task.spawn_job(t)).collect()
    }

    pub fn hyperperiod(&self) -> Result<TimeStep, SchedulingError> {
        multiple_lcm(&self.tasks.iter().map(|t| t.period()).collect::<Vec<_>>())
    }

    /// Inclusive simulation window `[lower, upper]`.
    ///
    /// Synchronous constrained-deadline sets repeat after one hyperperiod once
    /// every deadline up to it has been met: `[O, O + P]`. Anything else is
    /// simulated over `[0, O_max + 2P + D_max]`.
    pub fn feasibility_interval(&self) -> Result<(TimeStep, TimeStep), SchedulingError> {
        let hyperperiod = self.hyperperiod()?;

        if self.is_synchronous() && self.has_constrained_deadlines() {
            let offset = self.tasks.first().map_or(0, |t| t.offset());
            let upper = offset
                .checked_add(hyperperiod)
                .ok_or(SchedulingError::IntervalOverflow {
                    hyperperiod,
                    extra: offset,
                })?;
            return Ok((offset, upper));
        }

        let max_offset = self.tasks.iter().map(|t| t.offset()).max().unwrap_or(0);
        let max_deadline = self.tasks.iter().map(|t| t.deadline()).max().unwrap_or(0);
        let upper = hyperperiod
            .checked_mul(2)
            .and_then(|p| p.checked_add(max_offset))
            .and_then(|p| p.checked_add(max_deadline))
            .ok_or(SchedulingError::IntervalOverflow {
                hyperperiod,
                extra: max_offset.saturating_add(max_deadline),
            })?;
        Ok((0, upper))
    }
}
