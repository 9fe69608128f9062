use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;

use super::job::{Job, Priority};
use super::{TimeStep, ID};

#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    id: ID,
    offset: TimeStep,   // O_i : Offset.
    wcet: TimeStep,     // C_i : Worst-case execution time.
    deadline: TimeStep, // D_i : Relative deadline.
    period: TimeStep,   // T_i : Period.
    boosted: bool,      // Jobs run ahead of every deadline-ranked job (EDF(k)).
}

impl Task {
    pub fn new(
        id: ID,
        offset: TimeStep,
        wcet: TimeStep,
        deadline: TimeStep,
        period: TimeStep,
    ) -> Self {
        Self {
            id,
            offset,
            wcet,
            deadline,
            period,
            boosted: false,
        }
    }

    /// Returns a copy of the task whose jobs take unconditional priority.
    ///
    /// Timing parameters, and therefore the utilisation, are unchanged.
    pub fn boosted(&self) -> Self {
        Self {
            boosted: true,
            ..self.clone()
        }
    }

    pub fn id(&self) -> ID {
        self.id
    }

    pub fn offset(&self) -> TimeStep {
        self.offset
    }

    pub fn wcet(&self) -> TimeStep {
        self.wcet
    }

    pub fn deadline(&self) -> TimeStep {
        self.deadline
    }

    pub fn period(&self) -> TimeStep {
        self.period
    }

    pub fn is_boosted(&self) -> bool {
        self.boosted
    }

    /// Exact `C / T`.
    pub fn utilisation(&self) -> RBig {
        RBig::from_parts(IBig::from(self.wcet), UBig::from(self.period))
    }

    pub fn has_implicit_deadline(&self) -> bool {
        self.deadline == self.period
    }

    /// Releases the job due at `t`, if `t` is one of the task's release instants.
    pub fn spawn_job(&self, t: TimeStep) -> Option<Job> {
        // Not yet released
        if t < self.offset {
            return None;
        }
        // Not a time at which a job should be released
        if (t - self.offset) % self.period != 0 {
            return None;
        }
        let priority = if self.boosted {
            Priority::Boosted
        } else {
            Priority::Deadline(t + self.deadline)
        };
        Some(Job::new(
            ((t - self.offset) / self.period + 1) as ID,
            self.id,
            t,
            self.wcet,
            t + self.deadline,
            priority,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_on_period_boundaries_after_offset() {
        let task = Task::new(1, 3, 1, 4, 4);
        assert!(task.spawn_job(0).is_none());
        assert!(task.spawn_job(5).is_none());

        let first = task.spawn_job(3).unwrap();
        assert_eq!(first.id(), 1);
        assert_eq!(first.release_time(), 3);
        assert_eq!(first.absolute_deadline(), 7);

        let second = task.spawn_job(7).unwrap();
        assert_eq!(second.id(), 2);
        assert_eq!(second.remaining_time(), 1);
    }

    #[test]
    fn boosting_keeps_utilisation() {
        let task = Task::new(1, 0, 3, 4, 4);
        let boosted = task.boosted();

        assert!(!task.is_boosted());
        assert!(boosted.is_boosted());
        assert_eq!(task.utilisation(), boosted.utilisation());
        assert_eq!(task.utilisation(), RBig::from_parts(IBig::from(3u8), UBig::from(4u8)));
        assert_eq!(boosted.spawn_job(0).unwrap().priority(), Priority::Boosted);
        assert_eq!(boosted.spawn_job(0).unwrap().absolute_deadline(), 4);
    }
}
