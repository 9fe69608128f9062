use std::cmp::Ordering;

use super::{TimeStep, ID};

/// Rank of a job under EDF.
///
/// `Boosted` orders before every finite deadline, which is how EDF(k) gives
/// its heaviest tasks an absolute deadline of minus infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Boosted,
    Deadline(TimeStep),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    id: ID,                         // Index of the job within its task, starting at 1
    task_id: ID,                    // Identifier for the associated task
    release_time: TimeStep,         // Instant the job was released
    remaining_time: TimeStep,       // Remaining execution time for the job
    absolute_deadline: TimeStep,    // Absolute deadline for the job (including offsets)
    priority: Priority,             // Ranking key used by the EDF policies
}

impl Job {
    pub fn new(
        id: ID,
        task_id: ID,
        release_time: TimeStep,
        remaining_time: TimeStep,
        absolute_deadline: TimeStep,
        priority: Priority,
    ) -> Self {
        Self {
            id,
            task_id,
            release_time,
            remaining_time,
            absolute_deadline,
            priority,
        }
    }

    pub fn id(&self) -> ID {
        self.id
    }

    pub fn task_id(&self) -> ID {
        self.task_id
    }

    /// Identifies the job across the whole simulation.
    pub fn key(&self) -> (ID, ID) {
        (self.task_id, self.id)
    }

    pub fn release_time(&self) -> TimeStep {
        self.release_time
    }

    pub fn remaining_time(&self) -> TimeStep {
        self.remaining_time
    }

    pub fn absolute_deadline(&self) -> TimeStep {
        self.absolute_deadline
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// The job has had `[release, deadline)` to run; reaching the deadline with
    /// work left is a miss, whatever its priority.
    pub fn deadline_missed(&self, t: TimeStep) -> bool {
        self.remaining_time > 0 && t >= self.absolute_deadline
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_time == 0
    }

    /// Executes the job for one time unit.
    pub fn schedule(&mut self) {
        assert!(
            self.remaining_time > 0,
            "job {} of task {} executed after completion",
            self.id,
            self.task_id
        );
        self.remaining_time -= 1;
    }

    /// EDF order: priority first, then task id and job index for determinism.
    pub fn edf_cmp(&self, other: &Job) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then(self.task_id.cmp(&other.task_id))
            .then(self.id.cmp(&other.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boosted_ranks_before_any_deadline() {
        assert!(Priority::Boosted < Priority::Deadline(0));
        assert!(Priority::Deadline(3) < Priority::Deadline(4));
    }

    #[test]
    fn misses_when_deadline_reached_with_work_left() {
        let mut job = Job::new(1, 1, 0, 2, 2, Priority::Deadline(2));
        assert!(!job.deadline_missed(1));
        assert!(job.deadline_missed(2));

        job.schedule();
        job.schedule();
        assert!(job.is_complete());
        assert!(!job.deadline_missed(5));
    }

    #[test]
    fn ties_broken_by_task_then_job() {
        let a = Job::new(2, 1, 0, 1, 5, Priority::Deadline(5));
        let b = Job::new(1, 2, 0, 1, 5, Priority::Deadline(5));
        assert_eq!(a.edf_cmp(&b), Ordering::Less);
        assert_eq!(b.edf_cmp(&a), Ordering::Greater);
    }

    #[test]
    #[should_panic]
    fn executing_a_completed_job_panics() {
        let mut job = Job::new(1, 1, 0, 1, 2, Priority::Deadline(2));
        job.schedule();
        job.schedule();
    }
}
