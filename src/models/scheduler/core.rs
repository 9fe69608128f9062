use crate::{TimeStep, ID};

/// A processor slot in the simulation, holding at most one job at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Core {
    id: ID,                   // Index of the processor, starting at 0
    job: Option<(ID, ID)>,    // (task id, job id) of the job currently running
    busy_time: TimeStep,      // Ticks spent executing a job
}

impl Core {
    pub fn new(id: ID) -> Self {
        Self {
            id,
            job: None,
            busy_time: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.job.is_none()
    }

    /// Key of the job running on the core, if any.
    pub fn current_job(&self) -> Option<(ID, ID)> {
        self.job
    }

    pub fn assign(&mut self, key: (ID, ID)) {
        assert!(self.is_idle(), "core {} already runs a job", self.id);
        self.job = Some(key);
    }

    /// Vacates the core and returns the job it was running.
    pub fn release(&mut self) -> Option<(ID, ID)> {
        self.job.take()
    }

    pub fn tick(&mut self) {
        if self.job.is_some() {
            self.busy_time += 1;
        }
    }

    pub fn busy_time(&self) -> TimeStep {
        self.busy_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_and_release() {
        let mut core = Core::new(0);
        assert!(core.is_idle());

        core.assign((1, 1));
        core.tick();
        assert_eq!(core.current_job(), Some((1, 1)));
        assert_eq!(core.release(), Some((1, 1)));
        core.tick();

        assert!(core.is_idle());
        assert_eq!(core.busy_time(), 1);
    }

    #[test]
    #[should_panic]
    fn double_assignment_panics() {
        let mut core = Core::new(0);
        core.assign((1, 1));
        core.assign((2, 1));
    }
}
