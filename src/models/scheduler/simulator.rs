use std::collections::HashMap;

use tracing::debug;

use super::core::Core;
use super::policy::Policy;
use crate::constants::SimulationState;
use crate::utils::SchedulingError;
use crate::{Job, TaskSet, TimeStep, ID};

/// Counters gathered while simulating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationStats {
    pub ticks: TimeStep,
    /// Jobs taken off a processor before completing.
    pub preemptions: usize,
    /// Jobs resuming on a different processor than the one they last ran on.
    pub migrations: usize,
}

/// Discrete-time simulation of a task set on identical processors.
///
/// Every tick releases the jobs due, checks deadlines, frees the processors
/// whose job completed, asks the policy which jobs run, and executes each of
/// them for one time unit.
#[derive(Debug)]
pub struct Simulator<P: Policy> {
    task_set: TaskSet,
    policy: P,
    cores: Vec<Core>,
    queue: Vec<Job>,
    current_time: TimeStep,
    max_time: TimeStep,
    last_core: HashMap<(ID, ID), usize>,
    stats: SimulationStats,
    miss: Option<SchedulingError>,
    state: SimulationState,
}

impl<P: Policy> Simulator<P> {
    /// Simulates `task_set` on `num_cores` processors over the inclusive
    /// window `[lower, upper]`.
    pub fn new(
        task_set: TaskSet,
        policy: P,
        num_cores: usize,
        (lower, upper): (TimeStep, TimeStep),
    ) -> Self {
        Self {
            task_set,
            policy,
            cores: (0..num_cores).map(|id| Core::new(id as ID)).collect(),
            queue: Vec::new(),
            current_time: lower,
            max_time: upper,
            last_core: HashMap::new(),
            stats: SimulationStats::default(),
            miss: None,
            state: if lower > upper {
                SimulationState::Complete
            } else {
                SimulationState::Running
            },
        }
    }

    pub fn current_time(&self) -> TimeStep {
        self.current_time
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    /// The deadline miss that ended the run, if any.
    pub fn miss(&self) -> Option<&SchedulingError> {
        self.miss.as_ref()
    }

    pub fn cores(&self) -> &[Core] {
        &self.cores
    }

    /// Jobs released and not yet removed after completion.
    pub fn queue(&self) -> &[Job] {
        &self.queue
    }

    /// Jobs currently bound to a processor.
    pub fn running_jobs(&self) -> Vec<&Job> {
        self.cores
            .iter()
            .filter_map(|core| core.current_job())
            .filter_map(|key| self.queue.iter().find(|job| job.key() == key))
            .collect()
    }

    /// Simulates one tick and returns the resulting state.
    pub fn step(&mut self) -> SimulationState {
        if self.state != SimulationState::Running {
            return self.state;
        }
        let t = self.current_time;

        // 1. Release
        self.queue.extend(self.task_set.release_jobs(t));

        // 2. Deadlines
        if let Some(job) = self.queue.iter().find(|job| job.deadline_missed(t)) {
            debug!(t, task = job.task_id(), job = job.id(), "deadline missed");
            self.miss = Some(SchedulingError::DeadlineMissed {
                task: job.task_id(),
                job: job.id(),
                t,
            });
            self.state = SimulationState::Missed;
            return self.state;
        }

        // 3. Free the processors whose job completed
        for core in self.cores.iter_mut() {
            if let Some(key) = core.current_job() {
                let done = self
                    .queue
                    .iter()
                    .find(|job| job.key() == key)
                    .map_or(true, |job| job.is_complete());
                if done {
                    core.release();
                }
            }
        }
        let last_core = &mut self.last_core;
        self.queue.retain(|job| {
            if job.is_complete() {
                last_core.remove(&job.key());
            }
            !job.is_complete()
        });

        // 4. Select
        let elected: Vec<(ID, ID)> = self
            .policy
            .elect(&self.queue, self.cores.len())
            .into_iter()
            .map(|i| self.queue[i].key())
            .collect();
        assert!(
            elected.len() <= self.cores.len(),
            "{} jobs elected for {} processors",
            elected.len(),
            self.cores.len()
        );

        // 5. Assign: elected jobs keep their processor, newcomers take the
        // lowest-index free one.
        for core in self.cores.iter_mut() {
            if let Some(key) = core.current_job() {
                if !elected.contains(&key) {
                    core.release();
                    self.stats.preemptions += 1;
                }
            }
        }
        for key in elected.iter() {
            if self.cores.iter().any(|core| core.current_job() == Some(*key)) {
                continue;
            }
            let core = self
                .cores
                .iter_mut()
                .find(|core| core.is_idle())
                .expect("an idle processor for every elected job");
            core.assign(*key);
        }

        // Execute
        for (index, core) in self.cores.iter_mut().enumerate() {
            core.tick();
            let Some(key) = core.current_job() else {
                continue;
            };
            if let Some(job) = self.queue.iter_mut().find(|job| job.key() == key) {
                job.schedule();
            }
            if let Some(previous) = self.last_core.insert(key, index) {
                if previous != index {
                    self.stats.migrations += 1;
                }
            }
        }

        // 6. Advance
        self.stats.ticks += 1;
        self.current_time += 1;
        if self.current_time > self.max_time {
            self.state = SimulationState::Complete;
        }
        self.state
    }

    /// Runs until a deadline is missed or the window is exhausted.
    pub fn run(&mut self) -> SimulationState {
        while self.step() == SimulationState::Running {}
        debug!(
            state = ?self.state,
            t = self.current_time,
            ticks = self.stats.ticks,
            preemptions = self.stats.preemptions,
            migrations = self.stats.migrations,
            "simulation finished"
        );
        self.state
    }
}
