use std::thread;

use dashu::rational::RBig;
use tracing::{debug, info, warn};

use super::analysis;
use super::edf_k::edf_k_boost;
use super::policy::{EarliestDeadlineFirst, GlobalEdf, Policy};
use super::simulator::Simulator;
use crate::constants::{EDFVersion, Heuristic, SimulationState, Sorting};
use crate::utils::SchedulingError;
use crate::{partition, SchedulingCode, TaskSet, TimeStep};

/// Decides whether a task set is schedulable on identical processors under
/// partitioned EDF, global EDF or EDF(k).
///
/// Analytic tests are tried first; when they cannot conclude, the task set is
/// simulated over its feasibility interval.
#[derive(Debug, Clone)]
pub struct Scheduler {
    task_set: TaskSet,      // The set of tasks to schedule
    version: EDFVersion,    // The version of EDF to use (e.g., Partitioned, Global, EDFk)
    num_cores: usize,       // Number of processor cores
    num_threads: usize,     // Threads simulating partitioned cores concurrently
    heuristic: Heuristic,   // Bin-packing heuristic for partitioned EDF
    sorting_order: Sorting, // Order in which tasks are packed
    horizon: Option<TimeStep>, // Caller-supplied simulation upper bound
}

impl Scheduler {
    /// Creates a scheduler for partitioned EDF with first-fit decreasing packing.
    pub fn new(task_set: TaskSet, num_cores: usize) -> Self {
        Self {
            task_set,
            version: EDFVersion::Partitioned,
            num_cores,
            num_threads: 1,
            heuristic: Heuristic::FirstFit,
            sorting_order: Sorting::DecreasingUtilization,
            horizon: None,
        }
    }

    pub fn set_version(&mut self, new_version: EDFVersion) {
        self.version = new_version;
    }

    pub fn set_heuristic(&mut self, heuristic: Heuristic) {
        self.heuristic = heuristic;
    }

    pub fn set_sorting(&mut self, sorting_order: Sorting) {
        self.sorting_order = sorting_order;
    }

    /// Number of threads used for the per-processor simulations; at least one.
    pub fn set_threads(&mut self, num_threads: usize) {
        self.num_threads = num_threads.max(1);
    }

    /// Replaces the upper bound of every simulation window.
    pub fn set_horizon(&mut self, horizon: Option<TimeStep>) {
        self.horizon = horizon;
    }

    pub fn version(&self) -> EDFVersion {
        self.version
    }

    /// Main function to test the task set using the selected EDF version.
    pub fn test_task_set(&self) -> SchedulingCode {
        if self.num_cores == 0 {
            warn!("no processor to schedule on");
            return SchedulingCode::CannotTell;
        }

        let result = match self.version {
            EDFVersion::Partitioned => self.compute_partitioned(),
            EDFVersion::Global => self.compute_global(),
            EDFVersion::EDFk(k) => self.compute_edfk(k),
        };
        info!(version = ?self.version, cores = self.num_cores, ?result, "decision");
        result
    }

    /// Partitioned EDF: each processor runs uniprocessor EDF on its own tasks.
    pub fn compute_partitioned(&self) -> SchedulingCode {
        let u_max = self.task_set.max_utilisation();
        let u_sum = self.task_set.utilisation();

        if self.task_set.has_implicit_deadlines()
            && self.heuristic == Heuristic::FirstFit
            && self.sorting_order == Sorting::DecreasingUtilization
            && analysis::partitioned_edf(&u_max, &u_sum, self.num_cores)
        {
            debug!(%u_max, %u_sum, "partitioned EDF bound holds");
            return SchedulingCode::SchedulableShortcut;
        }

        let Some(partition) = partition(
            &self.task_set,
            self.sorting_order,
            self.heuristic,
            self.num_cores,
        ) else {
            info!(
                heuristic = ?self.heuristic,
                sorting = ?self.sorting_order,
                "partitioning failed"
            );
            return SchedulingCode::UnschedulableShortcut;
        };

        let results = self.simulate_partitions(partition.into_task_sets());
        aggregate(&results)
    }

    /// Simulates every processor's task set, spread over `num_threads` threads.
    /// Results come back in processor order.
    fn simulate_partitions(&self, task_sets: Vec<TaskSet>) -> Vec<SchedulingCode> {
        if task_sets.is_empty() {
            return Vec::new();
        }
        let chunk_size = task_sets.len().div_ceil(self.num_threads.min(task_sets.len()));

        thread::scope(|scope| {
            let handles: Vec<_> = task_sets
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|task_set| self.simulate_core(task_set))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|e| std::panic::resume_unwind(e))
                })
                .collect()
        })
    }

    /// Uniprocessor EDF on the tasks bound to one processor.
    fn simulate_core(&self, task_set: &TaskSet) -> SchedulingCode {
        if task_set.is_empty() {
            return SchedulingCode::SchedulableShortcut;
        }
        self.simulate(task_set.clone(), EarliestDeadlineFirst, 1)
    }

    /// Global EDF: any ready job may run on any processor.
    pub fn compute_global(&self) -> SchedulingCode {
        if self.task_set.has_implicit_deadlines() {
            let u_max = self.task_set.max_utilisation();
            let u_sum = self.task_set.utilisation();

            if self.task_set.is_synchronous()
                && analysis::global_edf_periodic(&u_max, &u_sum, self.num_cores)
            {
                debug!(%u_max, %u_sum, "periodic global EDF bound holds");
                return SchedulingCode::SchedulableShortcut;
            }
            if analysis::global_edf_sporadic(&u_max, &u_sum, self.num_cores) {
                debug!(%u_max, %u_sum, "sporadic global EDF bound holds");
                return SchedulingCode::SchedulableShortcut;
            }
        }

        self.simulate(self.task_set.clone(), GlobalEdf, self.num_cores)
    }

    /// EDF(k): the `k - 1` heaviest tasks always run, the rest follow global EDF.
    pub fn compute_edfk(&self, k: usize) -> SchedulingCode {
        let boosted = match edf_k_boost(&self.task_set, k) {
            Ok(boosted) => boosted,
            Err(e) => {
                warn!("{e}");
                return SchedulingCode::CannotTell;
            }
        };

        if self.task_set.has_implicit_deadlines() {
            let utilisations: Vec<RBig> = self
                .task_set
                .utilisations_desc()
                .into_iter()
                .map(|(u, _)| u)
                .collect();
            match analysis::edf_k(&utilisations, k, self.num_cores) {
                Some(true) => {
                    debug!(k, "EDF(k) bound holds");
                    return SchedulingCode::SchedulableShortcut;
                }
                Some(false) => debug!(k, "EDF(k) bound does not hold"),
                None => {
                    info!(k, "EDF(k) test cannot decide, U_k >= 1");
                    return SchedulingCode::CannotTell;
                }
            }
        }

        self.simulate(boosted, GlobalEdf, self.num_cores)
    }

    /// Simulation window for `task_set`, honouring the caller's horizon.
    fn interval(&self, task_set: &TaskSet) -> Result<(TimeStep, TimeStep), SchedulingError> {
        match self.horizon {
            Some(upper) => Ok((0, upper)),
            None => task_set.feasibility_interval(),
        }
    }

    fn simulate<P: Policy>(
        &self,
        task_set: TaskSet,
        policy: P,
        num_cores: usize,
    ) -> SchedulingCode {
        let interval = match self.interval(&task_set) {
            Ok(interval) => interval,
            Err(e) => {
                warn!("{e}");
                return SchedulingCode::CannotTell;
            }
        };
        debug!(?interval, num_cores, tasks = task_set.len(), "simulating");

        let mut simulator = Simulator::new(task_set, policy, num_cores, interval);
        match simulator.run() {
            SimulationState::Missed => {
                if let Some(miss) = simulator.miss() {
                    info!("{miss}");
                }
                SchedulingCode::UnschedulableSimulated
            }
            _ => SchedulingCode::SchedulableSimulated,
        }
    }
}

/// Combines the per-processor verdicts of a partition: one miss fails the
/// whole set.
fn aggregate(results: &[SchedulingCode]) -> SchedulingCode {
    if results.contains(&SchedulingCode::UnschedulableSimulated) {
        SchedulingCode::UnschedulableSimulated
    } else if results.contains(&SchedulingCode::CannotTell) {
        SchedulingCode::CannotTell
    } else if results.contains(&SchedulingCode::SchedulableSimulated) {
        SchedulingCode::SchedulableSimulated
    } else {
        SchedulingCode::SchedulableShortcut
    }
}
