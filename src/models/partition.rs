use dashu::rational::RBig;
use tracing::debug;

use crate::constants::{Heuristic, Sorting};
use crate::{TaskSet, ID};

/// A partition represents a collection of task sets distributed across processors.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    partition: Vec<TaskSet>, // A vector of task sets, one for each processor
}

impl Partition {
    /// Returns an iterator over the task sets in the partition.
    pub fn iter(&self) -> impl Iterator<Item = &TaskSet> {
        self.partition.iter()
    }

    /// Task ids bound to each processor, in placement order.
    pub fn assignment(&self) -> Vec<Vec<ID>> {
        self.partition
            .iter()
            .map(|task_set| task_set.iter().map(|t| t.id()).collect())
            .collect()
    }

    /// Load of each processor.
    pub fn utilisations(&self) -> Vec<RBig> {
        self.partition.iter().map(|task_set| task_set.utilisation()).collect()
    }

    pub fn into_task_sets(self) -> Vec<TaskSet> {
        self.partition
    }
}

/// Binds every task of `task_set` to one of `num_cores` processors.
///
/// Tasks are considered by utilisation in `sorting` order (ties by ascending
/// id) and a processor accepts a task only if its load stays at most 1.
/// Returns `None` as soon as one task fits nowhere; nothing of the attempt is
/// kept.
pub fn partition(
    task_set: &TaskSet,
    sorting: Sorting,
    heuristic: Heuristic,
    num_cores: usize,
) -> Option<Partition> {
    let mut order = task_set.utilisations_desc();
    if sorting == Sorting::IncreasingUtilization {
        order.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    }

    let mut partitions = vec![TaskSet::new_empty(); num_cores];
    let mut loads = vec![RBig::ZERO; num_cores];
    let mut current_partition = 0;

    for (utilisation, id) in order {
        let fits = |i: &usize| &loads[*i] + &utilisation <= RBig::ONE;

        let chosen = match heuristic {
            Heuristic::FirstFit => (0..num_cores).find(fits),
            Heuristic::NextFit => (current_partition..num_cores).find(fits),
            // Tightest fit: the processor that ends up most loaded.
            Heuristic::BestFit => (0..num_cores)
                .filter(fits)
                .reduce(|best, i| if loads[i] > loads[best] { i } else { best }),
            // Loosest fit: the processor that ends up least loaded.
            Heuristic::WorstFit => (0..num_cores)
                .filter(fits)
                .reduce(|worst, i| if loads[i] < loads[worst] { i } else { worst }),
        };

        let Some(core) = chosen else {
            debug!(task = id, %utilisation, ?heuristic, "task fits on no processor");
            return None;
        };

        current_partition = core;
        loads[core] += utilisation;
        if let Some(task) = task_set.get_task_by_id(id) {
            partitions[core].add_task(task.clone());
        }
    }

    debug!(?loads, ?heuristic, ?sorting, "partition found");
    Some(Partition { partition: partitions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Task, TimeStep};
    use dashu::integer::{IBig, UBig};

    const HEURISTICS: [Heuristic; 4] = [
        Heuristic::FirstFit,
        Heuristic::NextFit,
        Heuristic::BestFit,
        Heuristic::WorstFit,
    ];

    /// Implicit-deadline tasks with period 10, one per given computation time.
    fn taskset(wcets: &[TimeStep]) -> TaskSet {
        TaskSet::try_new(
            wcets
                .iter()
                .enumerate()
                .map(|(i, &c)| Task::new(i as ID + 1, 0, c, 10, 10))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn first_fit_restarts_from_first_processor() {
        // du order: 6 (id 1), 5 (id 2), 4 (id 3), 3 (id 4)
        let ts = taskset(&[6, 5, 4, 3]);
        let p = partition(&ts, Sorting::DecreasingUtilization, Heuristic::FirstFit, 3).unwrap();
        assert_eq!(p.assignment(), vec![vec![1, 3], vec![2, 4], vec![]]);
    }

    #[test]
    fn next_fit_never_goes_back() {
        let ts = taskset(&[6, 5, 4, 3]);
        let p = partition(&ts, Sorting::DecreasingUtilization, Heuristic::NextFit, 3).unwrap();
        assert_eq!(p.assignment(), vec![vec![1], vec![2, 3], vec![4]]);
    }

    #[test]
    fn next_fit_fails_where_first_fit_succeeds() {
        // du order: 6, 5, 4, 4
        let ts = taskset(&[6, 5, 4, 4]);
        let p = partition(&ts, Sorting::DecreasingUtilization, Heuristic::FirstFit, 2).unwrap();
        assert_eq!(p.assignment(), vec![vec![1, 3], vec![2, 4]]);
        // nf leaves p0 behind after the second task and the last 4 fits nowhere
        assert!(partition(&ts, Sorting::DecreasingUtilization, Heuristic::NextFit, 2).is_none());
    }

    #[test]
    fn best_fit_picks_tightest_processor() {
        // du order: 6, 5, 4, 3 -> bf: 6->p0, 5->p1, 4->p0 (load 1.0), 3->p1
        let ts = taskset(&[6, 5, 4, 3]);
        let p = partition(&ts, Sorting::DecreasingUtilization, Heuristic::BestFit, 3).unwrap();
        assert_eq!(p.assignment(), vec![vec![1, 3], vec![2, 4], vec![]]);

        // iu order: 3, 4, 5 -> bf: 3->p0, 4->p0 (0.7), 5 -> p1
        let ts = taskset(&[3, 4, 5]);
        let p = partition(&ts, Sorting::IncreasingUtilization, Heuristic::BestFit, 2).unwrap();
        assert_eq!(p.assignment(), vec![vec![1, 2], vec![3]]);
    }

    #[test]
    fn worst_fit_spreads_load() {
        let ts = taskset(&[6, 5, 4, 3]);
        let p = partition(&ts, Sorting::DecreasingUtilization, Heuristic::WorstFit, 3).unwrap();
        assert_eq!(p.assignment(), vec![vec![1], vec![2], vec![3, 4]]);
        let loads = p.utilisations();
        assert_eq!(loads[2], RBig::from_parts(IBig::from(7u8), UBig::from(10u8)));
    }

    #[test]
    fn every_task_placed_exactly_once() {
        let ts = taskset(&[1, 2, 3, 4, 5, 6, 7, 8]);
        for heuristic in HEURISTICS {
            let p = partition(&ts, Sorting::DecreasingUtilization, heuristic, 5).unwrap();
            let mut ids: Vec<ID> = p.assignment().into_iter().flatten().collect();
            ids.sort();
            assert_eq!(ids, (1..=8).collect::<Vec<ID>>());
            assert!(p.utilisations().iter().all(|u| *u <= RBig::ONE));
            let total = p
                .utilisations()
                .into_iter()
                .fold(RBig::ZERO, |sum, u| sum + u);
            assert_eq!(total, ts.utilisation());
        }
    }

    #[test]
    fn partitioning_is_deterministic() {
        let ts = taskset(&[3, 3, 3, 7, 2, 5]);
        for heuristic in HEURISTICS {
            let first = partition(&ts, Sorting::IncreasingUtilization, heuristic, 3);
            let second = partition(&ts, Sorting::IncreasingUtilization, heuristic, 3);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn fails_when_overloaded() {
        let ts = TaskSet::try_new(vec![
            Task::new(1, 0, 3, 4, 4),
            Task::new(2, 0, 2, 6, 6),
        ])
        .unwrap();
        assert!(partition(&ts, Sorting::DecreasingUtilization, Heuristic::FirstFit, 1).is_none());
    }

    #[test]
    fn exact_fit_is_accepted_and_a_hair_over_is_not() {
        // 1/3 + 1/3 + 1/3 fills one processor exactly.
        let ts = TaskSet::try_new(vec![
            Task::new(1, 0, 1, 3, 3),
            Task::new(2, 0, 2, 6, 6),
            Task::new(3, 0, 3, 9, 9),
        ])
        .unwrap();
        for heuristic in HEURISTICS {
            assert!(partition(&ts, Sorting::IncreasingUtilization, heuristic, 1).is_some());
        }

        // 49995/99991 + 49995/99989 exceeds 1 by about 1e-10.
        let ts = TaskSet::try_new(vec![
            Task::new(1, 0, 49995, 99991, 99991),
            Task::new(2, 0, 49995, 99989, 99989),
        ])
        .unwrap();
        for heuristic in HEURISTICS {
            assert!(partition(&ts, Sorting::DecreasingUtilization, heuristic, 1).is_none());
        }
    }
}
