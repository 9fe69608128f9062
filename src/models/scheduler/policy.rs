use crate::Job;

/// Selection rule applied to the ready queue at every tick.
pub trait Policy {
    /// Indices into `queue` of the jobs to run this tick, at most `slots` of them.
    fn elect(&self, queue: &[Job], slots: usize) -> Vec<usize>;
}

/// Index of the job with the highest EDF rank, `None` on an empty queue.
pub fn edf_priority(queue: &[Job]) -> Option<usize> {
    queue
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.edf_cmp(b))
        .map(|(i, _)| i)
}

/// Indices of the `m` highest ranked jobs (fewer if the queue is shorter),
/// earliest deadline first.
pub fn global_edf(queue: &[Job], m: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..queue.len()).collect();
    indices.sort_by(|&a, &b| queue[a].edf_cmp(&queue[b]));
    indices.truncate(m);
    indices
}

/// Uniprocessor EDF, one job per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarliestDeadlineFirst;

impl Policy for EarliestDeadlineFirst {
    fn elect(&self, queue: &[Job], slots: usize) -> Vec<usize> {
        if slots == 0 {
            return Vec::new();
        }
        edf_priority(queue).into_iter().collect()
    }
}

/// Global EDF with migrations.
///
/// EDF(k) uses the same rule on a boosted task set: boosted jobs rank first.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalEdf;

impl Policy for GlobalEdf {
    fn elect(&self, queue: &[Job], slots: usize) -> Vec<usize> {
        global_edf(queue, slots)
    }
}
