use tracing::debug;

use crate::utils::SchedulingError;
use crate::{TaskSet, ID};

/// Priority view used by EDF(k): a copy of `task_set` in which the `k - 1`
/// tasks of highest utilisation (ties by ascending id) are boosted above any
/// deadline. The other tasks keep their EDF ranking; `k = 1` boosts nothing.
///
/// Fails with [`SchedulingError::InvalidK`] unless `1 <= k <= n`.
pub fn edf_k_boost(task_set: &TaskSet, k: usize) -> Result<TaskSet, SchedulingError> {
    if k == 0 || k > task_set.len() {
        return Err(SchedulingError::InvalidK {
            k,
            tasks: task_set.len(),
        });
    }

    let boosted: Vec<ID> = task_set
        .utilisations_desc()
        .into_iter()
        .take(k - 1)
        .map(|(_, id)| id)
        .collect();
    debug!(k, ?boosted, "boosting heaviest tasks");

    Ok(task_set.with_boosted(&boosted))
}
