//! Closed-form schedulability tests.
//!
//! All of them are sufficient conditions for sporadic or periodic task sets
//! with implicit deadlines; a `false` answer only means the test could not
//! conclude. `u_max` is the largest task utilisation and `u_sum` the total.
//! Utilisations are exact rationals so a bound is never passed by rounding.

use dashu::integer::UBig;
use dashu::rational::RBig;

fn whole(n: usize) -> RBig {
    RBig::from(UBig::from(n))
}

/// Partitioned EDF with first-fit decreasing-utilisation packing.
pub fn partitioned_edf(u_max: &RBig, u_sum: &RBig, m: usize) -> bool {
    *u_max <= RBig::ONE && u_sum * whole(2) <= whole(m) + RBig::ONE
}

/// Global EDF, periodic synchronous task sets.
pub fn global_edf_periodic(u_max: &RBig, u_sum: &RBig, m: usize) -> bool {
    *u_max <= RBig::ONE && *u_sum <= whole(m)
}

/// Global EDF, sporadic task sets (Goossens, Funk and Baruah).
pub fn global_edf_sporadic(u_max: &RBig, u_sum: &RBig, m: usize) -> bool {
    *u_sum <= whole(m) - whole(m.saturating_sub(1)) * u_max
}

/// EDF(k) on `m` processors.
///
/// `utilisations` must be sorted in decreasing order. With `U_k` the k-th
/// largest utilisation and `U_rest` the sum of the ones ranked after it, the
/// set passes when `m >= (k - 1) + U_rest / (1 - U_k)`. The `k - 1` boosted
/// tasks each hold a processor, so at least `k` processors are required.
///
/// Returns `None` when the test cannot decide: `k` outside `1..=n` or
/// `U_k >= 1`.
pub fn edf_k(utilisations: &[RBig], k: usize, m: usize) -> Option<bool> {
    if k == 0 || k > utilisations.len() {
        return None;
    }
    let u_k = &utilisations[k - 1];
    if *u_k >= RBig::ONE {
        return None;
    }
    if m < k {
        return Some(false);
    }
    let rest = utilisations[k..]
        .iter()
        .fold(RBig::ZERO, |sum, u| sum + u);
    Some(whole(m) >= whole(k - 1) + rest / (RBig::ONE - u_k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashu::integer::IBig;

    fn u(num: usize, den: usize) -> RBig {
        RBig::from_parts(IBig::from(num), UBig::from(den))
    }

    #[test]
    fn partitioned_bound() {
        assert!(partitioned_edf(&u(2, 5), &u(2, 5), 1));
        assert!(!partitioned_edf(&u(3, 4), &u(13, 12), 1));
        assert!(partitioned_edf(&u(9, 10), &u(3, 2), 2));
        assert!(!partitioned_edf(&u(6, 5), &u(6, 5), 4));
    }

    #[test]
    fn global_periodic_bound() {
        assert!(global_edf_periodic(&u(1, 3), &RBig::ONE, 2));
        assert!(global_edf_periodic(&RBig::ONE, &whole(2), 2));
        assert!(!global_edf_periodic(&u(1, 2), &u(5, 2), 2));
        assert!(!global_edf_periodic(&u(5, 4), &u(5, 4), 2));
    }

    #[test]
    fn global_sporadic_bound() {
        // m - (m - 1) * u_max = 2 - 1/2 = 3/2
        assert!(global_edf_sporadic(&u(1, 2), &u(3, 2), 2));
        assert!(!global_edf_sporadic(&u(1, 2), &u(8, 5), 2));
        // one processor: plain utilisation bound
        assert!(global_edf_sporadic(&u(3, 4), &RBig::ONE, 1));
    }

    #[test]
    fn bounds_are_exact_at_one() {
        // 49995/99991 + 49995/99989 = 1 + ~1e-10
        let u_sum = u(49995, 99991) + u(49995, 99989);
        let u_max = u(49995, 99989);
        assert!(u_sum > RBig::ONE);
        assert!(!partitioned_edf(&u_max, &u_sum, 1));
        assert!(!global_edf_periodic(&u_max, &u_sum, 1));
        assert!(!global_edf_sporadic(&u_max, &u_sum, 1));

        // Three thirds is exactly one.
        let thirds = u(1, 3) + u(1, 3) + u(1, 3);
        assert!(global_edf_periodic(&u(1, 3), &thirds, 1));
        assert!(global_edf_sporadic(&u(1, 3), &thirds, 1));
    }

    #[test]
    fn edf_k_threshold() {
        let utilisations = [u(9, 10), u(1, 2), u(1, 4), u(1, 4)];
        // k = 2: 1 + (1/2) / (1/2) = 2
        assert_eq!(edf_k(&utilisations, 2, 2), Some(true));
        assert_eq!(edf_k(&utilisations, 2, 1), Some(false));
        // More processors than needed still passes.
        assert_eq!(edf_k(&utilisations, 2, 5), Some(true));
        // k = 1: 0 + 1 / (1/10) = 10
        assert_eq!(edf_k(&utilisations, 1, 9), Some(false));
        assert_eq!(edf_k(&utilisations, 1, 10), Some(true));
    }

    #[test]
    fn edf_k_needs_a_processor_beyond_the_boosted_tasks() {
        // k = 2 = n: U_rest = 0 so the inequality reads m >= 1, but the one
        // processor is taken by the boosted task.
        let utilisations = [u(2, 3), u(1, 2)];
        assert_eq!(edf_k(&utilisations, 2, 1), Some(false));
        assert_eq!(edf_k(&utilisations, 2, 2), Some(true));
    }

    #[test]
    fn edf_k_undecided() {
        assert_eq!(edf_k(&[RBig::ONE, u(1, 2)], 1, 4), None);
        assert_eq!(edf_k(&[u(1, 2), u(1, 2)], 3, 4), None);
        assert_eq!(edf_k(&[u(1, 2), u(1, 2)], 0, 4), None);
    }
}
