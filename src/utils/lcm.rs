use gcd::Gcd;

use crate::models::TimeStep;
use crate::utils::errors::SchedulingError;

/// Checked least common multiple.
fn lcm(a: TimeStep, b: TimeStep) -> Result<TimeStep, SchedulingError> {
    (a / a.gcd(b))
        .checked_mul(b)
        .ok_or(SchedulingError::HyperperiodOverflow { a, b })
}

/// LCM of all `numbers`, `1` for an empty slice.
pub fn multiple_lcm(numbers: &[TimeStep]) -> Result<TimeStep, SchedulingError> {
    numbers.iter().try_fold(1, |acc, &x| lcm(acc, x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcm_of_periods() {
        assert_eq!(multiple_lcm(&[4, 6]).unwrap(), 12);
        assert_eq!(multiple_lcm(&[3, 3, 3]).unwrap(), 3);
        assert_eq!(multiple_lcm(&[5, 7, 10]).unwrap(), 70);
    }

    #[test]
    fn lcm_of_nothing_is_one() {
        assert_eq!(multiple_lcm(&[]).unwrap(), 1);
    }

    #[test]
    fn overflow_is_reported() {
        let big = TimeStep::MAX / 2 + 1;
        let result = multiple_lcm(&[big, big - 1]);
        assert!(matches!(result, Err(SchedulingError::HyperperiodOverflow { .. })));
    }
}
