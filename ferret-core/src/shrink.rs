//! Shrinking: deterministic minimization of a satisfying example.

use crate::condition::{Check, Condition};
use crate::strategy::Strategy;

/// Minimize a value known to satisfy `condition`.
///
/// Greedy fixed-point loop: scan the strategy's simplification
/// candidates in order, adopt the first one that still satisfies the
/// condition (re-validated, so `assume` filters hold for every adopted
/// value), and restart from it. Stops at a full pass with no improvement
/// or after `max_shrinks` attempts; candidates that fail are discarded
/// silently and the last known-good value is always returned.
pub fn minimize<S: Strategy>(
    strategy: &S,
    condition: &Condition<S::Value>,
    initial: S::Value,
    max_shrinks: usize,
) -> S::Value {
    let mut best = initial;
    let mut attempts = 0;

    'restart: loop {
        for candidate in strategy.simplify(&best) {
            if attempts >= max_shrinks {
                return best;
            }
            attempts += 1;
            if condition.evaluate(&candidate) == Check::Satisfied {
                best = candidate;
                continue 'restart;
            }
        }
        return best;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::assume;
    use crate::strategy::collections::vec_of;
    use crate::strategy::ints;

    #[test]
    fn test_minimizes_to_threshold() {
        let condition = Condition::new("x >= 13", |&x: &i64| x >= 13);
        assert_eq!(minimize(&ints(), &condition, 9714, 500), 13);
    }

    #[test]
    fn test_minimizes_to_origin_when_unconstrained() {
        let condition = Condition::new("anything", |_: &i64| true);
        assert_eq!(minimize(&ints(), &condition, 1_000_000, 500), 0);
    }

    #[test]
    fn test_zero_budget_returns_initial() {
        let condition = Condition::new("anything", |_: &i64| true);
        assert_eq!(minimize(&ints(), &condition, 42, 0), 42);
    }

    #[test]
    fn test_result_respects_assume_filters() {
        let condition = Condition::filtered("nonzero", |&x: &i64| {
            assume(x != 0)?;
            Ok(true)
        });
        // 0 is simpler but rejected, so the minimum under the filter is 1.
        assert_eq!(minimize(&ints(), &condition, 50, 500), 1);
    }

    #[test]
    fn test_vec_sum_shrinks_with_no_slack() {
        let condition = Condition::new("sum >= 10", |xs: &Vec<i64>| xs.iter().sum::<i64>() >= 10);
        let minimal = minimize(&vec_of(ints()), &condition, vec![9, 5, 3], 1000);
        assert_eq!(minimal.iter().sum::<i64>(), 10);
    }

    #[test]
    fn test_never_returns_unsatisfying_value() {
        let condition = Condition::new("x >= 7 and odd", |&x: &i64| x >= 7 && x % 2 == 1);
        let minimal = minimize(&ints(), &condition, 99, 500);
        assert!(minimal >= 7 && minimal % 2 == 1);
        assert_eq!(minimal, 7);
    }
}
