//! The search driver: a generate-evaluate loop under budget and timeout.

use std::collections::HashSet;
use std::time::Instant;

use crate::condition::{Check, Condition};
use crate::data::{RandomSource, Seed, Settings};
use crate::error::{Result, SearchError};
use crate::shrink::minimize;
use crate::strategy::{CandidateId, DomainSize, Strategy};

/// One drawn value plus the provenance id used to count distinct
/// candidates for exhaustion tracking.
#[derive(Debug, Clone)]
pub struct Candidate<T> {
    pub value: T,
    pub id: CandidateId,
}

/// Search for a value satisfying `condition` and minimize it.
///
/// Draws candidates from `strategy` until one satisfies the condition,
/// then shrinks it to a minimal satisfying value. On failure the error
/// classifies the outcome: [`SearchError::Timeout`] when the wall clock
/// ran out, [`SearchError::DefinitelyNoSuchExample`] when the strategy's
/// entire finite domain was enumerated and nothing satisfied, and
/// [`SearchError::NoSuchExample`] otherwise.
///
/// The timeout is polled cooperatively between iterations: a predicate
/// that blocks indefinitely inside one evaluation cannot be interrupted.
pub fn find<S: Strategy>(
    strategy: &S,
    condition: Condition<S::Value>,
    settings: &Settings,
) -> Result<S::Value> {
    find_from_seed(strategy, condition, settings, Seed::random())
}

/// [`find`] with an injectable seed, for reproducible searches.
pub fn find_from_seed<S: Strategy>(
    strategy: &S,
    condition: Condition<S::Value>,
    settings: &Settings,
    seed: Seed,
) -> Result<S::Value> {
    let start = Instant::now();
    let mut source = RandomSource::from_seed(seed);
    let mut seen: HashSet<CandidateId> = HashSet::new();
    let mut satisfying_examples = 0usize;

    for _ in 0..settings.max_examples {
        if let Some(timeout) = settings.timeout {
            if start.elapsed() >= timeout {
                return Err(SearchError::Timeout {
                    condition: condition.name().to_string(),
                    elapsed: start.elapsed(),
                });
            }
        }

        let param = strategy.parameter(&mut source);
        let value = strategy.draw(&param, &mut source);
        let candidate = Candidate {
            id: strategy.candidate_id(&value),
            value,
        };

        match condition.evaluate(&candidate.value) {
            // Rejected candidates consume budget but are not recorded:
            // they prove nothing about the domain.
            Check::Rejected => continue,
            Check::Unsatisfied => {
                satisfying_examples += 1;
                seen.insert(candidate.id);
                if proven_empty(strategy, &seen, satisfying_examples, settings) {
                    return Err(SearchError::DefinitelyNoSuchExample {
                        condition: condition.name().to_string(),
                    });
                }
            }
            Check::Satisfied => {
                return Ok(minimize(
                    strategy,
                    &condition,
                    candidate.value,
                    settings.max_shrinks,
                ));
            }
        }
    }

    if proven_empty(strategy, &seen, satisfying_examples, settings) {
        Err(SearchError::DefinitelyNoSuchExample {
            condition: condition.name().to_string(),
        })
    } else {
        Err(SearchError::NoSuchExample {
            condition: condition.name().to_string(),
        })
    }
}

/// Exhaustion rule: claim a proof of emptiness only when the domain is
/// finite, every one of its distinct values was actually considered, and
/// enough filter-passing candidates were seen for the claim to be
/// meaningful. Randomness missing values in a large domain must never
/// masquerade as a proof.
fn proven_empty<S: Strategy>(
    strategy: &S,
    seen: &HashSet<CandidateId>,
    satisfying_examples: usize,
    settings: &Settings,
) -> bool {
    match strategy.domain_size() {
        DomainSize::Finite(size) => {
            seen.len() as u64 >= size && satisfying_examples >= settings.min_satisfying_examples
        }
        DomainSize::Unbounded => false,
    }
}
