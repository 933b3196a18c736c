//! Condition evaluation: the user predicate plus its display name.

/// Outcome of evaluating a condition against one candidate.
///
/// Rejection is an explicit result value rather than an unwound signal:
/// the search driver's loop stays plain control flow over a tri-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// The candidate satisfies the predicate.
    Satisfied,
    /// The candidate passed all filters but does not satisfy the predicate.
    Unsatisfied,
    /// The candidate failed an `assume` precondition and is discarded
    /// without counting as a failed attempt.
    Rejected,
}

/// Marker for a candidate discarded by an [`assume`] precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected;

/// Require a precondition inside a filtered predicate.
///
/// Composes with `?`: a failed precondition discards the current
/// candidate without counting it against the predicate. The rejection is
/// consumed by the condition evaluator and never reaches the caller.
///
/// # Example
/// ```rust
/// use ferret_core::{assume, Condition, Check};
///
/// let even_and_big = Condition::filtered("even x > 100", |&x: &i64| {
///     assume(x % 2 == 0)?;
///     Ok(x > 100)
/// });
/// assert_eq!(even_and_big.evaluate(&102), Check::Satisfied);
/// assert_eq!(even_and_big.evaluate(&7), Check::Rejected);
/// ```
pub fn assume(precondition: bool) -> Result<(), Rejected> {
    if precondition {
        Ok(())
    } else {
        Err(Rejected)
    }
}

type CheckFn<T> = Box<dyn Fn(&T) -> Check>;

/// A predicate together with a human-readable display name.
///
/// The name stands in for the predicate's source text and is embedded in
/// every failure message, so an unsatisfiable search is diagnosable
/// without access to the call site.
pub struct Condition<T> {
    name: String,
    test: CheckFn<T>,
}

impl<T> Condition<T> {
    /// Wrap a boolean predicate.
    pub fn new<F>(name: &str, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        Condition {
            name: name.to_string(),
            test: Box::new(move |value| {
                if predicate(value) {
                    Check::Satisfied
                } else {
                    Check::Unsatisfied
                }
            }),
        }
    }

    /// Wrap a predicate that may reject candidates via [`assume`].
    pub fn filtered<F>(name: &str, predicate: F) -> Self
    where
        F: Fn(&T) -> Result<bool, Rejected> + 'static,
    {
        Condition {
            name: name.to_string(),
            test: Box::new(move |value| match predicate(value) {
                Ok(true) => Check::Satisfied,
                Ok(false) => Check::Unsatisfied,
                Err(Rejected) => Check::Rejected,
            }),
        }
    }

    /// Evaluate one candidate.
    pub fn evaluate(&self, value: &T) -> Check {
        (self.test)(value)
    }

    /// The condition's display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> std::fmt::Debug for Condition<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Condition").field("name", &self.name).finish()
    }
}
