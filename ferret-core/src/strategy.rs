//! Strategies: composable generator-and-simplifier pairs.
//!
//! A strategy knows how to draw a random candidate value, how to propose
//! strictly simpler neighbors of a value it produced, and how large its
//! value domain is. Draws are two-level: a `Param` is drawn once per
//! candidate and shared by every element of a composite draw, so a whole
//! list or stream can lean toward e.g. small non-negative integers at
//! once instead of mixing regimes element by element.

use std::fmt;

use crate::data::{splitmix64_mix, RandomSource};

pub mod collections;
pub mod stream;

/// Cardinality of a strategy's value domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainSize {
    /// Exactly this many distinct values exist.
    Finite(u64),
    /// Unbounded, or too large to count in a `u64`.
    Unbounded,
}

/// Equality key for distinct-candidate tracking.
///
/// Exhaustion of a finite domain is decided by counting distinct ids, so
/// each strategy defines the id from its own value: a sampled element's
/// id is its index, and every NaN collapses to one canonical id rather
/// than relying on float self-inequality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateId(pub u64);

impl CandidateId {
    /// Fold another id into this one, order-sensitively.
    pub fn combine(self, other: CandidateId) -> CandidateId {
        CandidateId(splitmix64_mix(self.0.rotate_left(5) ^ other.0))
    }
}

/// A producer of candidate values of one shape.
///
/// Strategies hold no mutable state: they are freely shareable across
/// concurrent searches, each of which threads its own [`RandomSource`].
pub trait Strategy {
    /// The kind of value this strategy produces.
    type Value: Clone + fmt::Debug;

    /// Per-candidate draw parameter, shared by composite draws.
    type Param: Clone;

    /// Draw the parameter governing one candidate.
    fn parameter(&self, source: &mut RandomSource) -> Self::Param;

    /// Draw one value under the given parameter.
    fn draw(&self, param: &Self::Param, source: &mut RandomSource) -> Self::Value;

    /// Propose strictly simpler neighbors of `value`, simplest first.
    ///
    /// The list is finite and empty exactly at a fixed point. Every
    /// proposed value must be strictly simpler under the strategy's own
    /// order, so repeated adoption cannot regress forever.
    fn simplify(&self, value: &Self::Value) -> Vec<Self::Value>;

    /// Exact domain cardinality, when one can be stated.
    fn domain_size(&self) -> DomainSize;

    /// Distinct-candidate key of `value` for exhaustion tracking.
    fn candidate_id(&self, value: &Self::Value) -> CandidateId;
}

/// Sign regime for one integer parameter draw.
#[derive(Debug, Clone, Copy)]
enum SignMode {
    NonNegative,
    NonPositive,
    Mixed,
}

/// Per-candidate integer draw parameter.
#[derive(Debug, Clone)]
pub struct IntParam {
    /// One-in-n chance of drawing a boundary value; 0 disables them.
    boundary_rate: u64,
    /// Magnitude width in bits, biased small.
    bits: u32,
    sign: SignMode,
}

/// Strategy over a contiguous range of `i64`.
#[derive(Debug, Clone)]
pub struct IntStrategy {
    min: i64,
    max: i64,
}

/// Integers over the full `i64` range, biased toward small magnitudes
/// and boundary values.
pub fn ints() -> IntStrategy {
    int_range(i64::MIN, i64::MAX)
}

/// Integers in `[min, max]`.
pub fn int_range(min: i64, max: i64) -> IntStrategy {
    assert!(min <= max, "int_range requires min <= max");
    IntStrategy { min, max }
}

const INT_BOUNDARIES: [i64; 9] = [0, 1, -1, 2, -2, 64, -64, i64::MAX, i64::MIN];

impl IntStrategy {
    /// The simplest in-range value: zero, clamped into the range.
    fn origin(&self) -> i64 {
        0i64.clamp(self.min, self.max)
    }

    fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }
}

impl Strategy for IntStrategy {
    type Value = i64;
    type Param = IntParam;

    fn parameter(&self, source: &mut RandomSource) -> IntParam {
        IntParam {
            boundary_rate: [0, 4, 16][source.next_bounded(3) as usize],
            bits: 1 + source.next_bounded(62).min(source.next_bounded(62)) as u32,
            sign: match source.next_bounded(4) {
                0 => SignMode::NonNegative,
                1 => SignMode::NonPositive,
                _ => SignMode::Mixed,
            },
        }
    }

    fn draw(&self, param: &IntParam, source: &mut RandomSource) -> i64 {
        if param.boundary_rate > 0 && source.next_bounded(param.boundary_rate) == 0 {
            let pick = INT_BOUNDARIES[source.next_bounded(INT_BOUNDARIES.len() as u64) as usize];
            return self.clamp(pick);
        }
        let magnitude = source.next_bounded(1u64 << param.bits) as i64;
        let value = match param.sign {
            SignMode::NonNegative => magnitude,
            SignMode::NonPositive => -magnitude,
            SignMode::Mixed => {
                if source.next_bool() {
                    magnitude
                } else {
                    -magnitude
                }
            }
        };
        self.clamp(value)
    }

    fn simplify(&self, value: &i64) -> Vec<i64> {
        let value = *value;
        let origin = self.origin();
        if value == origin {
            return Vec::new();
        }

        let mut out = vec![origin];

        // The positive twin of a negative value is simpler at equal magnitude.
        if value < 0 {
            if let Some(flipped) = value.checked_neg() {
                if (self.min..=self.max).contains(&flipped) {
                    out.push(flipped);
                }
            }
        }

        // Geometric ladder from the origin toward the value, nearest the
        // origin first, so a shrink lands close to a predicate's threshold
        // in few adoptions.
        let mut rungs = Vec::new();
        let mut delta = value as i128 - origin as i128;
        while delta.abs() > 1 {
            delta /= 2;
            rungs.push((origin as i128 + delta) as i64);
        }
        rungs.reverse();
        out.extend(rungs);

        // Final small steps so fixed points sit exactly on thresholds,
        // including thresholds the halving ladder can never land on
        // (e.g. parity-constrained predicates).
        let distance = (value as i128 - origin as i128).unsigned_abs();
        for step in [2u128, 1] {
            if distance > step {
                out.push(if value > origin {
                    value - step as i64
                } else {
                    value + step as i64
                });
            }
        }

        dedup_in_order(out)
    }

    fn domain_size(&self) -> DomainSize {
        let width = self.max as i128 - self.min as i128 + 1;
        if width <= u64::MAX as i128 {
            DomainSize::Finite(width as u64)
        } else {
            DomainSize::Unbounded
        }
    }

    fn candidate_id(&self, value: &i64) -> CandidateId {
        CandidateId(*value as u64)
    }
}

/// Strategy over booleans with a Bernoulli conditional distribution.
#[derive(Debug, Clone)]
pub struct BoolStrategy;

/// Uniformly distributed booleans (per-candidate Bernoulli parameter).
pub fn bools() -> BoolStrategy {
    BoolStrategy
}

impl Strategy for BoolStrategy {
    type Value = bool;
    type Param = f64;

    fn parameter(&self, source: &mut RandomSource) -> f64 {
        source.next_f64()
    }

    fn draw(&self, p_true: &f64, source: &mut RandomSource) -> bool {
        source.next_f64() < *p_true
    }

    fn simplify(&self, value: &bool) -> Vec<bool> {
        if *value {
            vec![false]
        } else {
            Vec::new()
        }
    }

    fn domain_size(&self) -> DomainSize {
        DomainSize::Finite(2)
    }

    fn candidate_id(&self, value: &bool) -> CandidateId {
        CandidateId(*value as u64)
    }
}

#[derive(Debug, Clone, Copy)]
enum FloatMode {
    SmallInteger,
    Unit,
    Bits,
}

/// Per-candidate float draw parameter.
#[derive(Debug, Clone)]
pub struct FloatParam {
    /// One-in-n chance of drawing from the special corpus; 0 disables it.
    special_rate: u64,
    mode: FloatMode,
}

/// Strategy over `f64`, mixing ordinary values with a special corpus.
#[derive(Debug, Clone)]
pub struct FloatStrategy;

/// Floats including NaN, infinities, signed zeros, subnormals and
/// extremes with non-negligible probability.
pub fn floats() -> FloatStrategy {
    FloatStrategy
}

const FLOAT_SPECIALS: [f64; 10] = [
    f64::NAN,
    f64::INFINITY,
    f64::NEG_INFINITY,
    0.0,
    -0.0,
    f64::MAX,
    f64::MIN,
    f64::MIN_POSITIVE,
    5e-324,
    f64::EPSILON,
];

/// Canonical id for every NaN bit pattern.
const CANONICAL_NAN_BITS: u64 = 0x7ff8_0000_0000_0000;

impl Strategy for FloatStrategy {
    type Value = f64;
    type Param = FloatParam;

    fn parameter(&self, source: &mut RandomSource) -> FloatParam {
        FloatParam {
            special_rate: [0, 2, 8][source.next_bounded(3) as usize],
            mode: match source.next_bounded(3) {
                0 => FloatMode::SmallInteger,
                1 => FloatMode::Unit,
                _ => FloatMode::Bits,
            },
        }
    }

    fn draw(&self, param: &FloatParam, source: &mut RandomSource) -> f64 {
        if param.special_rate > 0 && source.next_bounded(param.special_rate) == 0 {
            return FLOAT_SPECIALS[source.next_bounded(FLOAT_SPECIALS.len() as u64) as usize];
        }
        match param.mode {
            FloatMode::SmallInteger => (source.next_bounded(41) as i64 - 20) as f64,
            FloatMode::Unit => {
                let unit = source.next_f64();
                if source.next_bool() {
                    unit
                } else {
                    -unit
                }
            }
            FloatMode::Bits => f64::from_bits(source.next_u64()),
        }
    }

    /// Proposes finite replacements only, moving toward `0.0`. A NaN or
    /// infinity therefore survives shrinking exactly when the predicate
    /// still requires it.
    fn simplify(&self, value: &f64) -> Vec<f64> {
        let value = *value;
        if value.to_bits() == 0 {
            return Vec::new();
        }
        if value.is_nan() {
            return vec![0.0];
        }
        if value.is_infinite() {
            return vec![0.0, if value > 0.0 { f64::MAX } else { f64::MIN }];
        }

        let mut out = vec![0.0];
        if value.is_sign_negative() {
            out.push(-value);
        }
        if value.fract() != 0.0 {
            out.push(value.trunc());
        }
        out.push(value / 2.0);

        out.retain(|candidate| candidate.to_bits() != value.to_bits());
        dedup_floats_in_order(out)
    }

    fn domain_size(&self) -> DomainSize {
        DomainSize::Unbounded
    }

    fn candidate_id(&self, value: &f64) -> CandidateId {
        if value.is_nan() {
            CandidateId(CANONICAL_NAN_BITS)
        } else {
            CandidateId(value.to_bits())
        }
    }
}

/// Strategy that samples uniformly from a declared finite collection.
///
/// Index 0 of the declared order is maximally simple; simplification
/// proposes all earlier elements.
#[derive(Debug, Clone)]
pub struct SampledFrom<T> {
    elements: Vec<T>,
}

/// Sample uniformly from `elements`. Panics if `elements` is empty.
pub fn sampled_from<T>(elements: Vec<T>) -> SampledFrom<T>
where
    T: Clone + fmt::Debug + PartialEq,
{
    assert!(
        !elements.is_empty(),
        "sampled_from requires at least one element"
    );
    SampledFrom { elements }
}

impl<T> SampledFrom<T>
where
    T: PartialEq,
{
    fn index_of(&self, value: &T) -> usize {
        self.elements
            .iter()
            .position(|element| element == value)
            .unwrap_or(0)
    }
}

impl<T> Strategy for SampledFrom<T>
where
    T: Clone + fmt::Debug + PartialEq,
{
    type Value = T;
    type Param = ();

    fn parameter(&self, _source: &mut RandomSource) -> Self::Param {}

    fn draw(&self, _param: &(), source: &mut RandomSource) -> T {
        let index = source.next_bounded(self.elements.len() as u64) as usize;
        self.elements[index].clone()
    }

    fn simplify(&self, value: &T) -> Vec<T> {
        let index = self.index_of(value);
        self.elements[..index].to_vec()
    }

    fn domain_size(&self) -> DomainSize {
        DomainSize::Finite(self.elements.len() as u64)
    }

    fn candidate_id(&self, value: &T) -> CandidateId {
        CandidateId(self.index_of(value) as u64)
    }
}

fn dedup_in_order(values: Vec<i64>) -> Vec<i64> {
    let mut seen = Vec::with_capacity(values.len());
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

fn dedup_floats_in_order(values: Vec<f64>) -> Vec<f64> {
    let mut seen: Vec<f64> = Vec::with_capacity(values.len());
    for value in values {
        if !seen.iter().any(|kept| kept.to_bits() == value.to_bits()) {
            seen.push(value);
        }
    }
    seen
}
