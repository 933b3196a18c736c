//! Sequence and mapping strategies built over element strategies.

use std::collections::BTreeMap;
use std::fmt;

use super::{CandidateId, DomainSize, Strategy};
use crate::data::RandomSource;

/// Length is decided by a continuation coin-flip out of this many sides.
const CONTINUE_DIE: u64 = 16;

/// Per-candidate parameter for a sequence draw: one continue weight and
/// one element parameter shared by every element.
#[derive(Clone)]
pub struct VecParam<P> {
    continue_weight: u64,
    element: P,
}

/// Strategy over variable-length vectors of an element strategy.
#[derive(Debug, Clone)]
pub struct VecStrategy<S> {
    element: S,
    max_len: usize,
}

/// Vectors of values drawn from `element`, length decided by a
/// continuation coin-flip.
pub fn vec_of<S: Strategy>(element: S) -> VecStrategy<S> {
    VecStrategy {
        element,
        max_len: 100,
    }
}

impl<S> VecStrategy<S> {
    /// Cap drawn vectors at `max_len` elements.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }
}

impl<S: Strategy> Strategy for VecStrategy<S> {
    type Value = Vec<S::Value>;
    type Param = VecParam<S::Param>;

    fn parameter(&self, source: &mut RandomSource) -> Self::Param {
        VecParam {
            continue_weight: [6, 12, 14][source.next_bounded(3) as usize],
            element: self.element.parameter(source),
        }
    }

    fn draw(&self, param: &Self::Param, source: &mut RandomSource) -> Vec<S::Value> {
        let mut out = Vec::new();
        while out.len() < self.max_len && source.next_bounded(CONTINUE_DIE) < param.continue_weight
        {
            out.push(self.element.draw(&param.element, source));
        }
        out
    }

    /// Whole-run removal first (biggest wins first), then per-element
    /// simplification: removals usually buy more per attempt.
    fn simplify(&self, values: &Vec<S::Value>) -> Vec<Vec<S::Value>> {
        let mut out = Vec::new();
        if values.is_empty() {
            return out;
        }
        out.push(Vec::new());

        let len = values.len();
        let mut run = len / 2;
        while run >= 1 {
            let mut start = 0;
            while start + run <= len {
                let mut shorter = Vec::with_capacity(len - run);
                shorter.extend_from_slice(&values[..start]);
                shorter.extend_from_slice(&values[start + run..]);
                out.push(shorter);
                start += run;
            }
            run /= 2;
        }

        for index in 0..len {
            for candidate in self.element.simplify(&values[index]) {
                let mut replaced = values.clone();
                replaced[index] = candidate;
                out.push(replaced);
            }
        }
        out
    }

    fn domain_size(&self) -> DomainSize {
        DomainSize::Unbounded
    }

    fn candidate_id(&self, values: &Vec<S::Value>) -> CandidateId {
        let mut id = CandidateId(values.len() as u64);
        for value in values {
            id = id.combine(self.element.candidate_id(value));
        }
        id
    }
}

/// Per-candidate parameter for a mapping draw.
#[derive(Clone)]
pub struct MapParam<KP, VP> {
    continue_weight: u64,
    key: KP,
    value: VP,
}

/// Strategy over mappings with unique drawn keys.
#[derive(Debug, Clone)]
pub struct MapStrategy<K, V> {
    key: K,
    value: V,
    max_len: usize,
}

/// Mappings from `key`-drawn keys to `value`-drawn values. Duplicate key
/// draws are skipped, so minimal satisfying mappings tend toward a
/// single entry.
pub fn map_of<K, V>(key: K, value: V) -> MapStrategy<K, V>
where
    K: Strategy,
    V: Strategy,
    K::Value: Ord,
{
    MapStrategy {
        key,
        value,
        max_len: 100,
    }
}

impl<K, V> Strategy for MapStrategy<K, V>
where
    K: Strategy,
    V: Strategy,
    K::Value: Ord,
{
    type Value = BTreeMap<K::Value, V::Value>;
    type Param = MapParam<K::Param, V::Param>;

    fn parameter(&self, source: &mut RandomSource) -> Self::Param {
        MapParam {
            continue_weight: [6, 12, 14][source.next_bounded(3) as usize],
            key: self.key.parameter(source),
            value: self.value.parameter(source),
        }
    }

    fn draw(&self, param: &Self::Param, source: &mut RandomSource) -> Self::Value {
        let mut out = BTreeMap::new();
        while out.len() < self.max_len && source.next_bounded(CONTINUE_DIE) < param.continue_weight
        {
            let key = self.key.draw(&param.key, source);
            if let std::collections::btree_map::Entry::Vacant(slot) = out.entry(key) {
                slot.insert(self.value.draw(&param.value, source));
            }
        }
        out
    }

    /// Entry removal first, then key simplification (re-keying when the
    /// simpler key slot is free), then value simplification.
    fn simplify(&self, entries: &Self::Value) -> Vec<Self::Value> {
        let mut out = Vec::new();
        if entries.is_empty() {
            return out;
        }
        out.push(BTreeMap::new());

        for key in entries.keys() {
            let mut smaller = entries.clone();
            smaller.remove(key);
            out.push(smaller);
        }

        for (key, value) in entries {
            for simpler_key in self.key.simplify(key) {
                if entries.contains_key(&simpler_key) {
                    continue;
                }
                let mut rekeyed = entries.clone();
                rekeyed.remove(key);
                rekeyed.insert(simpler_key, value.clone());
                out.push(rekeyed);
            }
        }

        for (key, value) in entries {
            for simpler_value in self.value.simplify(value) {
                let mut replaced = entries.clone();
                replaced.insert(key.clone(), simpler_value);
                out.push(replaced);
            }
        }
        out
    }

    fn domain_size(&self) -> DomainSize {
        DomainSize::Unbounded
    }

    fn candidate_id(&self, entries: &Self::Value) -> CandidateId {
        let mut id = CandidateId(entries.len() as u64);
        for (key, value) in entries {
            id = id
                .combine(self.key.candidate_id(key))
                .combine(self.value.candidate_id(value));
        }
        id
    }
}

impl<P: fmt::Debug> fmt::Debug for VecParam<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VecParam")
            .field("continue_weight", &self.continue_weight)
            .field("element", &self.element)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Seed;
    use crate::strategy::{int_range, ints};

    fn source() -> RandomSource {
        RandomSource::from_seed(Seed::from_u64(0xfee1))
    }

    #[test]
    fn test_vec_draws_vary_in_length() {
        let strategy = vec_of(int_range(0, 9));
        let mut source = source();
        let mut lengths = std::collections::HashSet::new();
        for _ in 0..200 {
            let param = strategy.parameter(&mut source);
            lengths.insert(strategy.draw(&param, &mut source).len());
        }
        assert!(lengths.len() > 3);
        assert!(lengths.contains(&0));
    }

    #[test]
    fn test_vec_simplify_proposes_empty_first() {
        let strategy = vec_of(ints());
        let candidates = strategy.simplify(&vec![3, 7, 9]);
        assert_eq!(candidates[0], Vec::<i64>::new());
    }

    #[test]
    fn test_vec_simplify_removes_runs_before_elements() {
        let strategy = vec_of(ints());
        let values = vec![10, 20, 30, 40];
        let candidates = strategy.simplify(&values);

        let first_shorter = candidates.iter().position(|c| c.len() < values.len());
        let first_replaced = candidates
            .iter()
            .position(|c| c.len() == values.len() && *c != values);
        assert!(first_shorter.unwrap() < first_replaced.unwrap());

        // largest removals come before single-element removals
        assert_eq!(candidates[1], vec![30, 40]);
        assert_eq!(candidates[2], vec![10, 20]);
    }

    #[test]
    fn test_vec_simplify_of_empty_is_fixed_point() {
        let strategy = vec_of(ints());
        assert!(strategy.simplify(&Vec::new()).is_empty());
    }

    #[test]
    fn test_vec_candidate_id_is_order_sensitive() {
        let strategy = vec_of(ints());
        assert_ne!(
            strategy.candidate_id(&vec![0, 1]),
            strategy.candidate_id(&vec![1, 0])
        );
        assert_ne!(
            strategy.candidate_id(&vec![0]),
            strategy.candidate_id(&vec![0, 0])
        );
    }

    #[test]
    fn test_map_draws_respect_cap() {
        let strategy = map_of(int_range(0, 3), ints());
        let mut source = source();
        for _ in 0..100 {
            let param = strategy.parameter(&mut source);
            assert!(strategy.draw(&param, &mut source).len() <= 4);
        }
    }

    #[test]
    fn test_map_simplify_removes_entries_first() {
        let strategy = map_of(ints(), ints());
        let entries: BTreeMap<i64, i64> = [(5, 1), (9, 2)].into_iter().collect();
        let candidates = strategy.simplify(&entries);

        assert!(candidates[0].is_empty());
        assert_eq!(candidates[1].len(), 1);
        assert_eq!(candidates[2].len(), 1);
    }

    #[test]
    fn test_map_rekeying_skips_occupied_slots() {
        let strategy = map_of(ints(), ints());
        let entries: BTreeMap<i64, i64> = [(0, 1), (4, 2)].into_iter().collect();
        for candidate in strategy.simplify(&entries) {
            // re-keying 4 toward 0 must never clobber the existing 0 entry
            let rekeyed = candidate.len() == 2 && !candidate.contains_key(&4);
            if rekeyed {
                assert_eq!(candidate[&0], 1);
                assert!(candidate.keys().all(|&k| (1..4).contains(&k) || k == 0));
            }
        }
    }
}
