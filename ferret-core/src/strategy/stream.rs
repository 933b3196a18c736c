//! Streaming strategy: unbounded, lazily-realized, memoized sequences.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::{CandidateId, DomainSize, Strategy};
use crate::data::RandomSource;

/// Strategy producing unbounded [`Stream`] values over an element
/// strategy.
pub struct Streaming<S> {
    element: Rc<S>,
}

/// An unbounded stream of values drawn from `element`.
///
/// A predicate typically inspects only a finite prefix, so only that
/// prefix is ever drawn, and only realized elements are simplified.
pub fn streaming<S: Strategy>(element: S) -> Streaming<S> {
    Streaming {
        element: Rc::new(element),
    }
}

impl<S> Clone for Streaming<S> {
    fn clone(&self) -> Self {
        Streaming {
            element: self.element.clone(),
        }
    }
}

/// A lazily-materialized infinite sequence.
///
/// The stream owns a memo table of realized elements and its own forked
/// random source: elements are drawn on first access and memoized, so
/// repeated access is stable and late draws cannot perturb the search
/// driver's random stream.
pub struct Stream<S: Strategy> {
    element: Rc<S>,
    param: S::Param,
    realized: RefCell<Vec<S::Value>>,
    source: RefCell<RandomSource>,
    fingerprint: u64,
}

impl<S: Strategy> Stream<S> {
    fn new(element: Rc<S>, param: S::Param, source: RandomSource) -> Self {
        let fingerprint = source.state();
        Stream {
            element,
            param,
            realized: RefCell::new(Vec::new()),
            source: RefCell::new(source),
            fingerprint,
        }
    }

    /// The element at `index`, drawing and memoizing up to it as needed.
    pub fn get(&self, index: usize) -> S::Value {
        self.realize(index + 1);
        self.realized.borrow()[index].clone()
    }

    /// The first `n` elements, drawing and memoizing as needed.
    pub fn prefix(&self, n: usize) -> Vec<S::Value> {
        self.realize(n);
        self.realized.borrow()[..n].to_vec()
    }

    /// How many elements have been realized so far.
    pub fn realized_len(&self) -> usize {
        self.realized.borrow().len()
    }

    fn realize(&self, n: usize) {
        let mut realized = self.realized.borrow_mut();
        if realized.len() >= n {
            return;
        }
        let mut source = self.source.borrow_mut();
        while realized.len() < n {
            realized.push(self.element.draw(&self.param, &mut source));
        }
    }

    fn with_replaced(&self, index: usize, value: S::Value) -> Self {
        let mut realized = self.realized.borrow().clone();
        realized[index] = value;
        Stream {
            element: self.element.clone(),
            param: self.param.clone(),
            realized: RefCell::new(realized),
            source: RefCell::new(self.source.borrow().clone()),
            fingerprint: self.fingerprint,
        }
    }
}

impl<S: Strategy> Clone for Stream<S> {
    fn clone(&self) -> Self {
        Stream {
            element: self.element.clone(),
            param: self.param.clone(),
            realized: RefCell::new(self.realized.borrow().clone()),
            source: RefCell::new(self.source.borrow().clone()),
            fingerprint: self.fingerprint,
        }
    }
}

impl<S: Strategy> fmt::Debug for Stream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stream({:?}, ...)", self.realized.borrow())
    }
}

impl<S: Strategy> Strategy for Streaming<S> {
    type Value = Stream<S>;
    type Param = S::Param;

    fn parameter(&self, source: &mut RandomSource) -> S::Param {
        self.element.parameter(source)
    }

    fn draw(&self, param: &S::Param, source: &mut RandomSource) -> Stream<S> {
        Stream::new(self.element.clone(), param.clone(), source.fork())
    }

    /// Simplifies each realized element independently toward the element
    /// strategy's minimum; the unrealized suffix is left undrawn.
    fn simplify(&self, stream: &Stream<S>) -> Vec<Stream<S>> {
        let realized = stream.realized.borrow().clone();
        let mut out = Vec::new();
        for (index, value) in realized.iter().enumerate() {
            for candidate in self.element.simplify(value) {
                out.push(stream.with_replaced(index, candidate));
            }
        }
        out
    }

    fn domain_size(&self) -> DomainSize {
        DomainSize::Unbounded
    }

    fn candidate_id(&self, stream: &Stream<S>) -> CandidateId {
        let mut id = CandidateId(stream.fingerprint);
        for value in stream.realized.borrow().iter() {
            id = id.combine(self.element.candidate_id(value));
        }
        id
    }
}
