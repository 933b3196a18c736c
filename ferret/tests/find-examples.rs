//! End-to-end searches: find a satisfying example and minimize it.
//!
//! These exercise the whole engine through the public `find` entry
//! point: primitive, composite and streaming strategies, exhaustion
//! classification, assume-filters, and timeouts.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use ferret::*;

fn generous() -> Settings {
    Settings::default()
        .with_max_examples(2000)
        .with_max_shrinks(5000)
}

#[test]
fn test_can_find_an_int() {
    let zero = find(&ints(), Condition::new("anything", |_| true), &generous()).unwrap();
    assert_eq!(zero, 0);

    let threshold = find(
        &ints(),
        Condition::new("|x| x >= 13", |&x| x >= 13),
        &generous(),
    )
    .unwrap();
    assert_eq!(threshold, 13);
}

#[test]
fn test_can_find_list() {
    let found = find(
        &vec_of(ints()),
        Condition::new("|xs| sum(xs) >= 10", |xs: &Vec<i64>| {
            // saturating: drawn vectors can contain i64 extremes
            xs.iter().fold(0i64, |acc, &x| acc.saturating_add(x)) >= 10
        }),
        &generous(),
    )
    .unwrap();
    assert_eq!(found.iter().sum::<i64>(), 10);
}

#[test]
fn test_can_find_nan() {
    let found = find(
        &floats(),
        Condition::new("is_nan", |x: &f64| x.is_nan()),
        &generous(),
    )
    .unwrap();
    assert!(found.is_nan());
}

#[test]
fn test_can_find_nans() {
    let found = find(
        &vec_of(floats()),
        Condition::new("|xs| sum(xs) is NaN", |xs: &Vec<f64>| {
            xs.iter().sum::<f64>().is_nan()
        }),
        &generous(),
    )
    .unwrap();
    if found.len() == 1 {
        assert!(found[0].is_nan());
    } else {
        assert!((2..=3).contains(&found.len()));
    }
}

#[test]
fn test_find_streaming_int() {
    let n = 100;
    let found = find(
        &streaming(ints()),
        Condition::new("first n elements all >= 1", move |stream: &Stream<IntStrategy>| {
            stream.prefix(n).iter().all(|&t| t >= 1)
        }),
        &Settings::default()
            .with_max_examples(5000)
            .with_max_shrinks(20_000),
    )
    .unwrap();
    assert_eq!(found.prefix(n), vec![1; n]);
}

#[test]
fn test_find_dictionary() {
    let found = find(
        &map_of(ints(), ints()),
        Condition::new("some key exceeds its value", |m: &std::collections::BTreeMap<i64, i64>| {
            m.iter().any(|(k, v)| k > v)
        }),
        &generous(),
    )
    .unwrap();
    assert_eq!(found.len(), 1);
}

#[test]
fn test_minimal_example_respects_assume_filters() {
    let found = find(
        &ints(),
        Condition::filtered("even x >= 10", |&x: &i64| {
            assume(x % 2 == 0)?;
            Ok(x >= 10)
        }),
        &generous(),
    )
    .unwrap();
    assert_eq!(found, 10);
}

#[test]
fn test_raises_when_no_example() {
    let settings = Settings::default()
        .with_max_examples(20)
        .with_min_satisfying_examples(0);
    let error = find(&ints(), Condition::new("|x| false", |_| false), &settings).unwrap_err();
    assert!(matches!(error, SearchError::NoSuchExample { .. }));
}

#[test]
fn test_raises_more_specifically_when_exhausted() {
    let error = find(
        &bools(),
        Condition::new("|b| false", |_| false),
        &Settings::default(),
    )
    .unwrap_err();
    assert!(matches!(error, SearchError::DefinitelyNoSuchExample { .. }));
}

#[test]
fn test_only_raises_conclusively_if_actually_considered_all() {
    let considered: Rc<RefCell<HashSet<i64>>> = Rc::new(RefCell::new(HashSet::new()));
    let recorded = considered.clone();
    let settings = Settings::default()
        .with_max_examples(100)
        .with_min_satisfying_examples(0);

    let error = find(
        &sampled_from((0..100i64).collect()),
        Condition::new("consider and record", move |&x: &i64| {
            recorded.borrow_mut().insert(x);
            false
        }),
        &settings,
    )
    .unwrap_err();

    // 100 uniform draws over 100 values almost never cover the domain,
    // and an incomplete enumeration must never claim a proof.
    if considered.borrow().len() < 100 {
        assert!(matches!(error, SearchError::NoSuchExample { .. }));
    } else {
        assert!(matches!(error, SearchError::DefinitelyNoSuchExample { .. }));
    }
}

#[test]
fn test_condition_is_named_in_errors() {
    let settings = Settings::default()
        .with_max_examples(20)
        .with_min_satisfying_examples(0);

    let error = find(
        &bools(),
        Condition::new("|b| false", |_| false),
        &settings,
    )
    .unwrap_err();
    assert!(error.to_string().contains("|b| false"));

    let error = find(
        &ints(),
        Condition::new("|x| '☃' in str(x)", |_| false),
        &settings,
    )
    .unwrap_err();
    assert!(error.to_string().contains("|x| '☃' in str(x)"));

    fn bad(_: &i64) -> bool {
        false
    }
    let error = find(&ints(), Condition::new("bad", bad), &settings).unwrap_err();
    assert!(error.to_string().contains("bad"));
}

#[test]
fn test_times_out() {
    let settings = Settings::default().with_timeout_secs(0.01).unwrap();
    let error = find(
        &ints(),
        Condition::new("sleep then fail", |_| {
            std::thread::sleep(Duration::from_millis(50));
            false
        }),
        &settings,
    )
    .unwrap_err();

    match error {
        SearchError::Timeout { condition, .. } => assert_eq!(condition, "sleep then fail"),
        other => panic!("expected a timeout, got: {other}"),
    }
}
