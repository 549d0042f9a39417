//! Property-based tests for the clock lattice and detector soundness.
//!
//! # VectorClock
//! - `join` is an upper bound of both inputs and the least one
//! - `leq` is reflexive, antisymmetric up to zero entries, transitive
//! - absent entries read as zero
//! - `first_uncovered` is `None` exactly when `leq` holds
//!
//! # Epoch
//! - same-thread epochs compare by counter
//! - cross-thread epochs are incomparable
//!
//! # Detector
//! - programs whose accesses all sit inside one lock never race
//! - two forked threads writing without synchronization always race

use fasttrack::{Detector, Epoch, ThreadId, VectorClock};
use proptest::prelude::*;
use std::collections::BTreeMap;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_vc() -> impl Strategy<Value = VectorClock> {
    prop::collection::btree_map(0u64..8, 1u64..20, 0..6).prop_map(|entries: BTreeMap<u64, u64>| {
        let mut vc = VectorClock::new();
        for (t, c) in entries {
            vc.set(ThreadId(t), c);
        }
        vc
    })
}

fn arb_epoch() -> impl Strategy<Value = Epoch> {
    (0u64..50, 0u64..8).prop_map(|(c, t)| Epoch::new(c, ThreadId(t)))
}

/// Operation of one worker thread: an access to one of a few names
#[derive(Debug, Clone)]
enum WorkerOp {
    Read(u8),
    Write(u8),
}

fn arb_worker_op() -> impl Strategy<Value = WorkerOp> {
    prop_oneof![
        (0u8..4).prop_map(WorkerOp::Read),
        (0u8..4).prop_map(WorkerOp::Write),
    ]
}

/// A schedule: which of the workers runs each critical section, and what it does
fn arb_schedule() -> impl Strategy<Value = Vec<(u64, Vec<WorkerOp>)>> {
    prop::collection::vec(
        (1u64..4, prop::collection::vec(arb_worker_op(), 1..4)),
        1..24,
    )
}

// ============================================================================
// VectorClock laws
// ============================================================================

proptest! {
    #[test]
    fn join_is_upper_bound(a in arb_vc(), b in arb_vc()) {
        let j = a.join(&b);
        prop_assert!(a.leq(&j));
        prop_assert!(b.leq(&j));
    }

    #[test]
    fn join_is_least_upper_bound(a in arb_vc(), b in arb_vc(), c in arb_vc()) {
        let j = a.join(&b);
        if a.leq(&c) && b.leq(&c) {
            prop_assert!(j.leq(&c));
        }
    }

    #[test]
    fn join_commutes_and_is_idempotent(a in arb_vc(), b in arb_vc()) {
        prop_assert_eq!(a.join(&b), b.join(&a));
        prop_assert_eq!(a.join(&a), a.clone());
    }

    #[test]
    fn join_in_matches_join(a in arb_vc(), b in arb_vc()) {
        let mut merged = a.clone();
        merged.join_in(&b);
        prop_assert_eq!(merged, a.join(&b));
    }

    #[test]
    fn leq_is_reflexive(a in arb_vc()) {
        prop_assert!(a.leq(&a));
    }

    #[test]
    fn leq_is_antisymmetric(a in arb_vc(), b in arb_vc()) {
        if a.leq(&b) && b.leq(&a) {
            for t in 0..8 {
                prop_assert_eq!(a.get(ThreadId(t)), b.get(ThreadId(t)));
            }
        }
    }

    #[test]
    fn leq_is_transitive(a in arb_vc(), b in arb_vc(), c in arb_vc()) {
        if a.leq(&b) && b.leq(&c) {
            prop_assert!(a.leq(&c));
        }
    }

    #[test]
    fn absent_entries_read_zero(a in arb_vc(), t in 100u64..1000) {
        prop_assert_eq!(a.get(ThreadId(t)), 0);
    }

    #[test]
    fn first_uncovered_agrees_with_leq(a in arb_vc(), b in arb_vc()) {
        match a.first_uncovered(&b) {
            None => prop_assert!(a.leq(&b)),
            Some(epoch) => {
                prop_assert!(!a.leq(&b));
                prop_assert!(!epoch.is_covered_by(&b));
                prop_assert_eq!(a.get(epoch.thread), epoch.clock);
            }
        }
    }

    #[test]
    fn join_does_not_alias_inputs(a in arb_vc(), b in arb_vc()) {
        let before = a.clone();
        let mut j = a.join(&b);
        j.increment(ThreadId(0));
        prop_assert_eq!(a, before);
    }
}

// ============================================================================
// Epoch laws
// ============================================================================

proptest! {
    #[test]
    fn same_thread_epochs_order_by_counter(c1 in 0u64..100, c2 in 0u64..100, t in 0u64..8) {
        let a = Epoch::new(c1, ThreadId(t));
        let b = Epoch::new(c2, ThreadId(t));
        prop_assert_eq!(a <= b, c1 <= c2);
    }

    #[test]
    fn cross_thread_epochs_are_incomparable(c in 0u64..100, t1 in 0u64..8, t2 in 0u64..8) {
        prop_assume!(t1 != t2);
        let a = Epoch::new(c, ThreadId(t1));
        let b = Epoch::new(c, ThreadId(t2));
        prop_assert!(!(a <= b));
        prop_assert!(!(b <= a));
        prop_assert_eq!(a.partial_cmp(&b), None);
    }

    #[test]
    fn epoch_covered_matches_singleton_clock(e in arb_epoch(), vc in arb_vc()) {
        let singleton = VectorClock::from_epochs([e]);
        prop_assert_eq!(e.is_covered_by(&vc), singleton.leq(&vc));
    }
}

// ============================================================================
// Detector soundness
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn single_lock_programs_never_race(schedule in arb_schedule()) {
        let mut d = Detector::builder().log_races(false).build();
        for t in 1..4 {
            d.fork(ThreadId(0), ThreadId(t)).unwrap();
        }

        for (t, ops) in &schedule {
            let t = ThreadId(*t);
            d.acquire(t, "L").unwrap();
            for op in ops {
                let verdict = match op {
                    WorkerOp::Read(v) => d.read(t, format!("v{v}")).unwrap(),
                    WorkerOp::Write(v) => d.write(t, format!("v{v}")).unwrap(),
                };
                prop_assert!(!verdict.is_race(), "{:?}", verdict);
            }
            d.rel(t, "L").unwrap();
        }
        prop_assert_eq!(d.race_count(), 0);
    }

    #[test]
    fn unsynchronized_writes_always_race(
        prefix in prop::collection::vec(arb_worker_op(), 0..8),
        first in 1u64..3,
    ) {
        let mut d = Detector::builder().log_races(false).build();
        d.fork(ThreadId(0), ThreadId(1)).unwrap();
        d.fork(ThreadId(0), ThreadId(2)).unwrap();

        let (a, b) = (ThreadId(first), ThreadId(3 - first));
        for op in &prefix {
            match op {
                WorkerOp::Read(v) => { let _ = d.read(a, format!("v{v}")).unwrap(); }
                WorkerOp::Write(v) => { let _ = d.write(a, format!("v{v}")).unwrap(); }
            }
        }
        prop_assert!(!d.write(a, "shared").unwrap().is_race());
        prop_assert!(d.write(b, "shared").unwrap().is_race());
    }

    #[test]
    fn forked_child_dominates_parent(depth in 1u64..10) {
        let mut d = Detector::new();
        for child in 1..=depth {
            let parent = ThreadId(child - 1);
            let before = d.thread_clock(parent).unwrap().clone();
            d.fork(parent, ThreadId(child)).unwrap();
            let clock = d.thread_clock(ThreadId(child)).unwrap();
            prop_assert!(before.leq(clock));
            prop_assert_eq!(clock.get(ThreadId(child)), 1);
            prop_assert_eq!(
                d.thread_clock(parent).unwrap().get(parent),
                before.get(parent) + 1
            );
        }
    }
}
