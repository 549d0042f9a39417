//! Kani proofs for the epoch order

use super::{Epoch, VectorClock};
use crate::domain::state::ThreadId;

/// Epochs of one thread compare exactly like their counters
#[kani::proof]
fn verify_epoch_same_thread_order() {
    let c1: u64 = kani::any();
    let c2: u64 = kani::any();
    let t = ThreadId(kani::any());

    assert_eq!(Epoch::new(c1, t) <= Epoch::new(c2, t), c1 <= c2);
}

/// Epochs of different threads never compare
#[kani::proof]
fn verify_epoch_cross_thread_incomparable() {
    let c: u64 = kani::any();
    let t1: u64 = kani::any();
    let t2: u64 = kani::any();
    kani::assume(t1 != t2);

    let a = Epoch::new(c, ThreadId(t1));
    let b = Epoch::new(c, ThreadId(t2));
    assert!(a.partial_cmp(&b).is_none());
}

/// An epoch read back out of a clock is covered by that clock
#[kani::proof]
#[kani::unwind(3)]
fn verify_epoch_covered_by_own_clock() {
    let c: u64 = kani::any();
    let t = ThreadId(kani::any());

    let mut vc = VectorClock::new();
    vc.set(t, c);
    assert!(vc.epoch_of(t).is_covered_by(&vc));
}
