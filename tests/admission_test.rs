//! Seat admission integration tests
//!
//! The bounded-seats property: with seats opened once, no more than the seat
//! capacity of candidates ever hold a seat concurrently, and every claimant
//! is eventually admitted as seats are returned.

use exam_sim::candidate::{claim_seat, release_seat};
use exam_sim::core::types::SEAT_CAPACITY;
use exam_sim::region::SharedRegion;
use exam_sim::sync::CancelToken;
use exam_sim::{CommissionKind, ExamTiming};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_concurrent_claims_never_exceed_capacity() {
    const CLAIMANTS: usize = 5;

    let region = Arc::new(SharedRegion::new(CLAIMANTS));
    region.open_seats(CommissionKind::A);

    let seated = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let admitted = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..CLAIMANTS)
        .map(|i| {
            let region = Arc::clone(&region);
            let seated = Arc::clone(&seated);
            let peak = Arc::clone(&peak);
            let admitted = Arc::clone(&admitted);
            thread::spawn(move || {
                let pid = i as u32 + 1;
                let token = CancelToken::new();
                let seat = claim_seat(&region, CommissionKind::A, pid, &token, &ExamTiming::fast())
                    .unwrap()
                    .unwrap();

                let now = seated.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(15));
                seated.fetch_sub(1, Ordering::SeqCst);

                release_seat(&region, CommissionKind::A, seat, pid);
                admitted.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(admitted.load(Ordering::SeqCst), CLAIMANTS);
    assert!(peak.load(Ordering::SeqCst) <= SEAT_CAPACITY);
    assert_eq!(
        region.signal(CommissionKind::A).permits(),
        SEAT_CAPACITY
    );
    assert!(region.table(CommissionKind::A).all_empty());
}

#[test]
fn test_claimants_block_until_seats_open() {
    let region = Arc::new(SharedRegion::new(1));
    let claimed = Arc::new(AtomicUsize::new(0));

    let handle = {
        let region = Arc::clone(&region);
        let claimed = Arc::clone(&claimed);
        thread::spawn(move || {
            let token = CancelToken::new();
            claim_seat(&region, CommissionKind::B, 1, &token, &ExamTiming::fast())
                .unwrap()
                .unwrap();
            claimed.store(1, Ordering::SeqCst);
        })
    };

    thread::sleep(Duration::from_millis(40));
    assert_eq!(claimed.load(Ordering::SeqCst), 0);

    region.open_seats(CommissionKind::B);
    handle.join().unwrap();
    assert_eq!(claimed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cancelled_claimant_leaves_permits_intact() {
    let region = Arc::new(SharedRegion::new(1));
    region.open_seats(CommissionKind::A);

    // Drain the permits so the claimant has to wait.
    for _ in 0..SEAT_CAPACITY {
        region.signal(CommissionKind::A).acquire();
    }

    let token = CancelToken::new();
    let handle = {
        let region = Arc::clone(&region);
        let token = token.clone();
        thread::spawn(move || {
            claim_seat(&region, CommissionKind::A, 1, &token, &ExamTiming::fast()).unwrap()
        })
    };

    thread::sleep(Duration::from_millis(20));
    token.cancel();
    assert_eq!(handle.join().unwrap(), None);
    assert_eq!(region.signal(CommissionKind::A).permits(), 0);
    assert!(region.table(CommissionKind::A).all_empty());
}
