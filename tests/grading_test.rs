//! Commission and candidate interplay, without the lifecycle controller
//!
//! These drive real commission and candidate threads against a shared
//! region with hand-set targets.

use exam_sim::candidate::CandidateProcess;
use exam_sim::commission::CommissionProcess;
use exam_sim::region::{CandidateStatus, RegionHandle, SharedRegion};
use exam_sim::sync::CancelToken;
use exam_sim::{CommissionKind, ExamTiming};
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::sync::Arc;
use std::thread;

const FAST_A: [f64; 5] = [0.002; 5];
const FAST_B: [f64; 3] = [0.002; 3];

fn seeded_region(count: usize, status: CandidateStatus) -> RegionHandle {
    let region: RegionHandle = Arc::new(SharedRegion::new(count));
    {
        let mut state = region.exam_state();
        state.started = true;
        state.target_a = count;
        state.target_b = count;
    }
    {
        let mut candidates = region.candidates();
        for (i, record) in candidates.iter_mut().enumerate() {
            record.pid = Some(i as u32 + 1);
            record.status = status;
        }
    }
    region
}

fn spawn_commission(
    kind: CommissionKind,
    region: &RegionHandle,
    threshold: f64,
    token: &CancelToken,
) -> thread::JoinHandle<()> {
    let region = region.clone();
    let token = token.clone();
    thread::spawn(move || {
        CommissionProcess::new(kind, region, ExamTiming::fast(), threshold)
            .run(1000 + kind.member_count() as u32, &token)
            .unwrap();
    })
}

fn spawn_candidate(
    index: usize,
    region: &RegionHandle,
    threshold: f64,
    token: &CancelToken,
) -> thread::JoinHandle<()> {
    let region = region.clone();
    let token = token.clone();
    thread::spawn(move || {
        CandidateProcess::new(index, region, FAST_A, FAST_B, threshold, ExamTiming::fast())
            .run(index as u32 + 1, &token)
            .unwrap();
    })
}

#[test]
#[serial]
fn test_all_candidates_graded_through_both_stages() {
    const COUNT: usize = 5;

    // Threshold zero: every candidate passes the theoretical stage.
    let region = seeded_region(COUNT, CandidateStatus::PendingCommissionA);
    let token = CancelToken::new();

    let mut handles = vec![
        spawn_commission(CommissionKind::A, &region, 0.0, &token),
        spawn_commission(CommissionKind::B, &region, 0.0, &token),
    ];
    for i in 0..COUNT {
        handles.push(spawn_candidate(i, &region, 0.0, &token));
    }
    for h in handles {
        h.join().unwrap();
    }

    // Commission B's completion ends the exam.
    assert!(!region.exam_state().started);

    let candidates = region.candidates();
    for record in candidates.iter() {
        assert_eq!(record.status, CandidateStatus::Passed);
        assert!(record.theoretical_score >= 0.0);
        assert!(record.practical_score >= 0.0);
    }
    drop(candidates);

    assert!(region.table(CommissionKind::A).all_empty());
    assert!(region.table(CommissionKind::B).all_empty());
}

#[test]
#[serial]
fn test_universal_failure_retires_commission_b_ungraded() {
    const COUNT: usize = 4;

    // Threshold above any score: everyone fails the theoretical stage and
    // commission B's target shrinks to zero.
    let region = seeded_region(COUNT, CandidateStatus::PendingCommissionA);
    let token = CancelToken::new();

    let mut handles = vec![
        spawn_commission(CommissionKind::A, &region, 101.0, &token),
        spawn_commission(CommissionKind::B, &region, 101.0, &token),
    ];
    for i in 0..COUNT {
        handles.push(spawn_candidate(i, &region, 101.0, &token));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(region.exam_state().target_b, 0);
    let candidates = region.candidates();
    for record in candidates.iter() {
        assert_eq!(record.status, CandidateStatus::Failed);
        assert!(record.theoretical_score >= 0.0);
        // Nobody reached the practical stage.
        assert!(record.practical_score < 0.0);
    }
}

#[test]
#[serial]
fn test_retaking_candidates_skip_the_theoretical_stage() {
    const COUNT: usize = 2;

    let region = seeded_region(COUNT, CandidateStatus::PendingCommissionB);
    {
        let mut state = region.exam_state();
        // Only the practical stage runs for retaking candidates.
        state.target_a = 0;
        state.target_b = COUNT;
    }
    {
        let mut candidates = region.candidates();
        for record in candidates.iter_mut() {
            record.theoretical_score = 75.0;
        }
    }

    let token = CancelToken::new();
    let mut handles = vec![
        spawn_commission(CommissionKind::A, &region, 0.0, &token),
        spawn_commission(CommissionKind::B, &region, 0.0, &token),
    ];
    for i in 0..COUNT {
        handles.push(spawn_candidate(i, &region, 0.0, &token));
    }
    for h in handles {
        h.join().unwrap();
    }

    let candidates = region.candidates();
    for record in candidates.iter() {
        assert_eq!(record.status, CandidateStatus::Passed);
        // The carried-over theoretical score is never overwritten.
        assert_eq!(record.theoretical_score, 75.0);
        assert!(record.practical_score >= 0.0);
    }
}
