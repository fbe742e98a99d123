/*!
 * Shared Region
 * The single mutable shared resource of the simulation
 *
 * Four field groups, each behind exactly one lock: exam state, the two
 * commission tables, and the candidate array. The two admission signals
 * live here as well so every attached participant sees the same permits.
 * No lock is ever held while blocking on an admission signal, and the core
 * never nests acquisitions across different guard groups.
 */

use super::types::{CandidateRecord, CommissionTable, ExamState};
use crate::core::types::{CommissionKind, SEAT_CAPACITY};
use crate::sync::AdmissionSignal;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Shared-ownership handle passed to every participant
pub type RegionHandle = Arc<SharedRegion>;

/// Exam-wide shared state: flags, seat tables, candidate records, signals
pub struct SharedRegion {
    exam_state: Mutex<ExamState>,
    commission_a: Mutex<CommissionTable>,
    commission_b: Mutex<CommissionTable>,
    candidates: Mutex<Vec<CandidateRecord>>,
    signal_a: AdmissionSignal,
    signal_b: AdmissionSignal,
}

impl SharedRegion {
    /// Zero-filled region sized for exactly `candidate_count` records
    ///
    /// Admission signals start at zero; each commission raises its own to
    /// capacity once its worker pool is live.
    pub fn new(candidate_count: usize) -> Self {
        let state = ExamState {
            candidate_count,
            ..ExamState::default()
        };
        Self {
            exam_state: Mutex::new(state),
            commission_a: Mutex::new(CommissionTable::default()),
            commission_b: Mutex::new(CommissionTable::default()),
            candidates: Mutex::new((0..candidate_count).map(CandidateRecord::new).collect()),
            signal_a: AdmissionSignal::new(0),
            signal_b: AdmissionSignal::new(0),
        }
    }

    pub fn exam_state(&self) -> MutexGuard<'_, ExamState> {
        self.exam_state.lock()
    }

    pub fn table(&self, kind: CommissionKind) -> MutexGuard<'_, CommissionTable> {
        match kind {
            CommissionKind::A => self.commission_a.lock(),
            CommissionKind::B => self.commission_b.lock(),
        }
    }

    /// Non-blocking table access for best-effort cleanup paths
    pub fn try_table(&self, kind: CommissionKind) -> Option<MutexGuard<'_, CommissionTable>> {
        match kind {
            CommissionKind::A => self.commission_a.try_lock(),
            CommissionKind::B => self.commission_b.try_lock(),
        }
    }

    pub fn candidates(&self) -> MutexGuard<'_, Vec<CandidateRecord>> {
        self.candidates.lock()
    }

    pub fn signal(&self, kind: CommissionKind) -> &AdmissionSignal {
        match kind {
            CommissionKind::A => &self.signal_a,
            CommissionKind::B => &self.signal_b,
        }
    }

    pub fn candidate_count(&self) -> usize {
        self.exam_state.lock().candidate_count
    }

    /// Open all seats of a commission by raising its signal to capacity
    pub fn open_seats(&self, kind: CommissionKind) {
        for _ in 0..SEAT_CAPACITY {
            self.signal(kind).release();
        }
    }
}
