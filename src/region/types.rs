/*!
 * Region Data Model
 * Candidate records, commission seat tables, and exam-wide state
 *
 * Every mutator must hold the matching lock owned by `SharedRegion`; the
 * types here carry no synchronization of their own.
 */

use crate::core::types::{CommissionKind, Pid, Score, SEAT_CAPACITY};
use serde::{Deserialize, Serialize};

/// Sentinel score meaning "not yet graded"
pub const SCORE_UNGRADED: Score = -1.0;

/// Candidate lifecycle status
///
/// Pending → NotEligible | PendingCommissionA → Failed | PendingCommissionB
/// → Passed; Terminated is reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Pending,
    NotEligible,
    PendingCommissionA,
    Failed,
    PendingCommissionB,
    Passed,
    Terminated,
}

impl CandidateStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CandidateStatus::NotEligible
                | CandidateStatus::Failed
                | CandidateStatus::Passed
                | CandidateStatus::Terminated
        )
    }
}

/// One candidate's record in the shared region
///
/// Created once at spawn by the dean; scores are mutated only by the
/// commission grading loops; Terminated is set by the process registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub index: usize,
    pub pid: Option<Pid>,
    pub theoretical_score: Score,
    pub practical_score: Score,
    pub final_score: Score,
    pub status: CandidateStatus,
}

impl CandidateRecord {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            pid: None,
            theoretical_score: SCORE_UNGRADED,
            practical_score: SCORE_UNGRADED,
            final_score: SCORE_UNGRADED,
            status: CandidateStatus::Pending,
        }
    }

    /// Score for the stage graded by the given commission
    pub fn score(&self, kind: CommissionKind) -> Score {
        match kind {
            CommissionKind::A => self.theoretical_score,
            CommissionKind::B => self.practical_score,
        }
    }

    pub fn set_score(&mut self, kind: CommissionKind, score: Score) {
        match kind {
            CommissionKind::A => self.theoretical_score = score,
            CommissionKind::B => self.practical_score = score,
        }
    }

    pub fn is_graded(&self, kind: CommissionKind) -> bool {
        self.score(kind) >= 0.0
    }
}

/// One bounded examination slot
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SeatRecord {
    pub occupant: Option<Pid>,
    pub question_mask: u32,
    pub answered: bool,
}

impl SeatRecord {
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    /// Claim the seat for a candidate, clearing mask and answered flag
    pub fn claim(&mut self, pid: Pid) {
        self.occupant = Some(pid);
        self.question_mask = 0;
        self.answered = false;
    }

    /// Return the seat to its initial empty state; grading loop only
    pub fn reset(&mut self) {
        self.occupant = None;
        self.question_mask = 0;
        self.answered = false;
    }

    pub fn fully_questioned(&self, kind: CommissionKind) -> bool {
        self.question_mask == kind.full_mask()
    }
}

/// Seat table for one commission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommissionTable {
    pub seats: [SeatRecord; SEAT_CAPACITY],
}

impl CommissionTable {
    /// Index of the first empty seat, if any
    pub fn find_empty(&self) -> Option<usize> {
        self.seats.iter().position(SeatRecord::is_empty)
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|s| !s.is_empty()).count()
    }

    pub fn all_empty(&self) -> bool {
        self.seats.iter().all(SeatRecord::is_empty)
    }
}

/// Exam-wide flags, counts, and commission identities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamState {
    pub started: bool,
    pub candidate_count: usize,
    pub target_a: usize,
    pub target_b: usize,
    pub commission_a_pid: Option<Pid>,
    pub commission_b_pid: Option<Pid>,
}

impl ExamState {
    /// Target number of candidates the given commission must grade
    pub fn target(&self, kind: CommissionKind) -> usize {
        match kind {
            CommissionKind::A => self.target_a,
            CommissionKind::B => self.target_b,
        }
    }

    pub fn decrement_target(&mut self, kind: CommissionKind) {
        match kind {
            CommissionKind::A => self.target_a = self.target_a.saturating_sub(1),
            CommissionKind::B => self.target_b = self.target_b.saturating_sub(1),
        }
    }

    pub fn commission_pid(&self, kind: CommissionKind) -> Option<Pid> {
        match kind {
            CommissionKind::A => self.commission_a_pid,
            CommissionKind::B => self.commission_b_pid,
        }
    }

    pub fn set_commission_pid(&mut self, kind: CommissionKind, pid: Option<Pid>) {
        match kind {
            CommissionKind::A => self.commission_a_pid = pid,
            CommissionKind::B => self.commission_b_pid = pid,
        }
    }
}
