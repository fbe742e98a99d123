/*!
 * Candidate Process
 * Two-stage candidate protocol: theoretical (commission A), then practical
 * (commission B) for those who pass
 *
 * Every wait is a cancellable poll; on cancellation a held seat is released
 * best-effort and the candidate exits without assuming in-flight table
 * mutations completed.
 */

use super::seat::{claim_seat, release_seat};
use crate::core::errors::{ExamError, ExamResult};
use crate::core::timing::ExamTiming;
use crate::core::types::{CommissionKind, Pid, Score, SeatIndex};
use crate::region::{CandidateStatus, RegionHandle};
use crate::sync::CancelToken;
use log::info;
use std::time::Duration;

/// Outcome of sitting one examination stage
enum StageOutcome {
    /// Cancelled (rejection, termination, or evacuation)
    Cancelled,
    Graded(Score),
}

/// One examination candidate
pub struct CandidateProcess {
    index: usize,
    region: RegionHandle,
    times_a: [f64; 5],
    times_b: [f64; 3],
    pass_threshold: Score,
    timing: ExamTiming,
}

impl CandidateProcess {
    pub fn new(
        index: usize,
        region: RegionHandle,
        times_a: [f64; 5],
        times_b: [f64; 3],
        pass_threshold: Score,
        timing: ExamTiming,
    ) -> Self {
        Self {
            index,
            region,
            times_a,
            times_b,
            pass_threshold,
            timing,
        }
    }

    /// Run the candidate to a terminal status or cancellation
    pub fn run(self, pid: Pid, token: &CancelToken) -> ExamResult<()> {
        if !self.wait_for_start(token) {
            // Rejected before the exam started, or evacuated.
            info!("Candidate {} (pid {}) exiting before exam start", self.index, pid);
            return Ok(());
        }

        // A pre-seeded theoretical score marks a retaking candidate.
        let retaking = self.record_score(CommissionKind::A, pid)? >= 0.0;

        if !retaking {
            match self.sit_stage(CommissionKind::A, pid, token)? {
                StageOutcome::Cancelled => return Ok(()),
                StageOutcome::Graded(score) => {
                    if score < self.pass_threshold {
                        self.set_status(CandidateStatus::Failed);
                        info!(
                            "Candidate {} (pid {}) failed the theoretical stage ({:.1})",
                            self.index, pid, score
                        );
                        return Ok(());
                    }
                    self.set_status(CandidateStatus::PendingCommissionB);
                }
            }
        } else {
            info!(
                "Candidate {} (pid {}) is retaking, skipping the theoretical stage",
                self.index, pid
            );
        }

        match self.sit_stage(CommissionKind::B, pid, token)? {
            StageOutcome::Cancelled => Ok(()),
            StageOutcome::Graded(score) => {
                self.set_status(CandidateStatus::Passed);
                info!(
                    "Candidate {} (pid {}) passed the exam (practical {:.1})",
                    self.index, pid, score
                );
                Ok(())
            }
        }
    }

    /// Claim a seat, answer the questions, wait for the grade
    fn sit_stage(
        &self,
        kind: CommissionKind,
        pid: Pid,
        token: &CancelToken,
    ) -> ExamResult<StageOutcome> {
        let Some(seat) = claim_seat(&self.region, kind, pid, token, &self.timing)? else {
            return Ok(StageOutcome::Cancelled);
        };

        if !self.wait_for_questions(kind, seat, token) {
            release_seat(&self.region, kind, seat, pid);
            return Ok(StageOutcome::Cancelled);
        }

        // Answer preparation time, one slot per member question.
        if !token.sleep(self.answer_time(kind)) {
            release_seat(&self.region, kind, seat, pid);
            return Ok(StageOutcome::Cancelled);
        }
        self.submit_answers(kind, seat, pid);

        match self.wait_for_grading(kind, pid, token)? {
            Some(score) => Ok(StageOutcome::Graded(score)),
            None => {
                // Cancelled mid-grading: the seat may already be freed.
                release_seat(&self.region, kind, seat, pid);
                Ok(StageOutcome::Cancelled)
            }
        }
    }

    /// Poll the exam-started flag; false when cancelled while waiting
    fn wait_for_start(&self, token: &CancelToken) -> bool {
        loop {
            if self.region.exam_state().started {
                return true;
            }
            if !token.sleep(self.timing.start_poll) {
                return false;
            }
        }
    }

    /// Poll until every member of the commission has posed their question
    fn wait_for_questions(&self, kind: CommissionKind, seat: SeatIndex, token: &CancelToken) -> bool {
        info!(
            "Candidate {} waiting for questions from commission {}",
            self.index, kind
        );
        loop {
            {
                let table = self.region.table(kind);
                if table.seats[seat].fully_questioned(kind) {
                    return true;
                }
            }
            if !token.sleep(self.timing.candidate_poll) {
                return false;
            }
        }
    }

    /// Mark the answers as submitted; occupant-checked so a reclaimed seat
    /// is never mutated
    fn submit_answers(&self, kind: CommissionKind, seat: SeatIndex, pid: Pid) {
        let mut table = self.region.table(kind);
        if let Some(record) = table.seats.get_mut(seat) {
            if record.occupant == Some(pid) {
                record.answered = true;
                info!(
                    "Candidate {} (pid {}) answered commission {} questions",
                    self.index, pid, kind
                );
            }
        }
    }

    /// Poll the own record until the stage score arrives; Ok(None) when
    /// cancelled
    fn wait_for_grading(
        &self,
        kind: CommissionKind,
        pid: Pid,
        token: &CancelToken,
    ) -> ExamResult<Option<Score>> {
        loop {
            let score = self.record_score(kind, pid)?;
            if score >= 0.0 {
                return Ok(Some(score));
            }
            if !token.sleep(self.timing.candidate_poll) {
                return Ok(None);
            }
        }
    }

    fn record_score(&self, kind: CommissionKind, pid: Pid) -> ExamResult<Score> {
        let candidates = self.region.candidates();
        let record = candidates
            .get(self.index)
            .ok_or(ExamError::CandidateNotFound(pid))?;
        Ok(record.score(kind))
    }

    fn set_status(&self, status: CandidateStatus) {
        let mut candidates = self.region.candidates();
        if let Some(record) = candidates.get_mut(self.index) {
            record.status = status;
        }
    }

    fn answer_time(&self, kind: CommissionKind) -> Duration {
        let seconds: f64 = match kind {
            CommissionKind::A => self.times_a.iter().sum(),
            CommissionKind::B => self.times_b.iter().sum(),
        };
        Duration::from_secs_f64(seconds.max(0.0))
    }
}
