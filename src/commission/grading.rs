/*!
 * Commission Grading Loop
 * Polls seats for answered candidates, scores them, frees seats, returns
 * permits
 *
 * State machine: Running → Finishing → Stopped. At most one seat is graded
 * per iteration to bound critical-section length, and the loop never holds
 * two guard-group locks at once.
 */

use crate::core::random;
use crate::core::timing::ExamTiming;
use crate::core::types::{CommissionKind, Pid, Score};
use crate::region::RegionHandle;
use crate::sync::CancelToken;
use log::{debug, info, warn};

/// Grading loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradingState {
    Running,
    Finishing,
    Stopped,
}

/// Outcome of inspecting one answered seat
enum SeatOutcome {
    /// Seat freed without grading (missing or already-graded record)
    Reclaimed,
    /// Candidate scored
    Graded(Score),
}

/// One commission's grading control loop
pub struct GradingLoop {
    kind: CommissionKind,
    region: RegionHandle,
    timing: ExamTiming,
    pass_threshold: Score,
    processed: usize,
}

impl GradingLoop {
    pub fn new(
        kind: CommissionKind,
        region: RegionHandle,
        timing: ExamTiming,
        pass_threshold: Score,
    ) -> Self {
        Self {
            kind,
            region,
            timing,
            pass_threshold,
            processed: 0,
        }
    }

    /// Run until the target is met or the token is cancelled
    ///
    /// Returns Finishing on normal completion, Stopped on cancellation.
    pub fn run(&mut self, token: &CancelToken) -> GradingState {
        info!("Commission {} grading loop running", self.kind);

        loop {
            if token.is_cancelled() {
                return GradingState::Stopped;
            }

            if self.maybe_finish() {
                info!(
                    "Commission {} processed all {} candidates, finishing",
                    self.kind, self.processed
                );
                return GradingState::Finishing;
            }

            self.grade_one();

            if !token.sleep(self.timing.grading_poll) {
                return GradingState::Stopped;
            }
        }
    }

    /// True once the target is met and every seat is empty
    ///
    /// For commission B this also clears the exam-started flag, the sole
    /// trigger ending the exam.
    pub fn maybe_finish(&mut self) -> bool {
        let target = self.region.exam_state().target(self.kind);
        if self.processed < target {
            return false;
        }

        if !self.region.table(self.kind).all_empty() {
            debug!(
                "Commission {} met its target but seats are still occupied",
                self.kind
            );
            return false;
        }

        if self.kind == CommissionKind::B {
            info!("Commission B finished, ending exam");
            self.region.exam_state().started = false;
        }
        true
    }

    /// Grade (or reclaim) at most one answered seat; true when a seat was
    /// freed
    pub fn grade_one(&mut self) -> bool {
        // Snapshot the first answered seat without holding the lock further.
        let claim = {
            let table = self.region.table(self.kind);
            table
                .seats
                .iter()
                .enumerate()
                .find_map(|(seat, s)| match (s.answered, s.occupant) {
                    (true, Some(pid)) => Some((seat, pid)),
                    _ => None,
                })
        };
        let Some((seat, pid)) = claim else {
            return false;
        };

        match self.score_candidate(pid) {
            SeatOutcome::Reclaimed => {}
            SeatOutcome::Graded(score) => {
                self.processed += 1;
                // Commission A gates eligibility for B: a failed candidate
                // will never sit the practical stage.
                if self.kind == CommissionKind::A && score < self.pass_threshold {
                    self.region
                        .exam_state()
                        .decrement_target(CommissionKind::B);
                }
                self.log_progress();
            }
        }

        // Free the seat and return the permit.
        {
            let mut table = self.region.table(self.kind);
            table.seats[seat].reset();
        }
        self.region.signal(self.kind).release();
        true
    }

    /// Score the occupant of an answered seat
    fn score_candidate(&self, pid: Pid) -> SeatOutcome {
        let mut candidates = self.region.candidates();
        match candidates.iter_mut().find(|c| c.pid == Some(pid)) {
            None => {
                // Candidate exited (e.g. evacuated) after claiming the seat.
                warn!(
                    "Commission {} found answered seat for pid {} with no record, freeing seat",
                    self.kind, pid
                );
                SeatOutcome::Reclaimed
            }
            Some(record) if record.is_graded(self.kind) => {
                debug!(
                    "Commission {} seat occupant pid {} already graded, freeing seat",
                    self.kind, pid
                );
                SeatOutcome::Reclaimed
            }
            Some(record) => {
                let score = random::sample_mean(self.kind.member_count(), 0.0, 100.0);
                record.set_score(self.kind, score);
                info!(
                    "Commission {} graded candidate {} (pid {}): {:.1}",
                    self.kind, record.index, pid, score
                );
                SeatOutcome::Graded(score)
            }
        }
    }

    fn log_progress(&self) {
        let target = self.region.exam_state().target(self.kind);
        if target > 0 {
            info!(
                "Commission {}: {:.0}% of candidates graded ({}/{})",
                self.kind,
                self.processed as f64 / target as f64 * 100.0,
                self.processed,
                target
            );
        }
    }

    pub fn processed(&self) -> usize {
        self.processed
    }
}
