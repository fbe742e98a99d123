/*!
 * Commission Process
 * Role state machine for one grading commission
 *
 * Ordering invariant: the admission signal is raised to capacity only after
 * the worker pool is live, so a candidate can never claim a seat before a
 * worker exists to question it.
 */

use super::grading::{GradingLoop, GradingState};
use super::worker::WorkerPool;
use crate::core::errors::ExamResult;
use crate::core::timing::ExamTiming;
use crate::core::types::{CommissionKind, Pid, Score};
use crate::region::RegionHandle;
use crate::sync::CancelToken;
use log::info;

/// One grading commission (A: theoretical, B: practical)
pub struct CommissionProcess {
    kind: CommissionKind,
    region: RegionHandle,
    timing: ExamTiming,
    pass_threshold: Score,
}

impl CommissionProcess {
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
        }
    }

    /// Run the commission to completion or cancellation
    pub fn run(self, pid: Pid, token: &CancelToken) -> ExamResult<()> {
        info!(
            "Commission {} (pid {}) initializing with {} members",
            self.kind,
            pid,
            self.kind.member_count()
        );

        if !self.wait_for_start(token) {
            info!("Commission {} cancelled before exam start", self.kind);
            return Ok(());
        }

        // Workers must exist before any seat opens.
        let pool = WorkerPool::spawn(self.kind, self.region.clone(), self.timing)?;
        info!(
            "Commission {} releasing {} seats after exam start",
            self.kind,
            self.kind.capacity()
        );
        self.region.open_seats(self.kind);

        let mut grading = GradingLoop::new(
            self.kind,
            self.region.clone(),
            self.timing,
            self.pass_threshold,
        );
        let state = grading.run(token);

        // Finishing → Stopped: join workers, release resources.
        pool.shutdown();
        info!(
            "Commission {} stopped after grading {} candidates ({:?})",
            self.kind,
            grading.processed(),
            state
        );
        debug_assert_ne!(state, GradingState::Running);
        Ok(())
    }

    /// Poll the exam-started flag; false when cancelled while waiting
    fn wait_for_start(&self, token: &CancelToken) -> bool {
        info!("Commission {} waiting for exam start", self.kind);
        loop {
            if self.region.exam_state().started {
                return true;
            }
            if !token.sleep(self.timing.start_poll) {
                return false;
            }
        }
    }
}
