/*!
 * Timing Configuration
 * Poll intervals, backoffs, and worker sleep bounds for every role
 *
 * Busy-polling over shared-state conditions is deliberate at this scale;
 * every interval is configurable so tests run in milliseconds.
 */

use std::time::Duration;

/// Timing knobs shared by all participants
#[derive(Debug, Clone, Copy)]
pub struct ExamTiming {
    /// Interval at which participants poll the exam-started flag
    pub start_poll: Duration,
    /// Grading loop iteration interval
    pub grading_poll: Duration,
    /// Interval at which candidates poll question/grading completion
    pub candidate_poll: Duration,
    /// Lower bound of a member's question-preparation sleep
    pub question_prep_min: Duration,
    /// Upper bound of a member's question-preparation sleep
    pub question_prep_max: Duration,
    /// Slice for cancellable admission-signal waits
    pub claim_wait: Duration,
    /// Backoff after a permit was granted but no seat was free
    pub claim_backoff: Duration,
    /// Interval at which the dean watches commissions and fault state
    pub dean_poll: Duration,
}

impl Default for ExamTiming {
    fn default() -> Self {
        Self {
            start_poll: Duration::from_secs(1),
            grading_poll: Duration::from_secs(1),
            candidate_poll: Duration::from_secs(1),
            question_prep_min: Duration::from_secs(2),
            question_prep_max: Duration::from_secs(5),
            claim_wait: Duration::from_millis(200),
            claim_backoff: Duration::from_millis(10),
            dean_poll: Duration::from_millis(500),
        }
    }
}

impl ExamTiming {
    /// Millisecond-scale profile for tests
    pub fn fast() -> Self {
        Self {
            start_poll: Duration::from_millis(5),
            grading_poll: Duration::from_millis(5),
            candidate_poll: Duration::from_millis(5),
            question_prep_min: Duration::from_millis(10),
            question_prep_max: Duration::from_millis(25),
            claim_wait: Duration::from_millis(20),
            claim_backoff: Duration::from_millis(2),
            dean_poll: Duration::from_millis(5),
        }
    }
}
