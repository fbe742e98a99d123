/*!
 * Exam Configuration
 * Read-only configuration supplied to the core: counts, timings, threshold
 *
 * `generate` derives the randomized production configuration the way the
 * admissions office does it: roughly ten candidates per place, with small
 * randomized ineligible and retake fractions.
 */

use crate::core::errors::{ExamError, ExamResult};
use crate::core::random;
use crate::core::timing::ExamTiming;
use crate::core::types::{Score, DEFAULT_PASS_THRESHOLD};
use log::info;
use std::path::PathBuf;
use std::time::Duration;

/// Full exam configuration
#[derive(Debug, Clone)]
pub struct ExamConfig {
    /// Number of places available
    pub place_count: usize,
    /// Delay before the exam starts
    pub start_delay: Duration,
    /// Number of candidates taking the exam
    pub candidate_count: usize,
    /// Candidates pre-selected as ineligible
    pub ineligible_count: usize,
    /// Candidates retaking only the practical stage
    pub retake_count: usize,
    /// Per-answer preparation times for the theoretical stage (seconds)
    pub times_a: [f64; 5],
    /// Per-answer preparation times for the practical stage (seconds)
    pub times_b: [f64; 3],
    /// Pass threshold for the theoretical stage (out of 100)
    pub pass_threshold: Score,
    /// Ranking-list output file, if any
    pub results_path: Option<PathBuf>,
    pub timing: ExamTiming,
}

impl ExamConfig {
    /// Randomized production configuration for a given number of places
    pub fn generate(place_count: usize, start_delay: Duration) -> ExamResult<Self> {
        if place_count == 0 {
            return Err(ExamError::InvalidArgument(
                "place count must be positive".to_string(),
            ));
        }

        let candidate_count = (random::range_f64(9.5, 10.5) * place_count as f64) as usize;
        let candidate_count = candidate_count.max(1);
        let ineligible_count =
            (random::range_f64(1.5, 2.5) * candidate_count as f64 / 100.0) as usize;
        let retake_count = (random::range_f64(1.5, 2.5) * candidate_count as f64 / 100.0) as usize;

        let mut times_a = [0.0; 5];
        for t in &mut times_a {
            *t = random::range_f64(0.5, 2.0);
        }
        let mut times_b = [0.0; 3];
        for t in &mut times_b {
            *t = random::range_f64(0.5, 2.0);
        }

        let config = Self {
            place_count,
            start_delay,
            candidate_count,
            ineligible_count,
            retake_count,
            times_a,
            times_b,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            results_path: Some(PathBuf::from("ranking.txt")),
            timing: ExamTiming::default(),
        };
        config.validate()?;

        info!(
            "Exam configured: {} places, {} candidates ({} ineligible, {} retaking), start in {:?}",
            config.place_count,
            config.candidate_count,
            config.ineligible_count,
            config.retake_count,
            config.start_delay
        );
        Ok(config)
    }

    /// Deterministic millisecond-scale profile for tests
    pub fn fixed(candidate_count: usize) -> Self {
        Self {
            place_count: candidate_count,
            start_delay: Duration::from_millis(20),
            candidate_count,
            ineligible_count: 0,
            retake_count: 0,
            times_a: [0.01; 5],
            times_b: [0.01; 3],
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            results_path: None,
            timing: ExamTiming::fast(),
        }
    }

    pub fn validate(&self) -> ExamResult<()> {
        if self.place_count == 0 {
            return Err(ExamError::InvalidArgument(
                "place count must be positive".to_string(),
            ));
        }
        if self.candidate_count == 0 {
            return Err(ExamError::InvalidArgument(
                "candidate count must be positive".to_string(),
            ));
        }
        if self.ineligible_count + self.retake_count > self.candidate_count {
            return Err(ExamError::InvalidArgument(format!(
                "ineligible ({}) plus retaking ({}) exceed candidate count ({})",
                self.ineligible_count, self.retake_count, self.candidate_count
            )));
        }
        if self.times_a.iter().chain(self.times_b.iter()).any(|t| *t <= 0.0) {
            return Err(ExamError::InvalidArgument(
                "answer times must be positive".to_string(),
            ));
        }
        if !self.pass_threshold.is_finite() || self.pass_threshold < 0.0 {
            return Err(ExamError::InvalidArgument(format!(
                "pass threshold {} out of range",
                self.pass_threshold
            )));
        }
        Ok(())
    }
}
