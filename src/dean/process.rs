/*!
 * Dean Process
 * Lifecycle controller: region setup, child spawning, verification, exam
 * start, supervision, and the final ranking list
 *
 * The dean is the only participant allowed to create or destroy the shared
 * region, broadcast termination, and raise the exam-started flag.
 */

use super::config::ExamConfig;
use crate::candidate::CandidateProcess;
use crate::commission::CommissionProcess;
use crate::core::errors::{ExamError, ExamResult};
use crate::core::random;
use crate::core::types::{CommissionKind, Pid};
use crate::region::{CandidateStatus, RegionHandle, RegionKey, RegionManager};
use crate::registry::{ProcessRegistry, Role};
use crate::results::{self, RankingReport};
use crate::sync::CancelToken;
use log::{info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Dean lifecycle phase, advanced strictly forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeanState {
    Initializing,
    SpawningChildren,
    AwaitingStart,
    Verifying,
    Running,
    Finished,
}

/// The exam lifecycle controller
pub struct DeanProcess {
    config: ExamConfig,
    manager: RegionManager,
    key: RegionKey,
    state: DeanState,
    evacuation: CancelToken,
}

impl DeanProcess {
    pub fn new(config: ExamConfig, manager: RegionManager) -> Self {
        Self {
            config,
            manager,
            key: RegionKey::from("entrance-exam"),
            state: DeanState::Initializing,
            evacuation: CancelToken::new(),
        }
    }

    /// Override the region lookup key; tests use per-case keys
    pub fn with_region_key(mut self, key: RegionKey) -> Self {
        self.key = key;
        self
    }

    /// Token that triggers an orderly evacuation when cancelled
    pub fn evacuation_token(&self) -> CancelToken {
        self.evacuation.clone()
    }

    pub fn state(&self) -> DeanState {
        self.state
    }

    /// Run the full exam lifecycle and produce the ranking list
    pub fn run(mut self) -> ExamResult<RankingReport> {
        self.config.validate()?;
        info!(
            "Dean initializing exam for {} candidates",
            self.config.candidate_count
        );

        let region = self
            .manager
            .initialize(&self.key, self.config.candidate_count)?;
        let registry = Arc::new(ProcessRegistry::new(region.clone()));
        let fault = registry.fault_token();

        self.state = DeanState::SpawningChildren;
        self.spawn_commissions(&region, &registry)?;
        let ineligible_pids = self.spawn_candidates(&region, &registry)?;

        self.state = DeanState::AwaitingStart;
        info!("Dean waiting {:?} before starting the exam", self.config.start_delay);
        if let Some(report) = self.await_start(&region, &registry, &fault)? {
            return Ok(report);
        }

        self.state = DeanState::Verifying;
        for pid in &ineligible_pids {
            registry.reject(*pid);
        }
        self.set_targets(&region);

        self.state = DeanState::Running;
        region.exam_state().started = true;
        info!("Exam started");

        if let Some(report) = self.supervise(&region, &registry, &fault)? {
            return Ok(report);
        }

        registry.join_all();
        self.state = DeanState::Finished;
        self.finish(&region, false)
    }

    /// Spawn both commissions and record their identities
    fn spawn_commissions(
        &self,
        region: &RegionHandle,
        registry: &Arc<ProcessRegistry>,
    ) -> ExamResult<()> {
        for kind in [CommissionKind::A, CommissionKind::B] {
            let manager = self.manager.clone();
            let key = self.key.clone();
            let timing = self.config.timing;
            let threshold = self.config.pass_threshold;
            let registry_ref = Arc::clone(registry);

            let pid = registry.spawn(Role::Commission(kind), move |pid, token| {
                match manager.attach(&key, pid) {
                    Ok(region) => {
                        let commission = CommissionProcess::new(kind, region, timing, threshold);
                        if let Err(e) = commission.run(pid, &token) {
                            registry_ref.report_fault(pid, &e);
                        }
                        let _ = manager.detach(&key, pid);
                    }
                    Err(e) => registry_ref.report_fault(pid, &ExamError::Region(e)),
                }
                registry_ref.unregister(pid);
            })?;

            region.exam_state().set_commission_pid(kind, Some(pid));
        }
        Ok(())
    }

    /// Spawn every candidate and seed its record
    ///
    /// Returns the pids of the randomly drawn ineligible candidates; their
    /// records are marked NotEligible before the exam-started flag can ever
    /// be raised.
    fn spawn_candidates(
        &self,
        region: &RegionHandle,
        registry: &Arc<ProcessRegistry>,
    ) -> ExamResult<Vec<Pid>> {
        let ineligible = random::distinct_indices(
            self.config.ineligible_count,
            self.config.candidate_count,
            &HashSet::new(),
        );
        let retaking = random::distinct_indices(
            self.config.retake_count,
            self.config.candidate_count,
            &ineligible,
        );

        let mut ineligible_pids = Vec::with_capacity(ineligible.len());
        for index in 0..self.config.candidate_count {
            let manager = self.manager.clone();
            let key = self.key.clone();
            let timing = self.config.timing;
            let threshold = self.config.pass_threshold;
            let times_a = self.config.times_a;
            let times_b = self.config.times_b;
            let registry_ref = Arc::clone(registry);

            let pid = registry.spawn(Role::Candidate(index), move |pid, token| {
                match manager.attach(&key, pid) {
                    Ok(region) => {
                        let candidate = CandidateProcess::new(
                            index, region, times_a, times_b, threshold, timing,
                        );
                        if let Err(e) = candidate.run(pid, &token) {
                            registry_ref.report_fault(pid, &e);
                        }
                        let _ = manager.detach(&key, pid);
                    }
                    Err(e) => registry_ref.report_fault(pid, &ExamError::Region(e)),
                }
                registry_ref.unregister(pid);
            })?;

            let mut candidates = region.candidates();
            let record = &mut candidates[index];
            record.pid = Some(pid);
            if ineligible.contains(&index) {
                record.status = CandidateStatus::NotEligible;
                ineligible_pids.push(pid);
            } else if retaking.contains(&index) {
                // Retaking candidates carry last year's theoretical score.
                record.theoretical_score = random::range_f64(30.0, 100.0);
                record.status = CandidateStatus::PendingCommissionB;
            } else {
                record.status = CandidateStatus::PendingCommissionA;
            }
        }

        info!(
            "Dean spawned {} candidates ({} ineligible, {} retaking)",
            self.config.candidate_count,
            ineligible.len(),
            retaking.len()
        );
        Ok(ineligible_pids)
    }

    /// Wait out the configured start delay, watching for evacuation or a
    /// child fault; Some(report) short-circuits the lifecycle
    fn await_start(
        &mut self,
        region: &RegionHandle,
        registry: &Arc<ProcessRegistry>,
        fault: &CancelToken,
    ) -> ExamResult<Option<RankingReport>> {
        let deadline = Instant::now() + self.config.start_delay;
        while Instant::now() < deadline {
            if self.evacuation.is_cancelled() {
                return self.evacuate(region, registry).map(Some);
            }
            if fault.is_cancelled() {
                return self.abort(region, registry);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            std::thread::sleep(self.config.timing.dean_poll.min(remaining));
        }
        Ok(None)
    }

    /// Fix the grading targets from the verified candidate subsets
    ///
    /// Commission A examines eligible first-time candidates; commission B
    /// examines every eligible candidate, retaking ones included. A later
    /// shrinks B's target for every theoretical failure it grades.
    fn set_targets(&self, region: &RegionHandle) {
        let eligible = self
            .config
            .candidate_count
            .saturating_sub(self.config.ineligible_count);
        let mut state = region.exam_state();
        state.target_a = eligible.saturating_sub(self.config.retake_count);
        state.target_b = eligible;
        info!(
            "Verification done: targets A={} B={}",
            state.target_a, state.target_b
        );
    }

    /// Watch the running exam until both commissions retire
    fn supervise(
        &mut self,
        region: &RegionHandle,
        registry: &Arc<ProcessRegistry>,
        fault: &CancelToken,
    ) -> ExamResult<Option<RankingReport>> {
        loop {
            if self.evacuation.is_cancelled() {
                return self.evacuate(region, registry).map(Some);
            }
            if fault.is_cancelled() {
                return self.abort(region, registry);
            }
            {
                let state = region.exam_state();
                if state.commission_pid(CommissionKind::A).is_none()
                    && state.commission_pid(CommissionKind::B).is_none()
                {
                    info!("Both commissions retired, closing the exam");
                    return Ok(None);
                }
            }
            std::thread::sleep(self.config.timing.dean_poll);
        }
    }

    /// Orderly evacuation: terminate everyone, reap, rank what completed
    fn evacuate(
        &mut self,
        region: &RegionHandle,
        registry: &Arc<ProcessRegistry>,
    ) -> ExamResult<RankingReport> {
        warn!("Evacuation ordered, terminating all participants");
        registry.broadcast_termination();
        registry.join_all();
        self.state = DeanState::Finished;
        self.finish(region, true)
    }

    /// Fatal child fault: terminate everyone and surface the abort
    fn abort(
        &mut self,
        region: &RegionHandle,
        registry: &Arc<ProcessRegistry>,
    ) -> ExamResult<Option<RankingReport>> {
        warn!("Child fault detected, aborting the exam");
        registry.broadcast_termination();
        registry.join_all();
        self.state = DeanState::Finished;
        let _ = self.manager.destroy(&self.key);
        Err(ExamError::Aborted)
    }

    /// Build, optionally persist, and return the ranking list
    fn finish(&self, region: &RegionHandle, evacuated: bool) -> ExamResult<RankingReport> {
        let report = {
            let candidates = region.candidates();
            results::finalize(&candidates, evacuated, self.config.pass_threshold)
        };
        if let Some(path) = &self.config.results_path {
            report.write_to(path)?;
        }
        self.manager.destroy(&self.key)?;
        info!(
            "Exam finished: {} of {} candidates ranked",
            report.ranked_count(),
            report.entries.len()
        );
        Ok(report)
    }
}
