/*!
 * Process Registry
 * Tracks live participants for signal propagation and reaping
 *
 * Every participant runs on a dedicated OS thread under a simulated pid and
 * carries a cancellation token. The registry supports targeted rejection
 * (pre-exam ineligibility), broadcast termination (evacuation), fault
 * escalation from children, and join-based reaping.
 */

use crate::core::errors::{ExamError, ExamResult};
use crate::core::types::{CommissionKind, Pid};
use crate::region::{CandidateStatus, RegionHandle};
use crate::sync::CancelToken;
use ahash::RandomState;
use dashmap::DashMap;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread::JoinHandle;

/// Role tag fixed at participant start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Commission(CommissionKind),
    Candidate(usize),
}

impl Role {
    fn thread_name(&self) -> String {
        match self {
            Role::Commission(kind) => format!("commission-{}", kind.label()),
            Role::Candidate(index) => format!("candidate-{}", index),
        }
    }
}

struct Participant {
    role: Role,
    token: CancelToken,
}

/// Registry of live participants
pub struct ProcessRegistry {
    region: RegionHandle,
    participants: DashMap<Pid, Participant, RandomState>,
    handles: DashMap<Pid, JoinHandle<()>, RandomState>,
    next_pid: AtomicU32,
    fault: CancelToken,
}

impl ProcessRegistry {
    pub fn new(region: RegionHandle) -> Self {
        Self {
            region,
            participants: DashMap::with_hasher(RandomState::new()),
            handles: DashMap::with_hasher(RandomState::new()),
            next_pid: AtomicU32::new(1),
            fault: CancelToken::new(),
        }
    }

    /// Spawn a participant thread under a fresh pid
    ///
    /// The closure receives its pid and cancellation token; it is expected
    /// to call `unregister` on every exit path.
    pub fn spawn<F>(&self, role: Role, body: F) -> ExamResult<Pid>
    where
        F: FnOnce(Pid, CancelToken) + Send + 'static,
    {
        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        let token = CancelToken::new();
        self.participants.insert(
            pid,
            Participant {
                role,
                token: token.clone(),
            },
        );

        let handle = std::thread::Builder::new()
            .name(role.thread_name())
            .spawn(move || body(pid, token))
            .map_err(|e| {
                self.participants.remove(&pid);
                ExamError::Spawn(e.to_string())
            })?;

        self.handles.insert(pid, handle);
        debug!("Spawned {:?} as pid {}", role, pid);
        Ok(pid)
    }

    /// Targeted rejection of an ineligible candidate; idempotent
    pub fn reject(&self, pid: Pid) {
        if let Some(participant) = self.participants.get(&pid) {
            if matches!(participant.role, Role::Candidate(_)) {
                info!("Rejecting candidate pid {}", pid);
                participant.token.cancel();
            } else {
                warn!("Refusing to reject non-candidate pid {}", pid);
            }
        }
    }

    /// Broadcast termination/evacuation to every live participant
    ///
    /// Only the lifecycle controller calls this.
    pub fn broadcast_termination(&self) {
        warn!(
            "Broadcasting termination to {} participants",
            self.participants.len()
        );
        for participant in self.participants.iter() {
            participant.token.cancel();
        }
    }

    /// Escalate a fatal child error to the lifecycle controller
    pub fn report_fault(&self, pid: Pid, err: &ExamError) {
        error!("Participant pid {} reported fatal fault: {}", pid, err);
        self.fault.cancel();
    }

    /// Token tripped when any participant reports a fault
    pub fn fault_token(&self) -> CancelToken {
        self.fault.clone()
    }

    /// Remove a participant on exit
    ///
    /// A candidate record still in a non-terminal state is marked Terminated
    /// (abnormal exit); terminal statuses are left untouched. A commission
    /// clears its identity in the exam state.
    pub fn unregister(&self, pid: Pid) {
        let Some((_, participant)) = self.participants.remove(&pid) else {
            return;
        };

        match participant.role {
            Role::Commission(kind) => {
                self.region.exam_state().set_commission_pid(kind, None);
                debug!("Commission {} (pid {}) unregistered", kind, pid);
            }
            Role::Candidate(_) => {
                let mut candidates = self.region.candidates();
                match candidates.iter_mut().find(|c| c.pid == Some(pid)) {
                    Some(record) if !record.status.is_terminal() => {
                        warn!(
                            "Candidate pid {} exited abnormally in state {:?}, marking Terminated",
                            pid, record.status
                        );
                        record.status = CandidateStatus::Terminated;
                    }
                    Some(_) => debug!("Candidate pid {} unregistered", pid),
                    None => debug!("Candidate pid {} had no record at unregister", pid),
                }
            }
        }
    }

    /// Reap one participant thread
    pub fn join(&self, pid: Pid) {
        if let Some((_, handle)) = self.handles.remove(&pid) {
            if handle.join().is_err() {
                error!("Participant pid {} panicked", pid);
                self.fault.cancel();
            }
        }
    }

    /// Reap every remaining participant thread
    pub fn join_all(&self) {
        let pids: Vec<Pid> = self.handles.iter().map(|entry| *entry.key()).collect();
        for pid in pids {
            self.join(pid);
        }
    }

    pub fn live_count(&self) -> usize {
        self.participants.len()
    }
}
