/*!
 * Commission Worker Pool
 * One thread per examiner, tagging question bits on occupied seats
 */

use crate::core::errors::{ExamError, ExamResult};
use crate::core::random;
use crate::core::timing::ExamTiming;
use crate::core::types::CommissionKind;
use crate::region::RegionHandle;
use crate::sync::CancelToken;
use log::debug;
use std::thread::JoinHandle;

/// Pool of member threads for one commission
///
/// Workers observe a pool-local stop token, checked on each wake and again
/// after taking the table lock, so they never mutate a shutting-down region.
pub struct WorkerPool {
    stop: CancelToken,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn one worker per commission member
    pub fn spawn(kind: CommissionKind, region: RegionHandle, timing: ExamTiming) -> ExamResult<Self> {
        let stop = CancelToken::new();
        let mut handles = Vec::with_capacity(kind.member_count());

        for member in 0..kind.member_count() {
            let region = region.clone();
            let stop = stop.clone();
            let handle = std::thread::Builder::new()
                .name(format!("member-{}-{}", kind.label(), member))
                .spawn(move || member_loop(kind, member, region, stop, timing))
                .map_err(|e| ExamError::Spawn(e.to_string()))?;
            handles.push(handle);
        }

        Ok(Self { stop, handles })
    }

    /// Stop and join every worker
    pub fn shutdown(self) {
        self.stop.cancel();
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

fn member_loop(
    kind: CommissionKind,
    member: usize,
    region: RegionHandle,
    stop: CancelToken,
    timing: ExamTiming,
) {
    debug!("Commission {} member {} started", kind, member);
    let member_bit = 1u32 << member;

    loop {
        // Question-preparation time
        let prep = random::duration_between(timing.question_prep_min, timing.question_prep_max);
        if !stop.sleep(prep) {
            break;
        }

        let mut table = region.table(kind);
        if stop.is_cancelled() {
            break;
        }

        for (seat, record) in table.seats.iter_mut().enumerate() {
            if let Some(pid) = record.occupant {
                if record.question_mask & member_bit == 0 {
                    record.question_mask |= member_bit;
                    debug!(
                        "Commission {} member {} posed question for seat {} (pid {})",
                        kind, member, seat, pid
                    );
                }
            }
        }
    }

    debug!("Commission {} member {} finished", kind, member);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::SharedRegion;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[test]
    fn test_workers_fill_question_mask_on_occupied_seat() {
        let region: RegionHandle = Arc::new(SharedRegion::new(1));
        region.table(CommissionKind::B).seats[0].claim(42);

        let pool = WorkerPool::spawn(CommissionKind::B, region.clone(), ExamTiming::fast()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            if region.table(CommissionKind::B).seats[0].fully_questioned(CommissionKind::B) {
                break;
            }
            assert!(Instant::now() < deadline, "question mask never filled");
            std::thread::sleep(Duration::from_millis(5));
        }

        pool.shutdown();
    }

    #[test]
    fn test_workers_ignore_empty_seats() {
        let region: RegionHandle = Arc::new(SharedRegion::new(1));
        let pool = WorkerPool::spawn(CommissionKind::A, region.clone(), ExamTiming::fast()).unwrap();

        std::thread::sleep(Duration::from_millis(100));
        pool.shutdown();

        assert!(region
            .table(CommissionKind::A)
            .seats
            .iter()
            .all(|s| s.question_mask == 0));
    }
}
