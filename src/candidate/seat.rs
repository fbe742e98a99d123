/*!
 * Seat Allocator
 * Admission-signal-gated seat claiming with a bounded race fallback
 *
 * The signal throttles concurrency to seat capacity without blocking inside
 * the table lock. When a permit is granted but no physical seat is free
 * (transient divergence between signal count and table state), the permit is
 * returned and the claim retried after a short backoff.
 */

use crate::core::errors::{ExamError, ExamResult};
use crate::core::timing::ExamTiming;
use crate::core::types::{CommissionKind, Pid, SeatIndex};
use crate::region::SharedRegion;
use crate::sync::CancelToken;
use log::{debug, warn};

/// Retry budget for the permit-granted-but-no-seat race; generous because
/// another claimant frees a seat within one grading iteration.
const CLAIM_RETRY_LIMIT: usize = 10_000;

/// Claim a seat in the given commission
///
/// Blocks on the admission signal in cancellable slices. Returns Ok(None)
/// when cancelled, Ok(Some(seat)) once a seat is claimed.
pub fn claim_seat(
    region: &SharedRegion,
    kind: CommissionKind,
    pid: Pid,
    token: &CancelToken,
    timing: &ExamTiming,
) -> ExamResult<Option<SeatIndex>> {
    let mut retries = 0;

    loop {
        // Cancellable decrement of the admission signal.
        loop {
            if token.is_cancelled() {
                return Ok(None);
            }
            if region.signal(kind).acquire_timeout(timing.claim_wait) {
                break;
            }
        }

        if token.is_cancelled() {
            region.signal(kind).release();
            return Ok(None);
        }

        if let Some(seat) = try_claim(region, kind, pid) {
            debug!(
                "Candidate pid {} took seat {} in commission {}",
                pid, seat, kind
            );
            return Ok(Some(seat));
        }

        // Permit granted but no seat free: return it and back off.
        region.signal(kind).release();
        retries += 1;
        if retries >= CLAIM_RETRY_LIMIT {
            return Err(ExamError::SeatUnavailable(kind));
        }
        if !token.sleep(timing.claim_backoff) {
            return Ok(None);
        }
    }
}

/// Atomically claim the first empty seat under the table lock
fn try_claim(region: &SharedRegion, kind: CommissionKind, pid: Pid) -> Option<SeatIndex> {
    let mut table = region.table(kind);
    let seat = table.find_empty()?;
    table.seats[seat].claim(pid);
    Some(seat)
}

/// Best-effort release of a seat still held by this candidate
///
/// Used on cancellation paths only: try_lock avoids re-entering a lock the
/// interrupted flow might conceptually own, and the occupant check makes the
/// release a no-op once the grading loop has already freed the seat.
pub fn release_seat(region: &SharedRegion, kind: CommissionKind, seat: SeatIndex, pid: Pid) {
    let Some(mut table) = region.try_table(kind) else {
        warn!(
            "Candidate pid {} could not release seat {} in commission {} (table busy)",
            pid, seat, kind
        );
        return;
    };

    if table.seats.get(seat).map(|s| s.occupant) == Some(Some(pid)) {
        table.seats[seat].reset();
        drop(table);
        region.signal(kind).release();
        debug!(
            "Candidate pid {} released seat {} in commission {}",
            pid, seat, kind
        );
    }
}
