/*!
 * Synchronization Primitives
 *
 * Two primitives carry all cross-participant signaling:
 * - `AdmissionSignal`: counting semaphore gating concurrent seat occupancy
 * - `CancelToken`: cooperative cancellation checked at suspension points
 *
 * Neither is ever waited on while a table lock is held; that ordering rule
 * is what keeps the allocator and grading loop deadlock-free.
 */

mod cancel;
mod semaphore;

pub use cancel::CancelToken;
pub use semaphore::AdmissionSignal;
