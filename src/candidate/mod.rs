/*!
 * Examination Candidates
 * Seat allocation protocol and the two-stage candidate state machine
 */

mod process;
mod seat;

pub use process::CandidateProcess;
pub use seat::{claim_seat, release_seat};
