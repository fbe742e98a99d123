/*!
 * Core Module
 * Shared types, errors, timing knobs, and randomness used across the simulator
 */

pub mod errors;
pub mod random;
pub mod timing;
pub mod types;

pub use errors::{ExamError, ExamResult, RegionError};
pub use timing::ExamTiming;
pub use types::{CommissionKind, Pid, Score, SeatIndex};
