/*!
 * Entrance Exam Simulation
 * Multi-stage entrance exam with two grading commissions, bounded seat
 * tables, and a dean-supervised lifecycle over a shared region
 *
 * Participants run as registry-managed threads coordinating exclusively
 * through the shared region: per-group mutexes, two counting admission
 * signals, and cooperative cancellation tokens.
 */

pub mod candidate;
pub mod commission;
pub mod core;
pub mod dean;
pub mod region;
pub mod registry;
pub mod results;
pub mod sync;

pub use crate::core::errors::{ExamError, ExamResult, RegionError};
pub use crate::core::timing::ExamTiming;
pub use crate::core::types::{CommissionKind, Pid, Score};
pub use crate::dean::{DeanProcess, ExamConfig};
pub use crate::region::{RegionKey, RegionManager};
pub use crate::results::RankingReport;
