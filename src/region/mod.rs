/*!
 * Shared State Region
 * The memory block attached by every participant, its data model, and its
 * create/attach/detach/destroy lifecycle
 */

mod manager;
#[allow(clippy::module_inception)]
mod region;
mod types;

pub use manager::{RegionKey, RegionManager};
pub use region::{RegionHandle, SharedRegion};
pub use types::{
    CandidateRecord, CandidateStatus, CommissionTable, ExamState, SeatRecord, SCORE_UNGRADED,
};
