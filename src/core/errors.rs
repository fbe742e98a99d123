/*!
 * Error Types
 * Centralized error handling with thiserror and serde support
 */

use crate::core::types::{CommissionKind, Pid};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shared region errors
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "error", content = "details", rename_all = "snake_case")]
pub enum RegionError {
    /// No region exists under the lookup key
    #[error("no region found for key '{0}'")]
    NotFound(String),

    /// Region could not be created or an existing one could not be reclaimed
    #[error("region allocation failed: {0}")]
    AllocationFailed(String),
}

/// Exam coordination errors
///
/// Taxonomy: allocation and spawn failures are fatal and escalate to the
/// lifecycle controller; a candidate lookup miss is recovered by freeing the
/// seat; a seat race is recovered by returning the permit and retrying.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "error", content = "details", rename_all = "snake_case")]
pub enum ExamError {
    #[error(transparent)]
    Region(#[from] RegionError),

    /// Occupant of a seat has no matching candidate record
    #[error("candidate with pid {0} not found")]
    CandidateNotFound(Pid),

    /// Permit granted but no physical seat freed within the retry budget
    #[error("no seat available in commission {0} despite granted permit")]
    SeatUnavailable(CommissionKind),

    /// Participant thread could not be spawned
    #[error("failed to spawn participant: {0}")]
    Spawn(String),

    /// Malformed configuration or process arguments
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Exam aborted after a participant reported a fatal fault
    #[error("exam aborted after participant fault")]
    Aborted,
}

/// Common result type for exam operations
pub type ExamResult<T> = Result<T, ExamError>;
