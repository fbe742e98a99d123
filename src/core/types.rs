/*!
 * Core Types
 * Common types used across the simulator
 */

use serde::{Deserialize, Serialize};

/// Simulated process ID type
pub type Pid = u32;

/// Score type, 0.0..=100.0 once graded
pub type Score = f64;

/// Index of a seat within a commission table
pub type SeatIndex = usize;

/// Number of seats per commission
pub const SEAT_CAPACITY: usize = 3;

/// Default pass threshold for the theoretical stage (out of 100)
pub const DEFAULT_PASS_THRESHOLD: Score = 30.0;

/// Grading commission identifier
///
/// Commission A examines the theoretical stage with 5 members, commission B
/// the practical stage with 3 members. Both have the same seat capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionKind {
    A,
    B,
}

impl CommissionKind {
    /// Number of examiners in this commission
    pub fn member_count(&self) -> usize {
        match self {
            CommissionKind::A => 5,
            CommissionKind::B => 3,
        }
    }

    /// Number of seats candidates can occupy concurrently
    pub fn capacity(&self) -> usize {
        SEAT_CAPACITY
    }

    /// Bitmask value meaning every member has posed their question
    pub fn full_mask(&self) -> u32 {
        (1 << self.member_count()) - 1
    }

    pub fn label(&self) -> &'static str {
        match self {
            CommissionKind::A => "A",
            CommissionKind::B => "B",
        }
    }
}

impl std::fmt::Display for CommissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_mask_matches_member_count() {
        assert_eq!(CommissionKind::A.full_mask(), 0b11111);
        assert_eq!(CommissionKind::B.full_mask(), 0b111);
    }

    #[test]
    fn test_capacity_is_shared() {
        assert_eq!(CommissionKind::A.capacity(), SEAT_CAPACITY);
        assert_eq!(CommissionKind::B.capacity(), SEAT_CAPACITY);
    }
}
