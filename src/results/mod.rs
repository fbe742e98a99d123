/*!
 * Ranking List
 * Final-score computation and the ordered ranking report
 *
 * Normal completion: a failed theoretical stage zeroes the practical and
 * final scores; otherwise the final score is the mean of the two stages.
 * Evacuation: missing scores are clamped to zero and no final score is
 * assigned to incomplete records.
 */

use crate::core::errors::{ExamError, ExamResult};
use crate::core::types::{Pid, Score};
use crate::region::{CandidateRecord, CandidateStatus};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;

/// One row of the ranking list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingEntry {
    pub index: usize,
    pub pid: Option<Pid>,
    pub status: CandidateStatus,
    pub theoretical: Score,
    pub practical: Score,
    pub final_score: Option<Score>,
}

/// Ordered ranking list produced at exam end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub evacuated: bool,
    pub entries: Vec<RankingEntry>,
}

impl RankingReport {
    /// Human-readable ranking table
    pub fn render(&self) -> String {
        let mut out = String::new();
        let title = if self.evacuated {
            "RANKING LIST (EVACUATED)"
        } else {
            "RANKING LIST"
        };
        let _ = writeln!(out, "{}", title);
        let _ = writeln!(
            out,
            "{:>5} {:>7} {:>12} {:>10} {:>10} {:>7}",
            "rank", "cand", "status", "theory", "practice", "final"
        );

        for (rank, entry) in self.entries.iter().enumerate() {
            let final_text = entry
                .final_score
                .map(|s| format!("{:.2}", s))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(
                out,
                "{:>5} {:>7} {:>12} {:>10.2} {:>10.2} {:>7}",
                rank + 1,
                entry.index,
                format!("{:?}", entry.status),
                entry.theoretical,
                entry.practical,
                final_text
            );
        }
        out
    }

    pub fn to_json(&self) -> ExamResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ExamError::InvalidArgument(format!("report serialization: {}", e)))
    }

    pub fn write_to(&self, path: &Path) -> ExamResult<()> {
        std::fs::write(path, self.render())
            .map_err(|e| ExamError::InvalidArgument(format!("write {}: {}", path.display(), e)))?;
        info!("Ranking list written to {}", path.display());
        Ok(())
    }

    /// Number of candidates with a final score
    pub fn ranked_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.final_score.is_some())
            .count()
    }
}

/// Compute final scores and build the ordered ranking list
///
/// Entries with a final score sort first, highest score wins, ties broken
/// by candidate index; unranked records follow in index order.
pub fn finalize(
    records: &[CandidateRecord],
    evacuated: bool,
    pass_threshold: Score,
) -> RankingReport {
    let mut entries: Vec<RankingEntry> = records
        .iter()
        .map(|record| build_entry(record, evacuated, pass_threshold))
        .collect();

    entries.sort_by(|a, b| match (a.final_score, b.final_score) {
        (Some(x), Some(y)) => y
            .partial_cmp(&x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.index.cmp(&b.index)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.index.cmp(&b.index),
    });

    RankingReport { evacuated, entries }
}

fn build_entry(record: &CandidateRecord, evacuated: bool, pass_threshold: Score) -> RankingEntry {
    let theoretical = record.theoretical_score.max(0.0);
    let practical = record.practical_score.max(0.0);

    let final_score = if evacuated {
        // Only fully examined candidates are ranked after an evacuation.
        if record.status == CandidateStatus::Passed {
            Some(0.5 * theoretical + 0.5 * practical)
        } else {
            None
        }
    } else {
        match record.status {
            CandidateStatus::NotEligible | CandidateStatus::Terminated => None,
            CandidateStatus::Failed => Some(0.0),
            _ if record.theoretical_score >= 0.0
                && record.theoretical_score < pass_threshold =>
            {
                Some(0.0)
            }
            _ if record.practical_score >= 0.0 => Some(0.5 * theoretical + 0.5 * practical),
            _ => None,
        }
    };

    RankingEntry {
        index: record.index,
        pid: record.pid,
        status: record.status,
        theoretical,
        practical,
        final_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(
        index: usize,
        theoretical: Score,
        practical: Score,
        status: CandidateStatus,
    ) -> CandidateRecord {
        let mut r = CandidateRecord::new(index);
        r.pid = Some(index as Pid + 1);
        r.theoretical_score = theoretical;
        r.practical_score = practical;
        r.status = status;
        r
    }

    #[test]
    fn test_failed_theoretical_zeroes_final() {
        let records = vec![record(0, 12.0, -1.0, CandidateStatus::Failed)];
        let report = finalize(&records, false, 30.0);
        assert_eq!(report.entries[0].final_score, Some(0.0));
        assert_eq!(report.entries[0].practical, 0.0);
    }

    #[test]
    fn test_passed_candidate_gets_mean_of_stages() {
        let records = vec![record(0, 60.0, 80.0, CandidateStatus::Passed)];
        let report = finalize(&records, false, 30.0);
        assert_eq!(report.entries[0].final_score, Some(70.0));
    }

    #[test]
    fn test_ranking_orders_by_final_score_descending() {
        let records = vec![
            record(0, 40.0, 40.0, CandidateStatus::Passed),
            record(1, 90.0, 90.0, CandidateStatus::Passed),
            record(2, 10.0, -1.0, CandidateStatus::Failed),
            record(3, -1.0, -1.0, CandidateStatus::NotEligible),
        ];
        let report = finalize(&records, false, 30.0);

        let order: Vec<usize> = report.entries.iter().map(|e| e.index).collect();
        assert_eq!(order, vec![1, 0, 2, 3]);
        assert_eq!(report.entries[3].final_score, None);
        assert_eq!(report.ranked_count(), 3);
    }

    #[test]
    fn test_evacuation_ranks_only_completed_candidates() {
        let records = vec![
            record(0, 50.0, 70.0, CandidateStatus::Passed),
            record(1, 50.0, -1.0, CandidateStatus::PendingCommissionB),
            record(2, -1.0, -1.0, CandidateStatus::Terminated),
        ];
        let report = finalize(&records, true, 30.0);

        assert!(report.evacuated);
        assert_eq!(report.entries[0].index, 0);
        assert_eq!(report.entries[0].final_score, Some(60.0));
        assert_eq!(report.ranked_count(), 1);
        // Negative sentinels are clamped in the rendered rows.
        assert_eq!(report.entries[1].practical, 0.0);
    }

    #[test]
    fn test_render_includes_every_candidate() {
        let records = vec![
            record(0, 60.0, 80.0, CandidateStatus::Passed),
            record(1, 5.0, -1.0, CandidateStatus::Failed),
        ];
        let report = finalize(&records, false, 30.0);
        let text = report.render();
        assert!(text.contains("RANKING LIST"));
        assert_eq!(text.lines().count(), 4);
    }
}
