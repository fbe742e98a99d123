/*!
 * Randomness Collaborator
 * Uniform sampling helpers for grading and configuration generation
 */

use rand::Rng;
use std::collections::HashSet;
use std::time::Duration;

/// Uniform sample in `[lo, hi)`
pub fn range_f64(lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        return lo;
    }
    rand::thread_rng().gen_range(lo..hi)
}

/// Uniform integer sample in `[lo, hi]`
pub fn range_usize(lo: usize, hi: usize) -> usize {
    if hi <= lo {
        return lo;
    }
    rand::thread_rng().gen_range(lo..=hi)
}

/// Uniform duration between two bounds
pub fn duration_between(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    Duration::from_secs_f64(range_f64(min.as_secs_f64(), max.as_secs_f64()))
}

/// Mean of `samples` independent uniform draws in `[lo, hi)`
///
/// This is the grading distribution: one draw per commission member.
pub fn sample_mean(samples: usize, lo: f64, hi: f64) -> f64 {
    if samples == 0 {
        return lo;
    }
    let mut rng = rand::thread_rng();
    let sum: f64 = (0..samples).map(|_| rng.gen_range(lo..hi)).sum();
    sum / samples as f64
}

/// Distinct indices in `[0, max)`, skipping `exclude`
///
/// Count is clamped to the number of available indices so the draw always
/// terminates.
pub fn distinct_indices(count: usize, max: usize, exclude: &HashSet<usize>) -> HashSet<usize> {
    let available = (0..max).filter(|i| !exclude.contains(i)).count();
    let count = count.min(available);

    let mut result = HashSet::with_capacity(count);
    while result.len() < count {
        let candidate = range_usize(0, max.saturating_sub(1));
        if !exclude.contains(&candidate) {
            result.insert(candidate);
        }
    }
    result
}
