//! Completion arithmetic shared by topic, overall and checklist progress.
//!
//! # Invariants
//! - Percentages are integers in `0..=100`.
//! - Rounding is half away from zero; every input here is non-negative, so that is
//!   the same as half up.
//! - Empty inputs yield `0`, never a division by zero.

use crate::model::study::Topic;

/// Completion summary for one list of trackable items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

/// Coarse display stage derived from a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    Idle,
    InProgress,
    Done,
}

impl Progress {
    /// Builds a summary; `completed` is capped at `total`.
    pub fn new(completed: usize, total: usize) -> Self {
        let completed = completed.min(total);
        Self {
            completed,
            total,
            percent: rounded_percent(completed, total),
        }
    }

    /// Progress of one topic: exercises marked `done` over all exercises.
    pub fn of_topic(topic: &Topic) -> Self {
        Self::new(topic.completed_count(), topic.exercises.len())
    }

    pub fn stage(&self) -> ProgressStage {
        match self.percent {
            100 => ProgressStage::Done,
            0 => ProgressStage::Idle,
            _ => ProgressStage::InProgress,
        }
    }

    /// `"{completed}/{total}"` label used next to progress bars.
    pub fn fraction_label(&self) -> String {
        format!("{}/{}", self.completed, self.total)
    }
}

/// `round(100 * completed / total)`, `0` when `total == 0`.
pub fn rounded_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u128;
    let total = total as u128;
    ((200 * completed + total) / (2 * total)) as u8
}

/// Unweighted mean of percentages, rounded; `0` for an empty input.
///
/// Each entry counts once regardless of how many items it summarizes.
pub fn mean_percent(percents: impl IntoIterator<Item = u8>) -> u8 {
    let (sum, count) = percents
        .into_iter()
        .fold((0_u64, 0_u64), |(sum, count), value| {
            (sum + u64::from(value.min(100)), count + 1)
        });
    if count == 0 {
        return 0;
    }
    ((2 * sum + count) / (2 * count)) as u8
}

/// Bounds a display value into `0..=100`, rounding half away from zero.
pub fn clamp_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::{clamp_percent, mean_percent, rounded_percent, Progress, ProgressStage};

    #[test]
    fn one_of_three_rounds_down_to_33() {
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(rounded_percent(1, 8), 13);
        assert_eq!(rounded_percent(1, 200), 1);
        assert_eq!(mean_percent([0, 1]), 1);
    }

    #[test]
    fn empty_inputs_are_zero() {
        assert_eq!(rounded_percent(0, 0), 0);
        assert_eq!(mean_percent(Vec::new()), 0);
        assert_eq!(Progress::new(0, 0).percent, 0);
    }

    #[test]
    fn stage_follows_percent() {
        assert_eq!(Progress::new(0, 4).stage(), ProgressStage::Idle);
        assert_eq!(Progress::new(1, 4).stage(), ProgressStage::InProgress);
        assert_eq!(Progress::new(4, 4).stage(), ProgressStage::Done);
    }

    #[test]
    fn clamp_percent_bounds_values() {
        assert_eq!(clamp_percent(-5.0), 0);
        assert_eq!(clamp_percent(42.5), 43);
        assert_eq!(clamp_percent(180.0), 100);
        assert_eq!(clamp_percent(f64::NAN), 0);
    }

    #[test]
    fn percent_never_exceeds_bounds() {
        for total in 0..40 {
            for completed in 0..=total {
                let percent = rounded_percent(completed, total);
                assert!(percent <= 100);
            }
        }
    }
}
