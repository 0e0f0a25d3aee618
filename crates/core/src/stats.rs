//! Figures derived from the catalog and a learner's progress.

use crate::model::{CourseModule, UserProgress};

/// `round(100 * completed / total)`, half rounding up, capped at 100.
///
/// A total of zero yields zero.
#[must_use]
pub fn progress_percentage(completed: usize, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let total = u64::from(total);
    let completed = u64::try_from(completed).unwrap_or(u64::MAX).min(total);
    let rounded = (completed * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

/// Completion figures for a single module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleStats {
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

impl ModuleStats {
    #[must_use]
    pub fn compute(module: &CourseModule, progress: &UserProgress) -> Self {
        let total = module.lessons().len();
        let completed = module
            .lessons()
            .iter()
            .filter(|lesson| progress.is_completed(lesson.id()))
            .count();
        let percentage = progress_percentage(completed, u32::try_from(total).unwrap_or(u32::MAX));
        Self {
            completed,
            total,
            percentage,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Sum of the parseable lesson durations of a module, in minutes.
#[must_use]
pub fn module_total_minutes(module: &CourseModule) -> u32 {
    module
        .lessons()
        .iter()
        .filter_map(|lesson| lesson.duration_minutes())
        .sum()
}
