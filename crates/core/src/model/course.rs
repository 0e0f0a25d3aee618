use serde::{Deserialize, Serialize};

/// Descriptive metadata for the whole course.
///
/// `total_lessons` is the author-declared constant used for percentages and
/// the completion flag; it is not recomputed from the module list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseMetadata {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub description: String,
    pub total_modules: u32,
    pub total_lessons: u32,
    pub estimated_time: String,
    pub year: i32,
}

/// Supplementary download listed next to the final project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annex {
    pub id: String,
    pub title: String,
    pub description: String,
    pub link: String,
}
