mod activity;
mod course;
mod ids;
mod lesson;
mod module;
mod progress;

pub use activity::{Activity, ActivityError, ActivityKind, ActivityPrompts, ActivitySubmission};
pub use course::{Annex, CourseMetadata};
pub use ids::{ActivityId, LessonId, ModuleId, ParseIdError};
pub use lesson::{Lesson, LessonError, LessonKind};
pub use module::{CourseModule, ModuleError};
pub use progress::{ResetToken, UserProgress};
