use course_core::model::{ActivityKind, LessonKind};

#[must_use]
pub fn lesson_kind_label(kind: LessonKind) -> &'static str {
    match kind {
        LessonKind::Video => "Video",
        LessonKind::Reading => "Lectura",
        LessonKind::Reflection => "Reflexión",
        LessonKind::Activity => "Actividad",
    }
}

#[must_use]
pub fn activity_kind_label(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::Reflection => "Reflexión",
        ActivityKind::Observation => "Observación",
        ActivityKind::Quiz => "Cuestionario",
        ActivityKind::ActionPlan => "Plan de acción",
    }
}
