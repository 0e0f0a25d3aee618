//! Authoring format of the catalog as it appears in JSON.
//!
//! Drafts only describe shape; `Catalog::new` turns them into validated
//! domain types.

use serde::Deserialize;

use crate::model::{
    ActivityId, ActivityKind, Annex, CourseMetadata, LessonId, LessonKind, ModuleId,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CatalogDraft {
    pub metadata: CourseMetadata,
    pub modules: Vec<ModuleDraft>,
    #[serde(default)]
    pub annexes: Vec<Annex>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModuleDraft {
    pub id: ModuleId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub icon_name: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub lessons: Vec<LessonDraft>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LessonDraft {
    pub id: LessonId,
    pub module_id: ModuleId,
    pub title: String,
    pub duration: String,
    #[serde(rename = "type")]
    pub kind: LessonKind,
    #[serde(default)]
    pub content: String,
    pub activity: Option<ActivityDraft>,
    pub next_lesson_id: Option<LessonId>,
    pub prev_lesson_id: Option<LessonId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActivityDraft {
    pub id: ActivityId,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Option<Vec<String>>,
    pub template_fields: Option<Vec<String>>,
}
