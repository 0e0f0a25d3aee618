use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::model::ids::ActivityId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActivityError {
    #[error("activity title cannot be empty")]
    EmptyTitle,

    #[error("prompt {label:?} appears more than once")]
    DuplicatePrompt { label: String },

    #[error("prompts cannot be blank")]
    BlankPrompt,

    #[error("expected {expected} answers, got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },

    #[error("answer for {label:?} cannot be empty")]
    EmptyAnswer { label: String },
}

//
// ─── KIND ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityKind {
    Reflection,
    Observation,
    Quiz,
    ActionPlan,
}

impl ActivityKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Reflection => "reflection",
            ActivityKind::Observation => "observation",
            ActivityKind::Quiz => "quiz",
            ActivityKind::ActionPlan => "action-plan",
        }
    }
}

//
// ─── PROMPTS ───────────────────────────────────────────────────────────────────
//

/// What the learner is asked to fill in.
///
/// Reflections and quizzes ask free-text questions; observations and action
/// plans present named form fields. Either way the answers end up keyed by
/// the prompt label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActivityPrompts {
    #[default]
    None,
    Questions(Vec<String>),
    Fields(Vec<String>),
}

impl ActivityPrompts {
    #[must_use]
    pub fn labels(&self) -> &[String] {
        match self {
            ActivityPrompts::None => &[],
            ActivityPrompts::Questions(items) | ActivityPrompts::Fields(items) => items,
        }
    }

    #[must_use]
    pub fn is_form(&self) -> bool {
        matches!(self, ActivityPrompts::Fields(_))
    }
}

//
// ─── SUBMISSION ────────────────────────────────────────────────────────────────
//

/// Free-form answers for one activity, keyed by prompt label.
///
/// Schema-less on purpose: the progress store keeps whatever the caller hands
/// it and never inspects the contents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivitySubmission(BTreeMap<String, String>);

impl ActivitySubmission {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, answer: impl Into<String>) {
        self.0.insert(label.into(), answer.into());
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&str> {
        self.0.get(label).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for ActivitySubmission {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ActivitySubmission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

//
// ─── ACTIVITY ──────────────────────────────────────────────────────────────────
//

/// A reflective exercise attached to a lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    id: ActivityId,
    kind: ActivityKind,
    title: String,
    description: String,
    prompts: ActivityPrompts,
}

impl Activity {
    /// Creates an activity.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::EmptyTitle` for a blank title, and
    /// `BlankPrompt`/`DuplicatePrompt` when prompt labels could not serve as
    /// submission keys.
    pub fn new(
        id: ActivityId,
        kind: ActivityKind,
        title: impl Into<String>,
        description: impl Into<String>,
        prompts: ActivityPrompts,
    ) -> Result<Self, ActivityError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ActivityError::EmptyTitle);
        }

        let mut seen = HashSet::new();
        for label in prompts.labels() {
            if label.trim().is_empty() {
                return Err(ActivityError::BlankPrompt);
            }
            if !seen.insert(label.as_str()) {
                return Err(ActivityError::DuplicatePrompt {
                    label: label.clone(),
                });
            }
        }

        Ok(Self {
            id,
            kind,
            title,
            description: description.into(),
            prompts,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ActivityId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn prompts(&self) -> &ActivityPrompts {
        &self.prompts
    }

    #[must_use]
    pub fn prompt_labels(&self) -> &[String] {
        self.prompts.labels()
    }

    /// Pair ordered answers with this activity's prompts.
    ///
    /// Every prompt must receive a non-blank answer; answers are trimmed.
    ///
    /// # Errors
    ///
    /// Returns `AnswerCountMismatch` when the number of answers differs from
    /// the number of prompts, or `EmptyAnswer` naming the first blank one.
    pub fn build_submission<I, S>(&self, answers: I) -> Result<ActivitySubmission, ActivityError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let answers: Vec<S> = answers.into_iter().collect();
        let labels = self.prompt_labels();
        if answers.len() != labels.len() {
            return Err(ActivityError::AnswerCountMismatch {
                expected: labels.len(),
                actual: answers.len(),
            });
        }

        let mut submission = ActivitySubmission::new();
        for (label, answer) in labels.iter().zip(&answers) {
            let answer = answer.as_ref().trim();
            if answer.is_empty() {
                return Err(ActivityError::EmptyAnswer {
                    label: label.clone(),
                });
            }
            submission.insert(label.clone(), answer);
        }
        Ok(submission)
    }
}
