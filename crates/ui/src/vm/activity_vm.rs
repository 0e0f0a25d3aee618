use course_core::model::{Activity, ActivitySubmission};

use crate::vm::labels::activity_kind_label;

/// One prompt of an activity together with the stored answer, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormFieldVm {
    pub label: String,
    pub answer: Option<String>,
}

/// An activity ready to be shown as a form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityFormVm {
    pub title: String,
    pub description: String,
    pub kind_label: &'static str,
    /// Template fields rather than open questions.
    pub is_template: bool,
    pub fields: Vec<FormFieldVm>,
    pub submitted: bool,
}

impl ActivityFormVm {
    #[must_use]
    pub fn new(activity: &Activity, submission: Option<&ActivitySubmission>) -> Self {
        let fields = activity
            .prompt_labels()
            .iter()
            .map(|label| FormFieldVm {
                label: label.clone(),
                answer: submission
                    .and_then(|s| s.get(label))
                    .map(str::to_owned),
            })
            .collect();

        Self {
            title: activity.title().to_owned(),
            description: activity.description().to_owned(),
            kind_label: activity_kind_label(activity.kind()),
            is_template: activity.prompts().is_form(),
            fields,
            submitted: submission.is_some(),
        }
    }

    /// Answers for every field, or `None` while any is missing.
    #[must_use]
    pub fn answers(&self) -> Option<Vec<&str>> {
        self.fields
            .iter()
            .map(|field| field.answer.as_deref())
            .collect()
    }
}
