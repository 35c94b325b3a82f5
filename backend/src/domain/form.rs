//! Form aggregate: forms, their ordered questions and submitted responses.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::ids::uuid_identifier;
use super::user::UserId;

uuid_identifier!(
    /// Form identifier.
    FormId
);
uuid_identifier!(
    /// Question identifier, stable across edits that keep the question.
    QuestionId
);
uuid_identifier!(
    /// Submitted response identifier.
    ResponseId
);
uuid_identifier!(
    /// Individual answer identifier.
    AnswerId
);

/// Kind of input a question collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    /// Free text.
    Text,
    /// Single choice rendered as radio buttons.
    MultipleChoice,
    /// Multiple choice rendered as checkboxes.
    Checkbox,
    /// Single choice rendered as a select box.
    Dropdown,
}

impl QuestionType {
    /// Wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::MultipleChoice => "multipleChoice",
            Self::Checkbox => "checkbox",
            Self::Dropdown => "dropdown",
        }
    }

    /// Choice questions carry an options list and feed the chart view.
    #[must_use]
    pub const fn is_choice(self) -> bool {
        !matches!(self, Self::Text)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a question type string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown question type: {0}")]
pub struct UnknownQuestionType(pub String);

impl FromStr for QuestionType {
    type Err = UnknownQuestionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "multipleChoice" => Ok(Self::MultipleChoice),
            "checkbox" => Ok(Self::Checkbox),
            "dropdown" => Ok(Self::Dropdown),
            other => Err(UnknownQuestionType(other.to_owned())),
        }
    }
}

/// Persisted question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Identifier.
    pub id: QuestionId,
    /// Prompt shown to respondents.
    pub text: String,
    /// Input kind.
    pub question_type: QuestionType,
    /// Whether a non-empty answer is mandatory.
    pub required: bool,
    /// Choices; only present for choice types.
    pub options: Option<Vec<String>>,
}

/// Single answer inside a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Identifier.
    pub id: AnswerId,
    /// Question answered. Kept even if the question is later removed.
    pub question_id: QuestionId,
    /// Answer text; checkbox selections are comma-joined.
    pub value: String,
}

/// One submission of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormResponse {
    /// Identifier.
    pub id: ResponseId,
    /// Owning form.
    pub form_id: FormId,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Stored answers.
    pub answers: Vec<Answer>,
}

/// Form with its ordered questions and the number of responses received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    /// Identifier.
    pub id: FormId,
    /// Account that created the form.
    pub owner_id: UserId,
    /// Title; never blank for forms written through the API.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Published forms accept anonymous responses.
    pub published: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last change to the form definition.
    pub updated_at: DateTime<Utc>,
    /// Questions ordered by position.
    pub questions: Vec<Question>,
    /// Number of stored responses.
    pub response_count: usize,
}

impl Form {
    /// Whether `user` created this form.
    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner_id == *user
    }

    /// Look up a question by id.
    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == *id)
    }
}

/// Form plus its responses, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDetail {
    /// The form definition.
    pub form: Form,
    /// Responses ordered by submission time, newest first.
    pub responses: Vec<FormResponse>,
}

/// Question definition supplied when creating or replacing a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionContent {
    /// Id to keep when the question already belongs to the form.
    pub id: Option<QuestionId>,
    /// Prompt.
    pub text: String,
    /// Input kind.
    pub question_type: QuestionType,
    /// Whether an answer is mandatory.
    pub required: bool,
    /// Choices for choice types; `None` for text questions.
    pub options: Option<Vec<String>>,
}

/// Complete, validated definition of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormContent {
    /// Title.
    pub title: String,
    /// Optional description; blank input is stored as `None`.
    pub description: Option<String>,
    /// Publication flag.
    pub published: bool,
    /// Questions in display order.
    pub questions: Vec<QuestionContent>,
}

/// Materialise the question set for a write.
///
/// Questions whose id belonged to the form's previous question set keep it so
/// stored answers stay linked; all others receive fresh ids. Duplicate ids in
/// the input are only honoured once.
///
/// # Examples
/// ```
/// use formly::domain::{QuestionContent, QuestionId, QuestionType, plan_question_set};
///
/// let kept = QuestionId::random();
/// let planned = plan_question_set(
///     &[kept],
///     &[QuestionContent {
///         id: Some(kept),
///         text: "Name".into(),
///         question_type: QuestionType::Text,
///         required: true,
///         options: None,
///     }],
/// );
/// assert_eq!(planned[0].id, kept);
/// ```
#[must_use]
pub fn plan_question_set(previous: &[QuestionId], content: &[QuestionContent]) -> Vec<Question> {
    let known: HashSet<QuestionId> = previous.iter().copied().collect();
    let mut used = HashSet::with_capacity(content.len());
    content
        .iter()
        .map(|question| {
            let id = question
                .id
                .filter(|id| known.contains(id) && used.insert(*id))
                .unwrap_or_else(QuestionId::random);
            Question {
                id,
                text: question.text.clone(),
                question_type: question.question_type,
                required: question.required,
                options: question.options.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn content(id: Option<QuestionId>) -> QuestionContent {
        QuestionContent {
            id,
            text: "Favourite colour".to_owned(),
            question_type: QuestionType::MultipleChoice,
            required: false,
            options: Some(vec!["Red".to_owned(), "Blue".to_owned()]),
        }
    }

    #[rstest]
    #[case("text", QuestionType::Text)]
    #[case("multipleChoice", QuestionType::MultipleChoice)]
    #[case("checkbox", QuestionType::Checkbox)]
    #[case("dropdown", QuestionType::Dropdown)]
    fn question_types_parse_and_print(#[case] raw: &str, #[case] expected: QuestionType) {
        let parsed: QuestionType = raw.parse().expect("known type");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), raw);
    }

    #[rstest]
    fn unknown_question_type_is_rejected() {
        let err = "rating".parse::<QuestionType>().expect_err("unknown type");
        assert_eq!(err, UnknownQuestionType("rating".to_owned()));
    }

    #[rstest]
    fn only_text_is_not_a_choice() {
        assert!(!QuestionType::Text.is_choice());
        assert!(QuestionType::Dropdown.is_choice());
    }

    #[rstest]
    fn plan_keeps_known_ids_and_replaces_unknown_ones() {
        let kept = QuestionId::random();
        let foreign = QuestionId::random();
        let planned = plan_question_set(&[kept], &[content(Some(kept)), content(Some(foreign))]);

        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].id, kept);
        assert_ne!(planned[1].id, foreign);
    }

    #[rstest]
    fn plan_honours_duplicate_ids_once() {
        let kept = QuestionId::random();
        let planned = plan_question_set(&[kept], &[content(Some(kept)), content(Some(kept))]);

        assert_eq!(planned[0].id, kept);
        assert_ne!(planned[1].id, kept);
    }

    #[rstest]
    fn plan_assigns_fresh_ids_for_new_questions() {
        let planned = plan_question_set(&[], &[content(None)]);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].options.as_deref().map(<[String]>::len), Some(2));
    }
}
