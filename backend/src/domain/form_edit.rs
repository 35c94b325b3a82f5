//! Editing session for a form definition.
//!
//! `FormEditState` is the pure state machine behind the form builder: it holds
//! an unsaved draft, applies edits, reports whether there is anything to lose
//! and validates the draft before it is persisted. The HTTP adapter runs every
//! create and replace payload through the same validation.

use std::fmt;

use super::form::{Form, FormContent, QuestionContent, QuestionId, QuestionType};

/// Draft question inside an edit session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftQuestion {
    /// Draft-local identifier; persisted ids are kept when loaded from a form.
    pub id: QuestionId,
    /// Prompt.
    pub text: String,
    /// Input kind.
    pub question_type: QuestionType,
    /// Whether an answer is mandatory.
    pub required: bool,
    /// Choices; retained across type switches until saved.
    pub options: Option<Vec<String>>,
}

impl DraftQuestion {
    /// Blank text question with a fresh id.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            id: QuestionId::random(),
            text: String::new(),
            question_type: QuestionType::Text,
            required: false,
            options: None,
        }
    }
}

/// Single-field edit applied by [`FormEditState::update_question`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionField {
    /// Replace the prompt.
    Text(String),
    /// Switch the input kind. Options are left untouched.
    Type(QuestionType),
    /// Toggle the required flag.
    Required(bool),
    /// Replace the options list wholesale.
    Options(Option<Vec<String>>),
}

/// Edits that address a question or option that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// Question index outside `0..len`.
    #[error("question index {index} is out of range for {len} questions")]
    QuestionOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of questions.
        len: usize,
    },
    /// Option index outside the question's options.
    #[error("option index {index} is out of range for {len} options")]
    OptionOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of options.
        len: usize,
    },
}

/// First problem found when validating a draft. Question and option numbers
/// are 1-based as shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormValidationError {
    /// Title blank once trimmed.
    MissingTitle,
    /// The draft has no questions at all.
    NoQuestions,
    /// Question text blank once trimmed.
    MissingQuestionText {
        /// 1-based question number.
        question: usize,
    },
    /// Choice question with fewer than two options.
    TooFewOptions {
        /// 1-based question number.
        question: usize,
    },
    /// Choice option blank once trimmed.
    EmptyOption {
        /// 1-based question number.
        question: usize,
        /// 1-based option number.
        option: usize,
    },
}

impl FormValidationError {
    /// Stable machine-readable code used in error details.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingTitle => "missing_title",
            Self::NoQuestions => "no_questions",
            Self::MissingQuestionText { .. } => "missing_question_text",
            Self::TooFewOptions { .. } => "too_few_options",
            Self::EmptyOption { .. } => "empty_option",
        }
    }
}

impl fmt::Display for FormValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "Form title is required"),
            Self::NoQuestions => write!(f, "Form must have at least one question"),
            Self::MissingQuestionText { question } => {
                write!(f, "Question {question} text is required")
            }
            Self::TooFewOptions { question } => {
                write!(f, "Question {question} needs at least 2 options")
            }
            Self::EmptyOption { question, option } => {
                write!(f, "Option {option} in Question {question} cannot be empty")
            }
        }
    }
}

impl std::error::Error for FormValidationError {}

/// Minimum number of options a choice question needs.
pub const MIN_CHOICE_OPTIONS: usize = 2;

/// Unsaved form draft.
///
/// # Examples
/// ```
/// use formly::domain::{FormEditState, QuestionField};
///
/// let mut draft = FormEditState::new();
/// assert!(!draft.is_dirty());
/// draft.set_title("Feedback");
/// draft.update_question(0, QuestionField::Text("How was it?".into())).unwrap();
/// assert!(draft.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEditState {
    title: String,
    description: String,
    published: bool,
    questions: Vec<DraftQuestion>,
}

impl Default for FormEditState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormEditState {
    /// Fresh draft: empty title and description, one blank text question.
    /// New forms are published on creation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            published: true,
            questions: vec![DraftQuestion::blank()],
        }
    }

    /// Draft seeded from raw parts, as received from a client.
    #[must_use]
    pub fn from_parts(
        title: impl Into<String>,
        description: Option<String>,
        published: bool,
        questions: Vec<DraftQuestion>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.unwrap_or_default(),
            published,
            questions,
        }
    }

    /// Draft for editing an existing form; persisted question ids are kept.
    #[must_use]
    pub fn from_form(form: &Form) -> Self {
        let questions = form
            .questions
            .iter()
            .map(|question| DraftQuestion {
                id: question.id,
                text: question.text.clone(),
                question_type: question.question_type,
                required: question.required,
                options: question.options.clone(),
            })
            .collect();
        Self::from_parts(
            form.title.clone(),
            form.description.clone(),
            form.published,
            questions,
        )
    }

    /// Current title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Publication flag.
    #[must_use]
    pub const fn published(&self) -> bool {
        self.published
    }

    /// Questions in display order.
    #[must_use]
    pub fn questions(&self) -> &[DraftQuestion] {
        &self.questions
    }

    /// Replace the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replace the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Toggle publication.
    pub fn set_published(&mut self, published: bool) {
        self.published = published;
    }

    /// Append a blank text question and return its id.
    pub fn add_question(&mut self) -> QuestionId {
        let question = DraftQuestion::blank();
        let id = question.id;
        self.questions.push(question);
        id
    }

    /// Remove the question at `index`.
    ///
    /// Returns `Ok(false)` without changing anything when it is the only
    /// question left.
    pub fn remove_question(&mut self, index: usize) -> Result<bool, EditError> {
        self.check_question(index)?;
        if self.questions.len() == 1 {
            return Ok(false);
        }
        self.questions.remove(index);
        Ok(true)
    }

    /// Apply a single-field edit to the question at `index`.
    pub fn update_question(&mut self, index: usize, field: QuestionField) -> Result<(), EditError> {
        let question = self.question_mut(index)?;
        match field {
            QuestionField::Text(text) => question.text = text,
            QuestionField::Type(question_type) => question.question_type = question_type,
            QuestionField::Required(required) => question.required = required,
            QuestionField::Options(options) => question.options = options,
        }
        Ok(())
    }

    /// Append an empty option, creating the list if absent.
    pub fn add_option(&mut self, question_index: usize) -> Result<(), EditError> {
        self.question_mut(question_index)?
            .options
            .get_or_insert_with(Vec::new)
            .push(String::new());
        Ok(())
    }

    /// Replace the option at `option_index`.
    pub fn update_option(
        &mut self,
        question_index: usize,
        option_index: usize,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        let options = self
            .question_mut(question_index)?
            .options
            .get_or_insert_with(Vec::new);
        let len = options.len();
        let slot = options
            .get_mut(option_index)
            .ok_or(EditError::OptionOutOfRange {
                index: option_index,
                len,
            })?;
        *slot = value.into();
        Ok(())
    }

    /// Remove the option at `option_index`.
    pub fn remove_option(
        &mut self,
        question_index: usize,
        option_index: usize,
    ) -> Result<(), EditError> {
        let options = self
            .question_mut(question_index)?
            .options
            .get_or_insert_with(Vec::new);
        if option_index >= options.len() {
            return Err(EditError::OptionOutOfRange {
                index: option_index,
                len: options.len(),
            });
        }
        options.remove(option_index);
        Ok(())
    }

    /// Move the question at `source` so that it ends up at `destination`.
    /// All other questions keep their relative order.
    pub fn reorder(&mut self, source: usize, destination: usize) -> Result<(), EditError> {
        self.check_question(source)?;
        self.check_question(destination)?;
        let question = self.questions.remove(source);
        self.questions.insert(destination, question);
        Ok(())
    }

    /// True when the draft holds anything worth warning about before leaving.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.title.is_empty()
            || !self.description.is_empty()
            || self.questions.iter().any(|question| !question.text.is_empty())
    }

    /// Report the first problem in document order.
    pub fn validate(&self) -> Result<(), FormValidationError> {
        if self.title.trim().is_empty() {
            return Err(FormValidationError::MissingTitle);
        }
        if self.questions.is_empty() {
            return Err(FormValidationError::NoQuestions);
        }
        for (position, question) in self.questions.iter().enumerate() {
            let number = position + 1;
            if question.text.trim().is_empty() {
                return Err(FormValidationError::MissingQuestionText { question: number });
            }
            if !question.question_type.is_choice() {
                continue;
            }
            let options = question.options.as_deref().unwrap_or_default();
            if options.len() < MIN_CHOICE_OPTIONS {
                return Err(FormValidationError::TooFewOptions { question: number });
            }
            if let Some(blank) = options.iter().position(|option| option.trim().is_empty()) {
                return Err(FormValidationError::EmptyOption {
                    question: number,
                    option: blank + 1,
                });
            }
        }
        Ok(())
    }

    /// Validate and convert the draft into persistable content.
    ///
    /// Options are dropped from text questions; a blank description becomes
    /// `None`.
    pub fn to_content(&self) -> Result<FormContent, FormValidationError> {
        self.validate()?;
        let description =
            (!self.description.trim().is_empty()).then(|| self.description.clone());
        let questions = self
            .questions
            .iter()
            .map(|question| QuestionContent {
                id: Some(question.id),
                text: question.text.clone(),
                question_type: question.question_type,
                required: question.required,
                options: if question.question_type.is_choice() {
                    question.options.clone()
                } else {
                    None
                },
            })
            .collect();
        Ok(FormContent {
            title: self.title.clone(),
            description,
            published: self.published,
            questions,
        })
    }

    fn check_question(&self, index: usize) -> Result<(), EditError> {
        if index < self.questions.len() {
            Ok(())
        } else {
            Err(EditError::QuestionOutOfRange {
                index,
                len: self.questions.len(),
            })
        }
    }

    fn question_mut(&mut self, index: usize) -> Result<&mut DraftQuestion, EditError> {
        let len = self.questions.len();
        self.questions
            .get_mut(index)
            .ok_or(EditError::QuestionOutOfRange { index, len })
    }
}
