//! Public submission rules: which answers a response must carry and which
//! ones get stored.

use std::collections::HashSet;

use super::form::{Answer, AnswerId, Form, QuestionId};

/// Raw answer as posted by a respondent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerInput {
    /// Question id as supplied by the client.
    pub question_id: String,
    /// Answer text; checkbox selections arrive comma-joined.
    pub value: String,
}

impl AnswerInput {
    /// Convenience constructor.
    pub fn new(question_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            value: value.into(),
        }
    }
}

/// Reasons a submission is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// A required question has no non-blank answer.
    #[error("Question \"{question_text}\" is required")]
    MissingRequired {
        /// Text of the first unanswered required question.
        question_text: String,
    },
    /// An answer references a question that is not on the form.
    #[error("Answer references unknown question {question_id}")]
    UnknownQuestion {
        /// Offending id as supplied.
        question_id: String,
    },
    /// More than one answer targets the same question.
    #[error("Question {question_id} was answered more than once")]
    DuplicateAnswer {
        /// Offending id.
        question_id: String,
    },
}

/// Check a submission against the form and return the answers to store.
///
/// Required questions are checked first, in question order; the first one
/// without a non-blank answer rejects the whole submission. Answers must then
/// reference distinct questions of this form. Blank answers to optional
/// questions are dropped.
pub fn prepare_answers(form: &Form, inputs: &[AnswerInput]) -> Result<Vec<Answer>, SubmissionError> {
    let mut resolved = Vec::with_capacity(inputs.len());
    for input in inputs {
        let question_id = input
            .question_id
            .parse::<QuestionId>()
            .ok()
            .filter(|id| form.question(id).is_some());
        resolved.push((input, question_id));
    }

    for question in form.questions.iter().filter(|question| question.required) {
        let answered = resolved.iter().any(|(input, id)| {
            *id == Some(question.id) && !input.value.trim().is_empty()
        });
        if !answered {
            return Err(SubmissionError::MissingRequired {
                question_text: question.text.clone(),
            });
        }
    }

    let mut seen = HashSet::with_capacity(resolved.len());
    let mut answers = Vec::with_capacity(resolved.len());
    for (input, id) in resolved {
        let Some(question_id) = id else {
            return Err(SubmissionError::UnknownQuestion {
                question_id: input.question_id.clone(),
            });
        };
        if !seen.insert(question_id) {
            return Err(SubmissionError::DuplicateAnswer {
                question_id: question_id.to_string(),
            });
        }
        if input.value.trim().is_empty() {
            continue;
        }
        answers.push(Answer {
            id: AnswerId::random(),
            question_id,
            value: input.value.clone(),
        });
    }
    Ok(answers)
}
