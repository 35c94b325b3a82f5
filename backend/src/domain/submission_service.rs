//! Anonymous response submission.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    FormRepository, FormRepositoryError, ResponseCommand, ResponseRepository,
    ResponseRepositoryError,
};
use crate::domain::{
    AnswerInput, Error, FormId, FormResponse, ResponseId, SubmissionError, prepare_answers,
};

const NOT_ACCEPTING: &str = "Form not found or not published";

/// Implements [`ResponseCommand`] over the form and response repositories.
#[derive(Clone)]
pub struct ResponseSubmissionService<F, R> {
    forms: Arc<F>,
    responses: Arc<R>,
}

impl<F, R> ResponseSubmissionService<F, R> {
    /// Create a new service.
    pub fn new(forms: Arc<F>, responses: Arc<R>) -> Self {
        Self { forms, responses }
    }
}

fn map_form_error(error: FormRepositoryError) -> Error {
    Error::internal(format!("form lookup failed: {error}"))
}

fn map_response_error(error: ResponseRepositoryError) -> Error {
    match error {
        ResponseRepositoryError::FormNotFound { .. } => Error::not_found(NOT_ACCEPTING),
        other => Error::internal(format!("response storage failed: {other}")),
    }
}

fn map_submission_error(error: SubmissionError) -> Error {
    let details = match &error {
        SubmissionError::MissingRequired { question_text } => {
            json!({ "code": "required", "question": question_text })
        }
        SubmissionError::UnknownQuestion { question_id } => {
            json!({ "code": "unknown_question", "questionId": question_id })
        }
        SubmissionError::DuplicateAnswer { question_id } => {
            json!({ "code": "duplicate_answer", "questionId": question_id })
        }
    };
    Error::invalid_request(error.to_string()).with_details(details)
}

#[async_trait]
impl<F, R> ResponseCommand for ResponseSubmissionService<F, R>
where
    F: FormRepository,
    R: ResponseRepository,
{
    async fn submit(
        &self,
        form_id: &FormId,
        answers: Vec<AnswerInput>,
    ) -> Result<FormResponse, Error> {
        let form = self
            .forms
            .find_by_id(form_id)
            .await
            .map_err(map_form_error)?
            .filter(|form| form.published)
            .ok_or_else(|| Error::not_found(NOT_ACCEPTING))?;

        let response = FormResponse {
            id: ResponseId::random(),
            form_id: form.id,
            created_at: Utc::now(),
            answers: prepare_answers(&form, &answers).map_err(map_submission_error)?,
        };
        self.responses
            .insert(&response)
            .await
            .map_err(map_response_error)?;
        info!(%form_id, response_id = %response.id, answers = response.answers.len(), "response stored");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockFormRepository, MockResponseRepository};
    use crate::domain::{ErrorCode, Form, Question, QuestionId, QuestionType, UserId};
    use rstest::{fixture, rstest};

    #[fixture]
    fn form() -> Form {
        let now = Utc::now();
        Form {
            id: FormId::random(),
            owner_id: UserId::random(),
            title: "Feedback".into(),
            description: None,
            published: true,
            created_at: now,
            updated_at: now,
            questions: vec![Question {
                id: QuestionId::random(),
                text: "Name".into(),
                question_type: QuestionType::Text,
                required: true,
                options: None,
            }],
            response_count: 0,
        }
    }

    fn forms_returning(form: Option<Form>) -> MockFormRepository {
        let mut forms = MockFormRepository::new();
        forms
            .expect_find_by_id()
            .return_once(move |_| Ok(form));
        forms
    }

    #[rstest]
    #[tokio::test]
    async fn stores_valid_submissions(form: Form) {
        let question_id = form.questions[0].id;
        let form_id = form.id;
        let mut responses = MockResponseRepository::new();
        responses
            .expect_insert()
            .withf(move |response| {
                response.form_id == form_id && response.answers[0].question_id == question_id
            })
            .times(1)
            .return_once(|_| Ok(()));
        let service =
            ResponseSubmissionService::new(Arc::new(forms_returning(Some(form))), Arc::new(responses));

        let response = service
            .submit(&form_id, vec![AnswerInput::new(question_id.to_string(), "Ada")])
            .await
            .expect("stored");

        assert_eq!(response.answers.len(), 1);
    }

    #[rstest]
    #[case::missing(None)]
    #[case::unpublished(Some(false))]
    #[tokio::test]
    async fn rejects_forms_not_accepting_responses(form: Form, #[case] published: Option<bool>) {
        let form_id = form.id;
        let found = published.map(|published| Form { published, ..form });
        let mut responses = MockResponseRepository::new();
        responses.expect_insert().never();
        let service =
            ResponseSubmissionService::new(Arc::new(forms_returning(found)), Arc::new(responses));

        let err = service.submit(&form_id, Vec::new()).await.expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), NOT_ACCEPTING);
    }

    #[rstest]
    #[tokio::test]
    async fn reports_missing_required_answers(form: Form) {
        let form_id = form.id;
        let mut responses = MockResponseRepository::new();
        responses.expect_insert().never();
        let service =
            ResponseSubmissionService::new(Arc::new(forms_returning(Some(form))), Arc::new(responses));

        let err = service.submit(&form_id, Vec::new()).await.expect_err("rejected");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Question \"Name\" is required");
    }

    #[rstest]
    #[tokio::test]
    async fn form_deleted_mid_submission_is_not_found(form: Form) {
        let question_id = form.questions[0].id;
        let form_id = form.id;
        let mut responses = MockResponseRepository::new();
        responses
            .expect_insert()
            .return_once(move |_| Err(ResponseRepositoryError::form_not_found(form_id.to_string())));
        let service =
            ResponseSubmissionService::new(Arc::new(forms_returning(Some(form))), Arc::new(responses));

        let err = service
            .submit(&form_id, vec![AnswerInput::new(question_id.to_string(), "Ada")])
            .await
            .expect_err("gone");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
