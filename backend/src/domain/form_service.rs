//! Form authoring, reading and result aggregation services.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    FormCommand, FormQuery, FormRepository, FormRepositoryError, FormResultsQuery, NewForm,
};
use crate::domain::{
    ChartError, ChartSlice, CsvExport, Error, Form, FormContent, FormDetail, FormId, QuestionId,
    ResponseTable, UserId, chart_distribution, csv_export, table_projection,
};

const FORM_NOT_FOUND: &str = "Form not found";
const NOT_AUTHORIZED: &str = "Not authorized";

/// Form service implementing the authoring, reading and results ports.
#[derive(Clone)]
pub struct FormService<F> {
    forms: Arc<F>,
}

impl<F> FormService<F> {
    /// Create a new service.
    pub fn new(forms: Arc<F>) -> Self {
        Self { forms }
    }
}

fn map_form_error(error: FormRepositoryError) -> Error {
    match error {
        FormRepositoryError::Connection { message } => {
            Error::internal(format!("form repository unavailable: {message}"))
        }
        FormRepositoryError::Query { message } => {
            Error::internal(format!("form repository error: {message}"))
        }
        FormRepositoryError::OwnerNotFound { .. } => Error::not_found("User not found"),
    }
}

fn map_chart_error(error: ChartError, question_id: &QuestionId) -> Error {
    let details = json!({ "questionId": question_id.to_string() });
    match error {
        ChartError::UnknownQuestion => Error::not_found("Question not found").with_details(details),
        ChartError::NotAChoiceQuestion => {
            Error::invalid_request(error.to_string()).with_details(details)
        }
    }
}

fn ensure_owner(form: &Form, user: &UserId) -> Result<(), Error> {
    if form.is_owned_by(user) {
        Ok(())
    } else {
        Err(Error::forbidden(NOT_AUTHORIZED))
    }
}

impl<F: FormRepository> FormService<F> {
    async fn load_detail(&self, form_id: &FormId) -> Result<FormDetail, Error> {
        self.forms
            .find_detail(form_id)
            .await
            .map_err(map_form_error)?
            .ok_or_else(|| Error::not_found(FORM_NOT_FOUND))
    }

    async fn owned_detail(&self, owner: &UserId, form_id: &FormId) -> Result<FormDetail, Error> {
        let detail = self.load_detail(form_id).await?;
        ensure_owner(&detail.form, owner)?;
        Ok(detail)
    }
}

#[async_trait]
impl<F: FormRepository> FormCommand for FormService<F> {
    async fn create(&self, owner: &UserId, content: &FormContent) -> Result<Form, Error> {
        let form = self
            .forms
            .insert(&NewForm {
                id: FormId::random(),
                owner_id: *owner,
                content: content.clone(),
            })
            .await
            .map_err(map_form_error)?;
        info!(form_id = %form.id, questions = form.questions.len(), "form created");
        Ok(form)
    }

    async fn replace(
        &self,
        owner: &UserId,
        form_id: &FormId,
        content: &FormContent,
    ) -> Result<FormDetail, Error> {
        let existing = self
            .forms
            .find_by_id(form_id)
            .await
            .map_err(map_form_error)?
            .ok_or_else(|| Error::not_found(FORM_NOT_FOUND))?;
        ensure_owner(&existing, owner)?;

        // A concurrent delete between the ownership check and the write.
        if self
            .forms
            .replace(form_id, owner, content)
            .await
            .map_err(map_form_error)?
            .is_none()
        {
            return Err(Error::not_found(FORM_NOT_FOUND));
        }
        info!(%form_id, "form replaced");
        self.load_detail(form_id).await
    }

    async fn delete(&self, owner: &UserId, form_id: &FormId) -> Result<(), Error> {
        let existing = self
            .forms
            .find_by_id(form_id)
            .await
            .map_err(map_form_error)?
            .ok_or_else(|| Error::not_found(FORM_NOT_FOUND))?;
        ensure_owner(&existing, owner)?;

        if !self
            .forms
            .delete(form_id, owner)
            .await
            .map_err(map_form_error)?
        {
            return Err(Error::not_found(FORM_NOT_FOUND));
        }
        info!(%form_id, "form deleted");
        Ok(())
    }
}

#[async_trait]
impl<F: FormRepository> FormQuery for FormService<F> {
    async fn list_owned(&self, owner: &UserId) -> Result<Vec<Form>, Error> {
        self.forms
            .list_by_owner(owner)
            .await
            .map_err(map_form_error)
    }

    async fn view(&self, form_id: &FormId, viewer: Option<UserId>) -> Result<FormDetail, Error> {
        let mut detail = self.load_detail(form_id).await?;
        let is_owner = viewer.is_some_and(|user| detail.form.is_owned_by(&user));
        if !detail.form.published {
            match viewer {
                None => return Err(Error::unauthorized(NOT_AUTHORIZED)),
                Some(_) if !is_owner => return Err(Error::forbidden(NOT_AUTHORIZED)),
                Some(_) => {}
            }
        }
        if !is_owner {
            detail.responses.clear();
        }
        Ok(detail)
    }

    async fn responses(&self, owner: &UserId, form_id: &FormId) -> Result<FormDetail, Error> {
        self.owned_detail(owner, form_id).await
    }
}

#[async_trait]
impl<F: FormRepository> FormResultsQuery for FormService<F> {
    async fn table(&self, owner: &UserId, form_id: &FormId) -> Result<ResponseTable, Error> {
        let detail = self.owned_detail(owner, form_id).await?;
        Ok(table_projection(&detail.form, &detail.responses))
    }

    async fn chart(
        &self,
        owner: &UserId,
        form_id: &FormId,
        question_id: &QuestionId,
    ) -> Result<Vec<ChartSlice>, Error> {
        let detail = self.owned_detail(owner, form_id).await?;
        chart_distribution(&detail.form, &detail.responses, question_id)
            .map_err(|err| map_chart_error(err, question_id))
    }

    async fn export_csv(&self, owner: &UserId, form_id: &FormId) -> Result<CsvExport, Error> {
        let detail = self.owned_detail(owner, form_id).await?;
        Ok(csv_export(&detail.form, &detail.responses))
    }
}
