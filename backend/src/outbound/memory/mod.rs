//! In-process store implementing every persistence port.
//!
//! Used when no database URL is configured and by the HTTP integration tests.
//! All state lives behind one mutex, so each operation is atomic the same way
//! a database transaction is.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    FormRepository, FormRepositoryError, NewForm, ResponseRepository, ResponseRepositoryError,
    UserAccount, UserPersistenceError, UserRepository,
};
use crate::domain::{
    EmailAddress, Form, FormContent, FormDetail, FormId, FormResponse, PasswordHash, QuestionId,
    User, UserId, UserProfile, plan_question_set,
};

#[derive(Default)]
struct State {
    users: HashMap<UserId, UserAccount>,
    forms: HashMap<FormId, Form>,
    responses: HashMap<FormId, Vec<FormResponse>>,
}

impl State {
    fn email_taken(&self, email: &EmailAddress, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|account| account.user.email == *email && Some(account.user.id) != except)
    }

    fn with_count(&self, form: &Form) -> Form {
        let mut form = form.clone();
        form.response_count = self.responses.get(&form.id).map_or(0, Vec::len);
        form
    }

    fn remove_form(&mut self, id: &FormId) {
        self.forms.remove(id);
        self.responses.remove(id);
    }
}

/// Mutex-guarded in-memory implementation of the user, form and response
/// repositories.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut state = self.lock();
        if state.email_taken(&account.user.email, None) {
            return Err(UserPersistenceError::duplicate_email(
                account.user.email.as_ref(),
            ));
        }
        state.users.insert(account.user.id, account.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|account| account.user.email == *email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self.lock().users.get(id).cloned())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        profile: &UserProfile,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut state = self.lock();
        if state.email_taken(&profile.email, Some(*id)) {
            return Err(UserPersistenceError::duplicate_email(profile.email.as_ref()));
        }
        Ok(state.users.get_mut(id).map(|account| {
            account.user.name = profile.name.clone();
            account.user.email = profile.email.clone();
            account.user.clone()
        }))
    }

    async fn update_password(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<bool, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .get_mut(id)
            .map(|account| account.password_hash = password_hash.clone())
            .is_some())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut state = self.lock();
        if state.users.remove(id).is_none() {
            return Ok(false);
        }
        let owned: Vec<FormId> = state
            .forms
            .values()
            .filter(|form| form.is_owned_by(id))
            .map(|form| form.id)
            .collect();
        for form_id in &owned {
            state.remove_form(form_id);
        }
        Ok(true)
    }
}

#[async_trait]
impl FormRepository for InMemoryStore {
    async fn insert(&self, form: &NewForm) -> Result<Form, FormRepositoryError> {
        let mut state = self.lock();
        if !state.users.contains_key(&form.owner_id) {
            return Err(FormRepositoryError::owner_not_found(form.owner_id.to_string()));
        }
        let now = Utc::now();
        let stored = Form {
            id: form.id,
            owner_id: form.owner_id,
            title: form.content.title.clone(),
            description: form.content.description.clone(),
            published: form.content.published,
            created_at: now,
            updated_at: now,
            questions: plan_question_set(&[], &form.content.questions),
            response_count: 0,
        };
        state.forms.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Form>, FormRepositoryError> {
        let state = self.lock();
        let mut forms: Vec<Form> = state
            .forms
            .values()
            .filter(|form| form.is_owned_by(owner))
            .map(|form| state.with_count(form))
            .collect();
        forms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(forms)
    }

    async fn find_by_id(&self, id: &FormId) -> Result<Option<Form>, FormRepositoryError> {
        let state = self.lock();
        Ok(state.forms.get(id).map(|form| state.with_count(form)))
    }

    async fn find_detail(&self, id: &FormId) -> Result<Option<FormDetail>, FormRepositoryError> {
        let state = self.lock();
        Ok(state.forms.get(id).map(|form| {
            let mut responses = state.responses.get(id).cloned().unwrap_or_default();
            responses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            FormDetail {
                form: state.with_count(form),
                responses,
            }
        }))
    }

    async fn replace(
        &self,
        id: &FormId,
        owner: &UserId,
        content: &FormContent,
    ) -> Result<Option<Form>, FormRepositoryError> {
        let mut state = self.lock();
        let Some(form) = state
            .forms
            .get_mut(id)
            .filter(|form| form.is_owned_by(owner))
        else {
            return Ok(None);
        };
        let previous: Vec<QuestionId> = form.questions.iter().map(|question| question.id).collect();
        form.title.clone_from(&content.title);
        form.description.clone_from(&content.description);
        form.published = content.published;
        form.questions = plan_question_set(&previous, &content.questions);
        form.updated_at = Utc::now();
        let updated = form.clone();
        Ok(Some(state.with_count(&updated)))
    }

    async fn delete(&self, id: &FormId, owner: &UserId) -> Result<bool, FormRepositoryError> {
        let mut state = self.lock();
        if !state.forms.get(id).is_some_and(|form| form.is_owned_by(owner)) {
            return Ok(false);
        }
        state.remove_form(id);
        Ok(true)
    }
}

#[async_trait]
impl ResponseRepository for InMemoryStore {
    async fn insert(&self, response: &FormResponse) -> Result<(), ResponseRepositoryError> {
        let mut state = self.lock();
        if !state.forms.contains_key(&response.form_id) {
            return Err(ResponseRepositoryError::form_not_found(
                response.form_id.to_string(),
            ));
        }
        state
            .responses
            .entry(response.form_id)
            .or_default()
            .push(response.clone());
        Ok(())
    }
}
