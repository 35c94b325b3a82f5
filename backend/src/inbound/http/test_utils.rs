//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::web;
use chrono::Utc;

use crate::domain::ports::{
    MockAccountCommand, MockAccountQuery, MockFormCommand, MockFormQuery, MockFormResultsQuery,
    MockLoginService, MockResponseCommand, MockSessionTokenService,
};
use crate::domain::{
    EmailAddress, Form, FormId, Question, QuestionId, QuestionType, SessionClaims, User, UserId,
    UserName,
};
use crate::inbound::http::session::SESSION_COOKIE;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Port mocks with no expectations; tests set the ones they exercise.
pub struct MockPorts {
    /// Login service mock.
    pub login: MockLoginService,
    /// Account query mock.
    pub account_query: MockAccountQuery,
    /// Account command mock.
    pub account_command: MockAccountCommand,
    /// Form command mock.
    pub form_command: MockFormCommand,
    /// Form query mock.
    pub form_query: MockFormQuery,
    /// Form results query mock.
    pub form_results: MockFormResultsQuery,
    /// Response command mock.
    pub responses: MockResponseCommand,
    /// Session token service mock.
    pub tokens: MockSessionTokenService,
}

impl Default for MockPorts {
    fn default() -> Self {
        Self {
            login: MockLoginService::new(),
            account_query: MockAccountQuery::new(),
            account_command: MockAccountCommand::new(),
            form_command: MockFormCommand::new(),
            form_query: MockFormQuery::new(),
            form_results: MockFormResultsQuery::new(),
            responses: MockResponseCommand::new(),
            tokens: MockSessionTokenService::new(),
        }
    }
}

impl MockPorts {
    /// Wrap the mocks into shared handler state with insecure cookies.
    pub fn into_state(self) -> web::Data<HttpState> {
        let ports = HttpStatePorts {
            login: Arc::new(self.login),
            account_query: Arc::new(self.account_query),
            account_command: Arc::new(self.account_command),
            form_command: Arc::new(self.form_command),
            form_query: Arc::new(self.form_query),
            form_results: Arc::new(self.form_results),
            responses: Arc::new(self.responses),
            tokens: Arc::new(self.tokens),
        };
        web::Data::new(HttpState::new(ports).with_cookie_secure(false))
    }
}

/// Handler state whose only configured port is the token service.
pub fn state_with_tokens(tokens: MockSessionTokenService) -> web::Data<HttpState> {
    MockPorts {
        tokens,
        ..MockPorts::default()
    }
    .into_state()
}

/// Fixed account used across handler tests.
pub fn test_user() -> User {
    User {
        id: UserId::random(),
        name: UserName::parse_optional(Some("Ada Lovelace")).expect("valid name"),
        email: EmailAddress::parse("ada@example.com").expect("valid email"),
    }
}

/// Make every presented session cookie verify as `user`.
pub fn sign_in_as(ports: &mut MockPorts, user: &User) {
    let claims = SessionClaims {
        user_id: user.id,
        email: user.email.clone(),
    };
    ports
        .tokens
        .expect_verify()
        .returning(move |_| Ok(claims.clone()));
}

/// Session cookie accepted by [`sign_in_as`].
pub fn session_cookie() -> Cookie<'static> {
    Cookie::new(SESSION_COOKIE, "token")
}

/// Published form with one required text question and one dropdown.
pub fn sample_form(owner: UserId) -> Form {
    let now = Utc::now();
    Form {
        id: FormId::random(),
        owner_id: owner,
        title: "Feedback".to_owned(),
        description: Some("Tell us".to_owned()),
        published: true,
        created_at: now,
        updated_at: now,
        questions: vec![
            Question {
                id: QuestionId::random(),
                text: "Name".to_owned(),
                question_type: QuestionType::Text,
                required: true,
                options: None,
            },
            Question {
                id: QuestionId::random(),
                text: "Colour".to_owned(),
                question_type: QuestionType::Dropdown,
                required: false,
                options: Some(vec!["Red".to_owned(), "Blue".to_owned()]),
            },
        ],
        response_count: 0,
    }
}
