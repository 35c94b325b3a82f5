//! Domain ports.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`SessionTokenService`])
//! are implemented by outbound adapters. Driving ports (`*Command`, `*Query`,
//! [`LoginService`]) are implemented by domain services and consumed by the
//! HTTP adapter.

mod macros;

mod account_command;
mod account_query;
mod form_command;
mod form_query;
mod form_repository;
mod form_results_query;
mod login_service;
mod password_hasher;
mod response_command;
mod response_repository;
mod session_tokens;
mod user_repository;

use macros::define_port_error;

pub use account_command::AccountCommand;
pub use account_query::AccountQuery;
pub use form_command::FormCommand;
pub use form_query::FormQuery;
pub use form_repository::{FormRepository, FormRepositoryError, NewForm};
pub use form_results_query::FormResultsQuery;
pub use login_service::LoginService;
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use response_command::ResponseCommand;
pub use response_repository::{ResponseRepository, ResponseRepositoryError};
pub use session_tokens::{SessionTokenError, SessionTokenService};
pub use user_repository::{UserAccount, UserPersistenceError, UserRepository};

#[cfg(test)]
pub use account_command::MockAccountCommand;
#[cfg(test)]
pub use account_query::MockAccountQuery;
#[cfg(test)]
pub use form_command::MockFormCommand;
#[cfg(test)]
pub use form_query::MockFormQuery;
#[cfg(test)]
pub use form_repository::MockFormRepository;
#[cfg(test)]
pub use form_results_query::MockFormResultsQuery;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
#[cfg(test)]
pub use response_command::MockResponseCommand;
#[cfg(test)]
pub use response_repository::MockResponseRepository;
#[cfg(test)]
pub use session_tokens::MockSessionTokenService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
