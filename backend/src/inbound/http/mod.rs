//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod cache_control;
pub mod error;
pub mod forms;
pub mod forms_dto;
pub mod health;
pub mod responses;
pub mod results;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api` handler and the extractor error handlers on `cfg`.
///
/// # Examples
/// ```ignore
/// use actix_web::{App, web};
/// use formly::inbound::http::configure_api;
///
/// let app = App::new().app_data(state).service(web::scope("/api").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(auth::sign_in)
        .service(auth::sign_up)
        .service(auth::sign_out)
        .service(auth::current_user)
        .service(auth::update_profile)
        .service(auth::change_password)
        .service(auth::delete_account)
        .service(forms::list_forms)
        .service(forms::create_form)
        .service(responses::list_responses)
        .service(responses::submit_response)
        .service(results::results_table)
        .service(results::results_chart)
        .service(results::export_csv)
        .service(forms::get_form)
        .service(forms::replace_form)
        .service(forms::delete_form);
}
