//! Redirect anonymous visitors away from dashboard pages.
//!
//! Any request whose path starts with `/dashboard` must carry a session
//! cookie that verifies; otherwise it is answered with `302 Found` pointing
//! at the sign-in page. Other paths pass through untouched.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::HttpResponse;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::LOCATION;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::ports::SessionTokenService;
use crate::inbound::http::session::claims_from_request;

/// Path prefix guarded by [`DashboardGate`].
pub const DASHBOARD_PREFIX: &str = "/dashboard";
/// Redirect target for anonymous dashboard requests.
pub const SIGN_IN_PATH: &str = "/signin";

/// Middleware factory guarding `/dashboard*`.
///
/// # Examples
/// ```ignore
/// use actix_web::App;
/// use formly::middleware::DashboardGate;
///
/// let app = App::new().wrap(DashboardGate::new(tokens));
/// ```
#[derive(Clone)]
pub struct DashboardGate {
    tokens: Arc<dyn SessionTokenService>,
}

impl DashboardGate {
    /// Guard dashboard paths with `tokens`.
    pub fn new(tokens: Arc<dyn SessionTokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for DashboardGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = DashboardGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(DashboardGateMiddleware {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
        }))
    }
}

/// Service wrapper produced by [`DashboardGate`].
pub struct DashboardGateMiddleware<S> {
    service: Rc<S>,
    tokens: Arc<dyn SessionTokenService>,
}

fn is_dashboard_path(path: &str) -> bool {
    path.starts_with(DASHBOARD_PREFIX)
}

impl<S, B> Service<ServiceRequest> for DashboardGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let allowed = !is_dashboard_path(req.path())
            || claims_from_request(req.request(), self.tokens.as_ref()).is_some();
        if !allowed {
            debug!(path = req.path(), "redirecting anonymous dashboard request");
            let response = HttpResponse::Found()
                .insert_header((LOCATION, SIGN_IN_PATH))
                .finish();
            let res = req.into_response(response).map_into_right_body();
            return Box::pin(async move { Ok(res) });
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
