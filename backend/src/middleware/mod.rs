//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! tracing and the dashboard sign-in gate.

pub mod dashboard_gate;
pub mod trace;

pub use dashboard_gate::DashboardGate;
pub use trace::Trace;
