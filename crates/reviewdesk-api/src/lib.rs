//! ReviewDesk report gateway
//!
//! Authenticated dashboard endpoints that run the submission aggregator and
//! chart builders over the caller's upstream data.

pub mod api_doc;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod setup;
pub mod state;
pub mod telemetry;
