//! HTTP surface for loanscore deployments
//!
//! Routes:
//!
//! - `GET  /healthz`
//! - `GET  /schemas` loaded deployments
//! - `GET  /schemas/{variant}` field and slot layout
//! - `POST /schemas/{variant}/encode` form to vector, no classifier involved
//! - `POST /schemas/{variant}/predict[?explain=true]` form to verdict

pub mod rest;

pub use rest::RestApi;
