//! # ecohub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **resource-style JSON API** under `/api`
//!   (`/api/devices`, `/api/threshold`, `/api/history`, …)
//! - Serve a **document-style RPC API** under `/rpc`: one endpoint per
//!   service, each accepting `{"operation": …, "params": {…}}` envelopes
//! - Map HTTP requests into [`EnergyFacade`](ecohub_app::facade::EnergyFacade)
//!   calls (driving adapter) and map results back into HTTP responses
//!
//! Both surfaces call the same facade method for the same operation, so
//! for equal state they return equal payloads; only the framing differs.
//!
//! ## Dependency rule
//! Depends on `ecohub-app` (for port traits and the facade) and
//! `ecohub-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod error;
pub mod extract;
pub mod rest;
pub mod router;
pub mod rpc;
pub mod state;
