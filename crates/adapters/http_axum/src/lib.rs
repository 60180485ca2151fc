//! # servicehub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for services (`/api/services`, `/api/me/services`)
//!   and for the devices linked to them (`/api/services/{id}/things`,
//!   `/api/services/{id}/devices`)
//! - Establish the [`Caller`](servicehub_domain::caller::Caller) of a request
//!   from the identity headers set by the upstream gateway
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `servicehub-app` (for port traits and services) and
//! `servicehub-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod caller;
pub mod error;
pub mod router;
pub mod state;
