//! # servicehub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ServiceRepository`: CRUD, status and owner search for services
//!   - `DeviceRepository`: service-filtered device reads, link removal
//!   - `DeviceTemplateRepository`: link removal on templates
//!   - `TokenManager`: per-thing credential revocation
//!   - `PropertyPublisher`: property-update notifications
//!   - `Authorizer`: caller privilege decision
//! - Define **driving/inbound ports** as use-case structs:
//!   - `ServiceManager`: create, get, list, update, status, delete
//!   - `LinkCleanup`: best-effort removal of references to a deleted service
//!   - `LinkedDeviceService`: projections of the devices linked to a service
//! - Provide **in-process infrastructure** that doesn't need IO
//!   (property bus, role-based authorizer)
//!
//! ## Dependency rule
//! Depends on `servicehub-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod property_bus;
pub mod role_authorizer;
pub mod services;
