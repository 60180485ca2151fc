//! # servicehub-domain
//!
//! Pure domain model for the servicehub service-resource manager.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Services** (third-party capabilities that devices link to)
//! - Define **Devices** as read with their references populated, and the
//!   per-device **linked service** entries
//! - Define the **Caller** identity requests are made on behalf of
//! - Define the **read models** returned by the linked-device projections
//! - Define **Events** published when service properties change
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod caller;
pub mod device;
pub mod event;
pub mod linked_device;
pub mod service;
pub mod user;
