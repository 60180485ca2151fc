//! Authorizer port: decides whether a caller is privileged.

use servicehub_domain::caller::Caller;

/// Decides whether a caller holds elevated privileges over services.
///
/// Privileged callers see the per-link configuration of every device linked
/// to a service, not only the devices they own.
pub trait Authorizer {
    fn is_authorized(&self, caller: &Caller) -> bool;
}
