//! Best-effort removal of everything that references a deleted service.

use servicehub_domain::id::{ServiceId, ThingId};

use crate::ports::{DeviceRepository, DeviceTemplateRepository, TokenManager};

/// What a [`LinkCleanup::post_delete_cleanup`] run managed to do.
///
/// `None` (or `false`) marks a branch that failed; its error was logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub device_links_removed: Option<u64>,
    pub template_links_removed: Option<u64>,
    pub token_revoked: bool,
}

impl CleanupReport {
    /// Whether every branch succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.device_links_removed.is_some()
            && self.template_links_removed.is_some()
            && self.token_revoked
    }
}

/// Removes device links, template links and the access token of a service.
pub struct LinkCleanup<D, T, K> {
    devices: D,
    templates: T,
    tokens: K,
}

impl<D, T, K> LinkCleanup<D, T, K>
where
    D: DeviceRepository,
    T: DeviceTemplateRepository,
    K: TokenManager,
{
    pub fn new(devices: D, templates: T, tokens: K) -> Self {
        Self {
            devices,
            templates,
            tokens,
        }
    }

    /// Run the three cleanup steps concurrently.
    ///
    /// The steps are independent. Failures are logged and never returned:
    /// partial cleanup is acceptable and must not fail the delete that
    /// triggered it.
    #[tracing::instrument(skip(self))]
    pub async fn post_delete_cleanup(&self, service_id: ServiceId) -> CleanupReport {
        let (devices, templates, token) = tokio::join!(
            self.devices.unlink_service(service_id),
            self.templates.unlink_service(service_id),
            self.tokens.delete_token_by_thing_id(ThingId::from(service_id)),
        );

        let device_links_removed = devices
            .inspect_err(|err| {
                tracing::warn!(error = %err, "failed to unlink service from devices");
            })
            .ok();
        let template_links_removed = templates
            .inspect_err(|err| {
                tracing::warn!(error = %err, "failed to unlink service from device templates");
            })
            .ok();
        let token_revoked = token
            .inspect_err(|err| tracing::warn!(error = %err, "failed to revoke service token"))
            .is_ok();

        let report = CleanupReport {
            device_links_removed,
            template_links_removed,
            token_revoked,
        };
        tracing::debug!(?report, "post-delete cleanup finished");
        report
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use servicehub_domain::device::Device;
    use servicehub_domain::error::ServiceHubError;
    use std::collections::HashMap;
    use std::future::Future;
    use std::io;
    use std::sync::Mutex;

    fn failure(what: &str) -> ServiceHubError {
        ServiceHubError::Storage(Box::new(io::Error::other(what.to_string())))
    }

    /// Link table keyed by service, with an optional injected failure.
    #[derive(Default)]
    pub(crate) struct FakeLinks {
        pub links: Mutex<HashMap<ServiceId, u64>>,
        pub fail: bool,
    }

    impl FakeLinks {
        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub(crate) fn with_links(service_id: ServiceId, count: u64) -> Self {
            let links = Self::default();
            links.links.lock().unwrap().insert(service_id, count);
            links
        }

        fn remove(&self, service_id: ServiceId) -> Result<u64, ServiceHubError> {
            if self.fail {
                return Err(failure("links unavailable"));
            }
            Ok(self.links.lock().unwrap().remove(&service_id).unwrap_or(0))
        }
    }

    impl DeviceRepository for FakeLinks {
        fn find_linked_to_service(
            &self,
            _service_id: ServiceId,
        ) -> impl Future<Output = Result<Vec<Device>, ServiceHubError>> + Send {
            async { Ok(vec![]) }
        }

        fn unlink_service(
            &self,
            service_id: ServiceId,
        ) -> impl Future<Output = Result<u64, ServiceHubError>> + Send {
            let result = self.remove(service_id);
            async { result }
        }
    }

    impl DeviceTemplateRepository for FakeLinks {
        fn unlink_service(
            &self,
            service_id: ServiceId,
        ) -> impl Future<Output = Result<u64, ServiceHubError>> + Send {
            let result = self.remove(service_id);
            async { result }
        }
    }

    #[derive(Default)]
    pub(crate) struct FakeTokens {
        pub revoked: Mutex<Vec<ThingId>>,
        pub fail: bool,
    }

    impl TokenManager for FakeTokens {
        fn delete_token_by_thing_id(
            &self,
            thing_id: ThingId,
        ) -> impl Future<Output = Result<(), ServiceHubError>> + Send {
            let result = if self.fail {
                Err(failure("token store unavailable"))
            } else {
                self.revoked.lock().unwrap().push(thing_id);
                Ok(())
            };
            async { result }
        }
    }

    #[tokio::test]
    async fn should_remove_links_and_revoke_token() {
        let service_id = ServiceId::new();
        let cleanup = LinkCleanup::new(
            FakeLinks::with_links(service_id, 3),
            FakeLinks::with_links(service_id, 1),
            FakeTokens::default(),
        );

        let report = cleanup.post_delete_cleanup(service_id).await;

        assert!(report.is_complete());
        assert_eq!(report.device_links_removed, Some(3));
        assert_eq!(report.template_links_removed, Some(1));
        assert_eq!(
            cleanup.tokens.revoked.lock().unwrap().as_slice(),
            &[ThingId::from(service_id)]
        );
    }

    #[tokio::test]
    async fn should_finish_other_branches_when_device_unlink_fails() {
        let service_id = ServiceId::new();
        let cleanup = LinkCleanup::new(
            FakeLinks::failing(),
            FakeLinks::with_links(service_id, 2),
            FakeTokens::default(),
        );

        let report = cleanup.post_delete_cleanup(service_id).await;

        assert!(!report.is_complete());
        assert_eq!(report.device_links_removed, None);
        assert_eq!(report.template_links_removed, Some(2));
        assert!(report.token_revoked);
    }

    #[tokio::test]
    async fn should_report_instead_of_failing_when_every_branch_fails() {
        let cleanup = LinkCleanup::new(
            FakeLinks::failing(),
            FakeLinks::failing(),
            FakeTokens {
                fail: true,
                ..FakeTokens::default()
            },
        );

        let report = cleanup.post_delete_cleanup(ServiceId::new()).await;

        assert_eq!(report, CleanupReport::default());
    }

    #[tokio::test]
    async fn should_succeed_when_nothing_references_the_service() {
        let cleanup = LinkCleanup::new(
            FakeLinks::default(),
            FakeLinks::default(),
            FakeTokens::default(),
        );

        let report = cleanup.post_delete_cleanup(ServiceId::new()).await;

        assert!(report.is_complete());
        assert_eq!(report.device_links_removed, Some(0));
    }
}
