//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use servicehub_app::ports::{
    Authorizer, DeviceRepository, DeviceTemplateRepository, PropertyPublisher,
    ServiceRepository, TokenManager,
};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` next to the `/health` probe.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<SR, PP, DR, TR, TK, AZ>(state: AppState<SR, PP, DR, TR, TK, AZ>) -> Router
where
    SR: ServiceRepository + Send + Sync + 'static,
    PP: PropertyPublisher + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    TR: DeviceTemplateRepository + Send + Sync + 'static,
    TK: TokenManager + Send + Sync + 'static,
    AZ: Authorizer + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caller::{USER_ID_HEADER, USER_ROLE_HEADER};
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use servicehub_app::role_authorizer::RoleAuthorizer;
    use servicehub_app::services::link_cleanup::LinkCleanup;
    use servicehub_app::services::linked_device_service::LinkedDeviceService;
    use servicehub_app::services::service_manager::ServiceManager;
    use servicehub_domain::caller::Caller;
    use servicehub_domain::device::{Device, LinkStatus, LinkedService, PubSub};
    use servicehub_domain::error::ServiceHubError;
    use servicehub_domain::event::PublishAck;
    use servicehub_domain::id::{DeviceId, ServiceId, ThingId, UserId};
    use servicehub_domain::service::{Service, ServiceDetails};
    use servicehub_domain::time::now;
    use servicehub_domain::user::Owner;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    #[derive(Default)]
    struct StubServiceRepo {
        store: Mutex<HashMap<ServiceId, Service>>,
    }

    struct StubPublisher;
    struct StubTemplates;
    struct StubTokens;

    /// Every device is owned by `owner` and linked once to `service`.
    struct StubDevices {
        service: ServiceId,
        owner: Owner,
    }

    impl ServiceRepository for StubServiceRepo {
        async fn create(&self, service: Service) -> Result<Service, ServiceHubError> {
            self.store
                .lock()
                .unwrap()
                .insert(service.id, service.clone());
            Ok(service)
        }
        async fn get_details(
            &self,
            id: ServiceId,
        ) -> Result<Option<ServiceDetails>, ServiceHubError> {
            let service = self.store.lock().unwrap().get(&id).cloned();
            Ok(service.map(|s| ServiceDetails::new(s, None)))
        }
        async fn get_all_details(&self) -> Result<Vec<ServiceDetails>, ServiceHubError> {
            let all = self.store.lock().unwrap().values().cloned().collect::<Vec<_>>();
            Ok(all.into_iter().map(|s| ServiceDetails::new(s, None)).collect())
        }
        async fn find_by_owner(
            &self,
            owner: UserId,
            _text: Option<&str>,
        ) -> Result<Vec<Service>, ServiceHubError> {
            let store = self.store.lock().unwrap();
            Ok(store.values().filter(|s| s.owner == owner).cloned().collect())
        }
        async fn update(&self, service: Service) -> Result<Service, ServiceHubError> {
            self.store
                .lock()
                .unwrap()
                .insert(service.id, service.clone());
            Ok(service)
        }
        async fn set_status(
            &self,
            id: ServiceId,
            status: String,
        ) -> Result<Option<Service>, ServiceHubError> {
            let mut store = self.store.lock().unwrap();
            Ok(store.get_mut(&id).map(|s| {
                let previous = s.clone();
                s.status = status;
                previous
            }))
        }
        async fn delete(&self, id: ServiceId) -> Result<(), ServiceHubError> {
            self.store.lock().unwrap().remove(&id);
            Ok(())
        }
    }

    impl PropertyPublisher for StubPublisher {
        async fn publish_update_properties(
            &self,
            service: &Service,
            _properties: &[Value],
        ) -> Result<PublishAck, ServiceHubError> {
            Ok(PublishAck {
                service_id: service.id,
                topic: "stub".to_string(),
                receivers: 0,
                published_at: now(),
            })
        }
    }

    impl DeviceRepository for StubDevices {
        async fn find_linked_to_service(
            &self,
            service_id: ServiceId,
        ) -> Result<Vec<Device>, ServiceHubError> {
            if service_id != self.service {
                return Ok(vec![]);
            }
            Ok(vec![Device {
                id: DeviceId::new(),
                name: "meter".to_string(),
                owner: Some(self.owner.clone()),
                pubsub: PubSub::default(),
                location: None,
                linked_services: vec![LinkedService {
                    service_id,
                    config: vec![json!({"token": "abc"})],
                    status: LinkStatus::default(),
                }],
            }])
        }
        async fn unlink_service(&self, _service_id: ServiceId) -> Result<u64, ServiceHubError> {
            Ok(0)
        }
    }

    impl DeviceTemplateRepository for StubTemplates {
        async fn unlink_service(&self, _service_id: ServiceId) -> Result<u64, ServiceHubError> {
            Ok(0)
        }
    }

    impl TokenManager for StubTokens {
        async fn delete_token_by_thing_id(&self, _thing_id: ThingId) -> Result<(), ServiceHubError> {
            Ok(())
        }
    }

    type TestState = AppState<
        StubServiceRepo,
        StubPublisher,
        Arc<StubDevices>,
        StubTemplates,
        StubTokens,
        RoleAuthorizer,
    >;

    struct Fixture {
        state: TestState,
        linked_service: ServiceId,
        device_owner: UserId,
    }

    fn fixture() -> Fixture {
        let linked_service = ServiceId::new();
        let owner = Owner {
            id: UserId::new(),
            name: "Lin".to_string(),
            email: "lin@example.com".to_string(),
        };
        let device_owner = owner.id;
        let devices = Arc::new(StubDevices {
            service: linked_service,
            owner,
        });

        let repo = StubServiceRepo::default();
        let service = Service::builder()
            .id(linked_service)
            .name("meter readings")
            .owner(device_owner)
            .build()
            .unwrap();
        repo.store.lock().unwrap().insert(linked_service, service);

        let manager = ServiceManager::new(
            repo,
            StubPublisher,
            LinkCleanup::new(Arc::clone(&devices), StubTemplates, StubTokens),
        );
        let linked = LinkedDeviceService::new(devices, RoleAuthorizer::new(vec!["admin".into()]));

        Fixture {
            state: AppState::new(manager, linked),
            linked_service,
            device_owner,
        }
    }

    fn request(
        method: &str,
        uri: &str,
        caller: Option<&Caller>,
        body: Option<Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(caller) = caller {
            builder = builder.header(USER_ID_HEADER, caller.id.to_string());
            if let Some(role) = &caller.role {
                builder = builder.header(USER_ROLE_HEADER, role);
            }
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let app = build(fixture().state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_create_service_owned_by_caller() {
        let app = build(fixture().state);
        let caller = Caller::new(UserId::new());
        let someone_else = UserId::new();

        let response = app
            .oneshot(request(
                "POST",
                "/api/services",
                Some(&caller),
                Some(json!({"name": "svc1", "owner": someone_else})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["name"], "svc1");
    }

    #[tokio::test]
    async fn should_reject_create_without_caller() {
        let app = build(fixture().state);

        let response = app
            .oneshot(request(
                "POST",
                "/api/services",
                None,
                Some(json!({"name": "svc1"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_reject_create_with_empty_name() {
        let app = build(fixture().state);
        let caller = Caller::new(UserId::new());

        let response = app
            .oneshot(request(
                "POST",
                "/api/services",
                Some(&caller),
                Some(json!({"name": "  "})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_not_found_with_id_in_message() {
        let app = build(fixture().state);
        let id = ServiceId::new();

        let response = app
            .oneshot(request("GET", &format!("/api/services/{id}"), None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains(&id.to_string()));
    }

    #[tokio::test]
    async fn should_reject_malformed_service_id() {
        let app = build(fixture().state);

        let response = app
            .oneshot(request("GET", "/api/services/not-a-uuid", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_return_null_when_setting_status_of_missing_service() {
        let app = build(fixture().state);

        let response = app
            .oneshot(request(
                "PUT",
                &format!("/api/services/{}/status", ServiceId::new()),
                None,
                Some(json!({"status": "disabled"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, Value::Null);
    }

    #[tokio::test]
    async fn should_require_caller_for_owner_listing() {
        let app = build(fixture().state);

        let response = app
            .oneshot(request("GET", "/api/me/services", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_redact_things_config_for_stranger() {
        let fixture = fixture();
        let uri = format!("/api/services/{}/things", fixture.linked_service);
        let app = build(fixture.state);
        let stranger = Caller::new(UserId::new());

        let response = app
            .oneshot(request("GET", &uri, Some(&stranger), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body[0]["config"], json!([]));
        assert_eq!(body[0]["owner"]["email"], "lin@example.com");
    }

    #[tokio::test]
    async fn should_reveal_device_config_to_admin() {
        let fixture = fixture();
        let uri = format!("/api/services/{}/devices", fixture.linked_service);
        let app = build(fixture.state);
        let admin = Caller::new(UserId::new()).with_role("admin");

        let response = app
            .oneshot(request("GET", &uri, Some(&admin), None))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body[0]["config"], json!([{"token": "abc"}]));
        assert_eq!(body[0]["location"]["name"], "-");
    }

    #[tokio::test]
    async fn should_reveal_device_config_to_owner() {
        let fixture = fixture();
        let uri = format!("/api/services/{}/things", fixture.linked_service);
        let owner = Caller::new(fixture.device_owner);
        let app = build(fixture.state);

        let response = app
            .oneshot(request("GET", &uri, Some(&owner), None))
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body[0]["config"], json!([{"token": "abc"}]));
    }

    #[tokio::test]
    async fn should_return_not_found_for_devices_of_unknown_service() {
        let fixture = fixture();
        let app = build(fixture.state);
        let caller = Caller::new(UserId::new()).with_role("admin");
        let unknown = ServiceId::new();

        for route in ["things", "devices"] {
            let uri = format!("/api/services/{unknown}/{route}");
            let response = app
                .clone()
                .oneshot(request("GET", &uri, Some(&caller), None))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let body = json_body(response).await;
            assert_eq!(
                body["error"],
                format!("could not find a service with id: {unknown}")
            );
        }
    }
}
