//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, PaginatedResponse, PaginationParams, PagingConfig};
use super::middleware::{optional_session_middleware, session_middleware, AuthState};
use super::modules::{admin, auth, health, metrics, profile, request_id, requests};
use crate::application::{AdminWorkflow, SharedSessionRegistry, SubmissionService, UserService};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::{JwtConfig, PasswordHasher};

/// Everything the HTTP layer needs. Each handler module pulls its own state
/// out of this via `FromRef`.
#[derive(Clone)]
pub struct ApiServices {
    pub repos: Arc<dyn RepositoryProvider>,
    pub sessions: SharedSessionRegistry,
    pub users: Arc<UserService>,
    pub submissions: Arc<SubmissionService>,
    pub workflow: Arc<AdminWorkflow>,
    pub paging: PagingConfig,
    pub started_at: Arc<Instant>,
}

impl ApiServices {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        sessions: SharedSessionRegistry,
        jwt_config: JwtConfig,
        hasher: PasswordHasher,
        paging: PagingConfig,
    ) -> Self {
        let users = Arc::new(UserService::new(
            Arc::clone(&repos),
            sessions.clone(),
            jwt_config,
            hasher,
        ));
        Self {
            submissions: Arc::new(SubmissionService::new(Arc::clone(&repos))),
            workflow: Arc::new(AdminWorkflow::new(Arc::clone(&repos))),
            users,
            repos,
            sessions,
            paging,
            started_at: Arc::new(Instant::now()),
        }
    }
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<ApiServices> for AuthState {
    fn from_ref(s: &ApiServices) -> Self {
        AuthState {
            users: Arc::clone(&s.users),
        }
    }
}

impl FromRef<ApiServices> for auth::AuthHandlerState {
    fn from_ref(s: &ApiServices) -> Self {
        auth::AuthHandlerState {
            users: Arc::clone(&s.users),
        }
    }
}

impl FromRef<ApiServices> for profile::ProfileHandlerState {
    fn from_ref(s: &ApiServices) -> Self {
        profile::ProfileHandlerState {
            users: Arc::clone(&s.users),
        }
    }
}

impl FromRef<ApiServices> for requests::RequestsHandlerState {
    fn from_ref(s: &ApiServices) -> Self {
        requests::RequestsHandlerState {
            submissions: Arc::clone(&s.submissions),
            paging: s.paging,
        }
    }
}

impl FromRef<ApiServices> for admin::AdminHandlerState {
    fn from_ref(s: &ApiServices) -> Self {
        admin::AdminHandlerState {
            workflow: Arc::clone(&s.workflow),
            users: Arc::clone(&s.users),
            paging: s.paging,
        }
    }
}

impl FromRef<ApiServices> for health::HealthState {
    fn from_ref(s: &ApiServices) -> Self {
        health::HealthState {
            repos: Arc::clone(&s.repos),
            sessions: s.sessions.clone(),
            started_at: Arc::clone(&s.started_at),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        auth::get_current_user,
        auth::get_menu,
        // Profile
        profile::get_profile,
        profile::update_profile,
        // Requests
        requests::submit_concrete,
        requests::submit_steel,
        requests::list_own_requests,
        requests::own_stats,
        // Admin
        admin::get_stats,
        admin::get_dashboard,
        admin::list_concrete_requests,
        admin::list_steel_requests,
        admin::update_request_status,
        admin::list_users,
        admin::change_user_role,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginationParams,
            PaginatedResponse<requests::OwnRequestDto>,
            PaginatedResponse<requests::ConcreteRequestDto>,
            PaginatedResponse<requests::SteelRequestDto>,
            PaginatedResponse<auth::UserInfo>,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
            // Auth
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            auth::MenuResponse,
            auth::MenuSectionDto,
            // Profile
            profile::UpdateProfileRequest,
            // Requests
            requests::CreateConcreteRequestBody,
            requests::CreateSteelRequestBody,
            requests::ConcreteRequestDto,
            requests::SteelRequestDto,
            requests::ContactDto,
            requests::OwnRequestDto,
            requests::OwnStatsDto,
            // Admin
            admin::StatusCountsDto,
            admin::StatsDto,
            admin::AdminSnapshotDto,
            admin::UpdateStatusRequest,
            admin::TransitionResponse,
            admin::ChangeRoleRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "Registration, login (JWT session), logout, current user and menu"),
        (name = "Profile", description = "Own company profile"),
        (name = "Requests", description = "Concrete formwork and steel structure request submission"),
        (name = "Admin", description = "Dashboard counters, request status triage and user roles (admin only)"),
    ),
    info(
        title = "B2BSteel Marketplace API",
        version = "1.0.0",
        description = "REST API for submitting and triaging construction material requests",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `/metrics` is only mounted when a Prometheus recorder handle is given.
pub fn create_api_router(services: ApiServices, metrics_handle: Option<PrometheusHandle>) -> Router {
    let auth_state = AuthState::from_ref(&services);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Menu works for guests too
    let menu_routes = Router::new()
        .route("/me/menu", get(auth::get_menu))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            optional_session_middleware,
        ));

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::get_current_user))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            session_middleware,
        ));

    let profile_routes = Router::new()
        .route("/", get(profile::get_profile).put(profile::update_profile))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            session_middleware,
        ));

    let request_routes = Router::new()
        .route("/concrete", post(requests::submit_concrete))
        .route("/steel", post(requests::submit_steel))
        .route("/mine", get(requests::list_own_requests))
        .route("/mine/stats", get(requests::own_stats))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            session_middleware,
        ));

    // The admin gate itself lives in the services; the middleware only
    // establishes who is asking.
    let admin_routes = Router::new()
        .route("/stats", get(admin::get_stats))
        .route("/dashboard", get(admin::get_dashboard))
        .route("/requests/concrete", get(admin::list_concrete_requests))
        .route("/requests/steel", get(admin::list_steel_requests))
        .route("/requests/{kind}/{id}/status", put(admin::update_request_status))
        .route("/users", get(admin::list_users))
        .route("/users/{id}/role", put(admin::change_user_role))
        .layer(middleware::from_fn_with_state(auth_state, session_middleware));

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check))
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", menu_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Profile
        .nest("/api/v1/profile", profile_routes)
        // Requests
        .nest("/api/v1/requests", request_routes)
        // Admin
        .nest("/api/v1/admin", admin_routes)
        .with_state(services);

    if let Some(handle) = metrics_handle {
        let metrics_routes = Router::new()
            .route("/metrics", get(metrics::prometheus_metrics))
            .with_state(metrics::MetricsState { handle });
        router = router.merge(metrics_routes);
    }

    router
        // Middleware
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::Service;

    use super::*;
    use crate::application::SessionRegistry;
    use crate::domain::user::CreateUserDto;
    use crate::domain::{Profile, UserRole};
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    struct TestApp {
        router: Router,
        repos: Arc<dyn RepositoryProvider>,
    }

    impl TestApp {
        fn new() -> Self {
            let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
            let services = ApiServices::new(
                Arc::clone(&repos),
                Arc::new(SessionRegistry::new()),
                JwtConfig {
                    secret: "router-test-secret".into(),
                    ..JwtConfig::default()
                },
                PasswordHasher::new(4),
                PagingConfig::default(),
            );
            Self {
                router: create_api_router(services, None),
                repos,
            }
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let mut service = self.router.clone().into_service();
            let response = service.call(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, json)
        }

        async fn register_buyer(&self, email: &str) {
            let (status, _) = self
                .send(
                    Method::POST,
                    "/api/v1/auth/register",
                    None,
                    Some(json!({
                        "email": email,
                        "password": "secret1",
                        "password_confirmation": "secret1",
                        "role": "buyer",
                        "company_name": "Arya Build",
                        "contact_person": "Sara",
                        "phone": "021-555-0199"
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        async fn login(&self, email: &str, password: &str) -> String {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/api/v1/auth/login",
                    None,
                    Some(json!({ "email": email, "password": password })),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "{}", body);
            body["data"]["token"].as_str().unwrap().to_string()
        }

        async fn seed_admin(&self) -> String {
            let hash = PasswordHasher::new(4).hash("admin-pass").unwrap();
            self.repos
                .users()
                .create_user(CreateUserDto {
                    email: "admin@b2bsteel.test".into(),
                    password_hash: hash,
                    role: UserRole::Admin,
                    profile: Profile::default(),
                })
                .await
                .unwrap();
            self.login("admin@b2bsteel.test", "admin-pass").await
        }
    }

    fn concrete_body() -> Value {
        json!({
            "title": "Tower B slabs",
            "description": "Formwork for 12 floors",
            "items": ["modular", "tunnelform"],
            "material": "steel",
            "project_location": "Tehran",
            "deadline": "2026-03-01"
        })
    }

    #[tokio::test]
    async fn submission_is_owned_by_the_session_user() {
        let app = TestApp::new();
        app.register_buyer("buyer@b2bsteel.test").await;
        let token = app.login("buyer@b2bsteel.test", "secret1").await;

        let mut body = concrete_body();
        body["owner_id"] = json!("someone-else");
        let (status, created) = app
            .send(Method::POST, "/api/v1/requests/concrete", Some(&token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["status"], "pending");
        assert_eq!(created["data"]["contact"]["contact_person"], "Sara");

        let (_, me) = app.send(Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(created["data"]["owner_id"], me["data"]["id"]);

        let (status, mine) = app
            .send(Method::GET, "/api/v1/requests/mine", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mine["data"]["total"], 1);
        assert_eq!(mine["data"]["items"][0]["kind"], "concrete");
    }

    #[tokio::test]
    async fn steel_without_crane_drops_tonnage() {
        let app = TestApp::new();
        app.register_buyer("steel@b2bsteel.test").await;
        let token = app.login("steel@b2bsteel.test", "secret1").await;

        let (status, created) = app
            .send(
                Method::POST,
                "/api/v1/requests/steel",
                Some(&token),
                Some(json!({
                    "length": 40, "width": 20, "height": 7,
                    "usage": "warehouse", "project_location": "Isfahan",
                    "needs_crane": "no", "crane_tonnage": 10
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["crane_tonnage"], Value::Null);
        assert_eq!(created["data"]["paint_thickness"], 50);
        assert_eq!(created["data"]["project_name"], "Shed 40x20");
    }

    #[tokio::test]
    async fn stray_tonnage_text_is_accepted_without_crane() {
        let app = TestApp::new();
        app.register_buyer("form@b2bsteel.test").await;
        let token = app.login("form@b2bsteel.test", "secret1").await;

        let (status, created) = app
            .send(
                Method::POST,
                "/api/v1/requests/steel",
                Some(&token),
                Some(json!({
                    "length": 100, "width": 30, "height": 6,
                    "usage": "hangar", "project_location": "Bandar Abbas",
                    "needs_crane": "no", "crane_tonnage": ""
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", created);
        assert_eq!(created["data"]["needs_crane"], false);
        assert_eq!(created["data"]["crane_tonnage"], Value::Null);
    }

    #[tokio::test]
    async fn own_stats_cover_only_the_callers_requests() {
        let app = TestApp::new();
        app.register_buyer("mine@b2bsteel.test").await;
        app.register_buyer("theirs@b2bsteel.test").await;
        let mine = app.login("mine@b2bsteel.test", "secret1").await;
        let theirs = app.login("theirs@b2bsteel.test", "secret1").await;

        app.send(Method::POST, "/api/v1/requests/concrete", Some(&mine), Some(concrete_body()))
            .await;
        let (_, steel) = app
            .send(
                Method::POST,
                "/api/v1/requests/steel",
                Some(&mine),
                Some(json!({
                    "length": 40, "width": 20, "height": 7,
                    "usage": "warehouse", "project_location": "Isfahan"
                })),
            )
            .await;
        app.send(Method::POST, "/api/v1/requests/concrete", Some(&theirs), Some(concrete_body()))
            .await;

        let admin = app.seed_admin().await;
        let uri = format!("/api/v1/admin/requests/steel/{}/status", steel["data"]["id"].as_str().unwrap());
        let (status, _) = app
            .send(Method::PUT, &uri, Some(&admin), Some(json!({ "status": "completed" })))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, stats) = app
            .send(Method::GET, "/api/v1/requests/mine/stats", Some(&mine), None)
            .await;
        assert_eq!(status, StatusCode::OK, "{}", stats);
        assert_eq!(stats["data"]["total"], 2);
        assert_eq!(stats["data"]["pending"], 1);
        assert_eq!(stats["data"]["completed"], 1);
        assert_eq!(stats["data"]["steel"]["completed"], 1);

        let (status, _) = app.send(Method::GET, "/api/v1/requests/mine/stats", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let app = TestApp::new();
        let (status, body) = app.send(Method::GET, "/api/v1/admin/stats", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn buyer_is_forbidden_from_admin_routes() {
        let app = TestApp::new();
        app.register_buyer("nosy@b2bsteel.test").await;
        let token = app.login("nosy@b2bsteel.test", "secret1").await;

        let (status, _) = app
            .send(Method::GET, "/api/v1/admin/dashboard", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_transition_returns_refreshed_dashboard() {
        let app = TestApp::new();
        app.register_buyer("buyer2@b2bsteel.test").await;
        let buyer = app.login("buyer2@b2bsteel.test", "secret1").await;
        let (_, created) = app
            .send(Method::POST, "/api/v1/requests/concrete", Some(&buyer), Some(concrete_body()))
            .await;
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let admin = app.seed_admin().await;
        let (_, stats) = app.send(Method::GET, "/api/v1/admin/stats", Some(&admin), None).await;
        assert_eq!(stats["data"]["pending"], 1);

        let uri = format!("/api/v1/admin/requests/concrete/{}/status", id);
        let (status, outcome) = app
            .send(Method::PUT, &uri, Some(&admin), Some(json!({ "status": "rejected" })))
            .await;
        assert_eq!(status, StatusCode::OK, "{}", outcome);
        assert_eq!(outcome["data"]["status"], "rejected");
        assert_eq!(outcome["data"]["snapshot"]["stats"]["pending"], 0);
        assert_eq!(outcome["data"]["snapshot"]["stats"]["concrete"]["rejected"], 1);

        let (status, _) = app
            .send(Method::PUT, &uri, Some(&admin), Some(json!({ "status": "archived" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn logout_revokes_the_token() {
        let app = TestApp::new();
        app.register_buyer("leaver@b2bsteel.test").await;
        let token = app.login("leaver@b2bsteel.test", "secret1").await;

        let (status, _) = app.send(Method::POST, "/api/v1/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app.send(Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn menu_follows_the_stored_role() {
        let app = TestApp::new();
        let (status, guest) = app.send(Method::GET, "/api/v1/auth/me/menu", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(guest["data"]["role"], "guest");

        let admin = app.seed_admin().await;
        let (_, menu) = app
            .send(Method::GET, "/api/v1/auth/me/menu", Some(&admin), None)
            .await;
        let keys: Vec<&str> = menu["data"]["sections"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|s| s["key"].as_str())
            .collect();
        assert!(keys.contains(&"admin"));
    }
}
