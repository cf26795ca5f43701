use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use warden_application::{PermissionRepository, RoleRepository, SeedCatalog};
use warden_core::{PermissionId, RoleId, UserId};
use warden_domain::{PermissionKey, UserAccount};
use warden_infrastructure::InMemoryRbacStore;

use crate::api_services::{RbacStores, build_app_state, provision_dev_user};

use super::build_router;

const TOKEN: &str = "test-bootstrap-token";

struct TestApp {
    router: Router,
    store: Arc<InMemoryRbacStore>,
    admin: UserAccount,
}

impl TestApp {
    async fn new() -> Self {
        let store = Arc::new(InMemoryRbacStore::new());
        let (state, seeder) =
            build_app_state(RbacStores::in_memory(store.clone()), TOKEN.to_owned());
        assert!(seeder.seed(&SeedCatalog::default()).await.is_ok());

        let Ok(admin) = provision_dev_user(&store).await else {
            panic!("dev user should be provisioned");
        };
        let Ok(router) = build_router(
            state,
            "http://localhost:3000",
            SessionManagerLayer::new(MemoryStore::default()),
        ) else {
            panic!("router should build");
        };

        Self {
            router,
            store,
            admin,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        let Ok(response) = self.router.clone().oneshot(request).await else {
            panic!("router should respond");
        };
        response
    }

    async fn sign_in(&self, user_id: UserId) -> String {
        let body = json!({ "token": TOKEN, "user_id": user_id.to_string() });
        let response = self
            .send(request(Method::POST, "/auth/session", None, Some(body)))
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let Some(cookie) = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
        else {
            panic!("session cookie should be set");
        };
        cookie.to_owned()
    }

    async fn user_with_role(&self, role_name: Option<&str>) -> UserId {
        let role_id = match role_name {
            Some(name) => Some(self.predefined_role(name).await),
            None => None,
        };
        let user = UserAccount::new(UserId::new(), self.admin.tenant_id(), role_id, "Member");
        assert!(self.store.upsert_user(user.clone()).await.is_ok());
        user.id()
    }

    async fn predefined_role(&self, name: &str) -> RoleId {
        let Ok(Some(role)) = self.store.find_role_by_name(None, name, None).await else {
            panic!("predefined role '{name}' should be seeded");
        };
        role.id()
    }

    async fn permission_id(&self, key: &str) -> PermissionId {
        let Ok(Some(permission)) = self.store.find_permission_by_key(key).await else {
            panic!("permission '{key}' should be seeded");
        };
        permission.id()
    }
}

fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }

    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    };
    let Ok(request) = request else {
        panic!("request should build");
    };
    request
}

async fn json_body(response: Response) -> Value {
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body should be readable");
    };
    let Ok(value) = serde_json::from_slice(&bytes) else {
        panic!("body should be json");
    };
    value
}

fn names(roles: &Value) -> Vec<String> {
    roles
        .as_array()
        .map(|roles| {
            roles
                .iter()
                .filter_map(|role| role["name"].as_str().map(ToOwned::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new().await;

    let response = app.send(request(Method::GET, "/health", None, None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "in_memory");
}

#[tokio::test]
async fn admin_routes_require_a_session() {
    let app = TestApp::new().await;

    let response = app.send(request(Method::GET, "/api/roles", None, None)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn session_bootstrap_rejects_bad_token_and_unknown_user() {
    let app = TestApp::new().await;

    let wrong_token = json!({ "token": "nope", "user_id": app.admin.id().to_string() });
    let response = app
        .send(request(Method::POST, "/auth/session", None, Some(wrong_token)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let unknown_user = json!({ "token": TOKEN, "user_id": UserId::new().to_string() });
    let response = app
        .send(request(Method::POST, "/auth/session", None, Some(unknown_user)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_reports_freshly_resolved_keys() {
    let app = TestApp::new().await;
    let cookie = app.sign_in(app.admin.id()).await;

    let response = app
        .send(request(Method::GET, "/auth/me", Some(&cookie), None))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["tenant_id"], app.admin.tenant_id().to_string());
    let holds_super_admin = body["permissions"]
        .as_array()
        .is_some_and(|keys| keys.iter().any(|key| key == PermissionKey::SUPER_ADMIN));
    assert!(holds_super_admin);
}

#[tokio::test]
async fn super_admin_creates_and_lists_tenant_role() {
    let app = TestApp::new().await;
    let cookie = app.sign_in(app.admin.id()).await;
    let dashboard = app.permission_id("dashboard:view").await;

    let create = json!({
        "name": "  Editor ",
        "description": "Edits things",
        "permissions": [dashboard.to_string()],
    });
    let response = app
        .send(request(Method::POST, "/api/roles", Some(&cookie), Some(create)))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["name"], "Editor");
    assert_eq!(created["is_predefined"], false);
    assert_eq!(created["tenant_id"], app.admin.tenant_id().to_string());
    assert_eq!(created["created_by"], app.admin.id().to_string());
    assert_eq!(created["permissions"][0]["key"], "dashboard:view");

    let response = app
        .send(request(Method::GET, "/api/roles", Some(&cookie), None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = json_body(response).await;
    let listed_names = names(&listed);

    assert!(listed_names.contains(&"Editor".to_owned()));
    assert!(listed_names.contains(&"Admin".to_owned()));
    assert!(!listed_names.contains(&"Super Admin".to_owned()));

    let editor = listed
        .as_array()
        .and_then(|roles| roles.iter().find(|role| role["name"] == "Editor"))
        .cloned()
        .unwrap_or_default();
    assert_eq!(editor["can_edit"], true);
    assert_eq!(editor["can_delete"], true);
}

#[tokio::test]
async fn caller_without_the_key_is_forbidden_and_roleless_caller_unauthorized() {
    let app = TestApp::new().await;

    let guest = app.user_with_role(Some("Guest")).await;
    let cookie = app.sign_in(guest).await;
    let response = app
        .send(request(Method::GET, "/api/roles", Some(&cookie), None))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let roleless = app.user_with_role(None).await;
    let cookie = app.sign_in(roleless).await;
    let response = app
        .send(request(Method::GET, "/api/roles", Some(&cookie), None))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_change_applies_to_the_next_request() {
    let app = TestApp::new().await;
    let viewer = app.user_with_role(Some("Viewer")).await;
    let cookie = app.sign_in(viewer).await;

    let response = app
        .send(request(Method::GET, "/api/permissions", Some(&cookie), None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let guest_role = app.predefined_role("Guest").await;
    let demoted = UserAccount::new(viewer, app.admin.tenant_id(), Some(guest_role), "Member");
    assert!(app.store.upsert_user(demoted).await.is_ok());

    let response = app
        .send(request(Method::GET, "/api/permissions", Some(&cookie), None))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deactivated_role_is_forbidden_not_signed_out() {
    let app = TestApp::new().await;
    let admin_cookie = app.sign_in(app.admin.id()).await;
    let read = app.permission_id("administration:permission:read").await;

    let create = json!({ "name": "Reviewer", "permissions": [read.to_string()] });
    let response = app
        .send(request(Method::POST, "/api/roles", Some(&admin_cookie), Some(create)))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let role_id = json_body(response).await["role_id"]
        .as_str()
        .map(ToOwned::to_owned)
        .unwrap_or_default();
    let Ok(reviewer_role) = role_id.parse::<RoleId>() else {
        panic!("role id should parse");
    };

    let reviewer = UserAccount::new(
        UserId::new(),
        app.admin.tenant_id(),
        Some(reviewer_role),
        "Reviewer",
    );
    assert!(app.store.upsert_user(reviewer.clone()).await.is_ok());
    let cookie = app.sign_in(reviewer.id()).await;

    let response = app
        .send(request(Method::GET, "/api/permissions", Some(&cookie), None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(request(
            Method::PUT,
            format!("/api/roles/{role_id}").as_str(),
            Some(&admin_cookie),
            Some(json!({ "is_active": false })),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(request(Method::GET, "/api/permissions", Some(&cookie), None))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn super_admin_key_is_blocked_on_create_but_assignable() {
    let app = TestApp::new().await;
    let cookie = app.sign_in(app.admin.id()).await;
    let super_admin = app.permission_id(PermissionKey::SUPER_ADMIN).await;

    let create = json!({ "name": "Escalated", "permissions": [super_admin.to_string()] });
    let response = app
        .send(request(Method::POST, "/api/roles", Some(&cookie), Some(create)))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let create = json!({ "name": "Plain" });
    let response = app
        .send(request(Method::POST, "/api/roles", Some(&cookie), Some(create)))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let role_id = json_body(response).await["role_id"]
        .as_str()
        .map(ToOwned::to_owned)
        .unwrap_or_default();

    let assign = json!({ "permissions": [super_admin.to_string()] });
    let response = app
        .send(request(
            Method::PUT,
            format!("/api/roles/{role_id}/permissions").as_str(),
            Some(&cookie),
            Some(assign),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let assigned = json_body(response).await;
    assert_eq!(assigned["permission_ids"], json!([super_admin.to_string()]));
}

#[tokio::test]
async fn grouped_view_lists_every_group_unassigned_for_an_empty_role() {
    let app = TestApp::new().await;
    let cookie = app.sign_in(app.admin.id()).await;

    let response = app
        .send(request(
            Method::POST,
            "/api/roles",
            Some(&cookie),
            Some(json!({ "name": "Empty" })),
        ))
        .await;
    let role_id = json_body(response).await["role_id"]
        .as_str()
        .map(ToOwned::to_owned)
        .unwrap_or_default();

    let response = app
        .send(request(
            Method::GET,
            format!("/api/roles/{role_id}/permissions").as_str(),
            Some(&cookie),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let groups = json_body(response).await;
    let groups = groups.as_array().cloned().unwrap_or_default();
    let group_names = groups
        .iter()
        .filter_map(|group| group["group_name"].as_str())
        .collect::<Vec<_>>();
    assert_eq!(
        group_names,
        [
            "General",
            "User Management",
            "Project Management",
            "Administration",
            "Tenant"
        ]
    );
    assert!(groups.iter().all(|group| {
        group["permissions"]
            .as_array()
            .is_some_and(|permissions| permissions.iter().all(|p| p["assigned"] == false))
    }));
}

#[tokio::test]
async fn malformed_identifier_is_a_bad_request() {
    let app = TestApp::new().await;
    let cookie = app.sign_in(app.admin.id()).await;

    let response = app
        .send(request(Method::GET, "/api/roles/not-a-uuid", Some(&cookie), None))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn permission_group_lifecycle_over_http() {
    let app = TestApp::new().await;
    let cookie = app.sign_in(app.admin.id()).await;

    let create = json!({ "name": "Reports", "description": "Reporting" });
    let response = app
        .send(request(
            Method::POST,
            "/api/permission-groups",
            Some(&cookie),
            Some(create.clone()),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let group_id = json_body(response).await["group_id"]
        .as_str()
        .map(ToOwned::to_owned)
        .unwrap_or_default();

    let response = app
        .send(request(
            Method::POST,
            "/api/permission-groups",
            Some(&cookie),
            Some(create),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let uri = format!("/api/permission-groups/{group_id}");
    let response = app
        .send(request(Method::DELETE, uri.as_str(), Some(&cookie), None))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .send(request(Method::GET, uri.as_str(), Some(&cookie), None))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn role_deletion_respects_predefined_and_references() {
    let app = TestApp::new().await;
    let cookie = app.sign_in(app.admin.id()).await;

    let guest = app.predefined_role("Guest").await;
    let response = app
        .send(request(
            Method::DELETE,
            format!("/api/roles/{guest}").as_str(),
            Some(&cookie),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(request(
            Method::POST,
            "/api/roles",
            Some(&cookie),
            Some(json!({ "name": "Staffed" })),
        ))
        .await;
    let role_id = json_body(response).await["role_id"]
        .as_str()
        .and_then(|value| value.parse::<RoleId>().ok())
        .unwrap_or_default();
    let member = UserAccount::new(UserId::new(), app.admin.tenant_id(), Some(role_id), "Member");
    assert!(app.store.upsert_user(member).await.is_ok());

    let response = app
        .send(request(
            Method::DELETE,
            format!("/api/roles/{role_id}").as_str(),
            Some(&cookie),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
