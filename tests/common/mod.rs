//! Test helpers: in-memory services and a router driver.

#![allow(dead_code)]

use admin_backend::{
    api_routes, common_routes,
    config::JwtSettings,
    model::{Role, RoleDto, RoleRequest, User, UserDto, UserRequest},
    AppError, AppState, CrudService, Identity, JwtService, Roles, Users,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const OUTAGE_MESSAGE: &str = "store unavailable";

/// Counts service calls and can simulate the store being down.
#[derive(Default)]
pub struct CallLog {
    calls: AtomicUsize,
    outage: AtomicBool,
}

impl CallLog {
    fn enter(&self) -> Result<(), AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.outage.load(Ordering::SeqCst) {
            return Err(AppError::ExternalService(OUTAGE_MESSAGE.into()));
        }
        Ok(())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_outage(&self, down: bool) {
        self.outage.store(down, Ordering::SeqCst);
    }
}

fn not_found(label: &str, id: i32) -> AppError {
    AppError::NotFound(format!("{} with id {} not found", label, id))
}

fn check_id(label: &str, id: i32) -> Result<(), AppError> {
    if id <= 0 {
        return Err(AppError::Validation(format!("{} id must be greater than zero", label)));
    }
    Ok(())
}

#[derive(Default)]
pub struct MemoryRoles {
    pub log: CallLog,
    rows: Mutex<Vec<Role>>,
}

impl MemoryRoles {
    pub fn records(&self) -> Vec<Role> {
        self.rows.lock().unwrap().clone()
    }

    pub fn seed(&self, name: &str, active: bool) -> i32 {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        rows.push(Role {
            id,
            name: name.into(),
            description: None,
            active,
            created_at: Utc::now(),
            deleted_at: None,
        });
        id
    }
}

#[async_trait]
impl CrudService<Roles> for MemoryRoles {
    async fn get_all(&self) -> Result<Vec<RoleDto>, AppError> {
        self.log.enter()?;
        Ok(self.records().into_iter().filter(|r| r.active).map(RoleDto::from).collect())
    }

    async fn list_records(&self) -> Result<Vec<Role>, AppError> {
        self.log.enter()?;
        Ok(self.records())
    }

    async fn get_by_id(&self, id: i32) -> Result<RoleDto, AppError> {
        self.log.enter()?;
        check_id("Rol", id)?;
        self.records()
            .into_iter()
            .find(|r| r.id == id && r.active)
            .map(RoleDto::from)
            .ok_or_else(|| not_found("Rol", id))
    }

    async fn create(&self, request: RoleRequest) -> Result<RoleDto, AppError> {
        self.log.enter()?;
        if request.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }
        let id = self.seed(&request.name, true);
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|r| r.id == id).unwrap();
        row.description = request.description;
        Ok(RoleDto::from(row.clone()))
    }

    async fn update(&self, request: RoleRequest) -> Result<RoleDto, AppError> {
        self.log.enter()?;
        if request.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == request.id && r.active)
            .ok_or_else(|| not_found("Rol", request.id))?;
        row.name = request.name;
        row.description = request.description;
        Ok(RoleDto::from(row.clone()))
    }

    async fn delete_logical(&self, id: i32) -> Result<(), AppError> {
        self.log.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id && r.active)
            .ok_or_else(|| not_found("Rol", id))?;
        row.active = false;
        row.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn delete_permanent(&self, id: i32) -> Result<(), AppError> {
        self.log.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        if rows.len() == before {
            return Err(not_found("Rol", id));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    pub log: CallLog,
    rows: Mutex<Vec<User>>,
}

impl MemoryUsers {
    pub fn records(&self) -> Vec<User> {
        self.rows.lock().unwrap().clone()
    }

    pub fn seed(&self, username: &str, active: bool) -> i32 {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        rows.push(User {
            id,
            username: username.into(),
            email: format!("{}@example.com", username),
            role_id: None,
            active,
            created_at: Utc::now(),
            deleted_at: None,
        });
        id
    }
}

#[async_trait]
impl CrudService<Users> for MemoryUsers {
    async fn get_all(&self) -> Result<Vec<UserDto>, AppError> {
        self.log.enter()?;
        Ok(self.records().into_iter().filter(|u| u.active).map(UserDto::from).collect())
    }

    async fn list_records(&self) -> Result<Vec<User>, AppError> {
        self.log.enter()?;
        Ok(self.records().into_iter().filter(|u| u.active).collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<UserDto, AppError> {
        self.log.enter()?;
        check_id("User", id)?;
        self.records()
            .into_iter()
            .find(|u| u.id == id && u.active)
            .map(UserDto::from)
            .ok_or_else(|| not_found("User", id))
    }

    async fn create(&self, request: UserRequest) -> Result<UserDto, AppError> {
        self.log.enter()?;
        if !request.email.contains('@') {
            return Err(AppError::Validation("email must be a valid email".into()));
        }
        let id = self.seed(&request.username, true);
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|u| u.id == id).unwrap();
        row.email = request.email;
        row.role_id = request.role_id;
        Ok(UserDto::from(row.clone()))
    }

    async fn update(&self, request: UserRequest) -> Result<UserDto, AppError> {
        self.log.enter()?;
        if !request.email.contains('@') {
            return Err(AppError::Validation("email must be a valid email".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|u| u.id == request.id && u.active)
            .ok_or_else(|| not_found("User", request.id))?;
        row.username = request.username;
        row.email = request.email;
        row.role_id = request.role_id;
        Ok(UserDto::from(row.clone()))
    }

    async fn delete_logical(&self, id: i32) -> Result<(), AppError> {
        self.log.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|u| u.id == id && u.active)
            .ok_or_else(|| not_found("User", id))?;
        row.active = false;
        row.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn delete_permanent(&self, id: i32) -> Result<(), AppError> {
        self.log.enter()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|u| u.id != id);
        if rows.len() == before {
            return Err(not_found("User", id));
        }
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub jwt: JwtService,
    pub roles: Arc<MemoryRoles>,
    pub users: Arc<MemoryUsers>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn test_jwt() -> JwtService {
    JwtService::new(&JwtSettings {
        secret: TEST_SECRET.into(),
        issuer: None,
        audience: None,
    })
}

pub fn token_for(jwt: &JwtService, roles: &[&str]) -> String {
    jwt.issue(&Identity::new("tester", roles.iter().copied()), chrono::Duration::minutes(5))
        .expect("issue token")
}

/// Drive one request through `router` and decode the JSON body.
pub async fn send(router: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    TestResponse { status, headers, body }
}

impl TestApp {
    pub fn new() -> Self {
        let jwt = test_jwt();
        let roles = Arc::new(MemoryRoles::default());
        let users = Arc::new(MemoryUsers::default());
        let state = AppState {
            jwt: jwt.clone(),
            roles: roles.clone(),
            users: users.clone(),
        };
        let router = Router::new().merge(common_routes()).merge(api_routes(state));
        TestApp {
            router,
            jwt,
            roles,
            users,
        }
    }

    pub fn token(&self, roles: &[&str]) -> String {
        token_for(&self.jwt, roles)
    }

    pub fn admin_token(&self) -> String {
        self.token(&[admin_backend::ADMIN_ROLE])
    }

    pub fn user_token(&self) -> String {
        self.token(&["Usuario"])
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        send(&self.router, method, uri, token, body).await
    }

    /// Authenticated request as a non-administrator.
    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let token = self.user_token();
        self.send(method, uri, Some(&token), body).await
    }
}
