//! 会话存储模块
//!
//! “谁已登录”的唯一数据源。持有身份与令牌，负责持久化、对外广播变化，
//! 并为需要认证的请求生成认证头。
//!
//! 每个登录/注册/登出操作在**调用时**领取一个递增的票号；
//! 完成时只有票号大于已提交票号才会生效，保证状态总是反映调用顺序中最后的操作。

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use emd_hunter_shared::protocol::{CurrentUserRequest, LoginRequest, RegisterRequest};
use emd_hunter_shared::{AuthResponse, HEADER_AUTHORIZATION, UserIdentity};
use serde::{Deserialize, Serialize};

use crate::api::EmdApi;
use crate::config::AppConfig;
use crate::error::{ApiError, ApiErrorKind, ApiResult};
use crate::storage::KeyValueStorage;

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

/// 认证头映射（无令牌时为空）
pub type AuthHeaders = HashMap<String, String>;

/// 已认证的会话
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserIdentity,
    pub token: String,
}

// 令牌不进入日志
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// 会话状态快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub session: Option<Session>,
    /// 是否仍在从持久化存储中恢复
    pub is_loading: bool,
}

/// 初始状态：尚未恢复，`is_loading = true`
impl Default for SessionState {
    fn default() -> Self {
        Self {
            session: None,
            is_loading: true,
        }
    }
}

impl SessionState {
    pub fn current_user(&self) -> Option<&UserIdentity> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

type Subscriber = Box<dyn Fn(&SessionState)>;

struct SessionInner {
    api: EmdApi,
    storage: Rc<dyn KeyValueStorage>,
    token_key: String,
    user_key: String,
    state: RefCell<SessionState>,
    /// 已发放的最大票号
    issued: Cell<u64>,
    /// 已提交的最大票号
    committed: Cell<u64>,
    subscribers: RefCell<Vec<Subscriber>>,
}

/// 会话存储
///
/// 克隆代价很低，所有克隆共享同一份状态。
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<SessionInner>,
}

impl SessionStore {
    /// 创建会话存储，初始处于 `is_loading` 状态，需调用 [`SessionStore::rehydrate`]
    pub fn new(config: &AppConfig, api: EmdApi, storage: Rc<dyn KeyValueStorage>) -> Self {
        Self {
            inner: Rc::new(SessionInner {
                api,
                storage,
                token_key: config.storage_key(TOKEN_KEY),
                user_key: config.storage_key(USER_KEY),
                state: RefCell::new(SessionState::default()),
                issued: Cell::new(0),
                committed: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    // --- Readers ---

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading
    }

    pub fn current_user(&self) -> Option<UserIdentity> {
        self.inner.state.borrow().current_user().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().token().map(str::to_string)
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// 生成认证头；没有令牌时返回空映射
    pub fn get_auth_headers(&self) -> AuthHeaders {
        let mut headers = AuthHeaders::new();
        if let Some(token) = self.inner.state.borrow().token() {
            headers.insert(HEADER_AUTHORIZATION.to_string(), format!("Bearer {}", token));
        }
        headers
    }

    /// 订阅状态变化。回调在每次变更后同步调用，不得在回调内再次订阅。
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&SessionState) + 'static,
    {
        self.inner.subscribers.borrow_mut().push(Box::new(callback));
    }

    // --- Lifecycle ---

    /// 从持久化存储恢复会话
    ///
    /// 无论成功与否，结束后 `is_loading` 都为 false。
    /// 损坏或不完整的记录视为“无会话”并被清除。返回是否恢复了会话。
    pub fn rehydrate(&self) -> bool {
        let token = self.inner.storage.get(&self.inner.token_key);
        let user = self.inner.storage.get(&self.inner.user_key);

        let restored = match (token, user) {
            (Some(token), Some(user_json)) if !token.is_empty() => {
                match serde_json::from_str::<UserIdentity>(&user_json) {
                    Ok(user) => Some(Session { user, token }),
                    Err(e) => {
                        log_warn!("[Session] Stored user is unreadable, dropping it: {}", e);
                        None
                    }
                }
            }
            (None, None) => None,
            _ => {
                log_warn!("[Session] Stored session is incomplete, dropping it.");
                None
            }
        };

        if restored.is_none() {
            self.persist(None);
        }

        {
            let mut state = self.inner.state.borrow_mut();
            // 恢复期间已有操作提交时，以该操作为准
            if self.inner.committed.get() == 0 {
                state.session = restored;
            }
            state.is_loading = false;
        }
        self.notify();

        self.is_authenticated()
    }

    /// 登录
    ///
    /// 票号在调用时领取。后端拒绝时返回 `InvalidCredentials`，会话保持不变；不重试。
    pub fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = ApiResult<UserIdentity>> + use<> {
        let ticket = self.issue_ticket();
        let store = self.clone();
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        async move {
            if request.email.is_empty() || request.password.is_empty() {
                return Err(ApiError::validation("Please fill in all fields"));
            }

            let auth = store
                .inner
                .api
                .call(&request, &AuthHeaders::new())
                .await
                .map_err(|e| match e.kind {
                    ApiErrorKind::Auth => e.with_kind(ApiErrorKind::InvalidCredentials),
                    _ => e,
                })
                .map_err(|e| e.in_op("session.login"))?;

            let session = store.establish(auth).await?;
            let user = session.user.clone();
            if !store.commit(ticket, Some(session)) {
                return Err(superseded().in_op("session.login"));
            }
            log_info!("[Session] Logged in as {}", user.id);
            Ok(user)
        }
    }

    /// 注册并登录
    ///
    /// 邮箱已存在返回 `DuplicateAccount`，其余 400/422 返回 `Validation`。
    pub fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> impl Future<Output = ApiResult<UserIdentity>> + use<> {
        let ticket = self.issue_ticket();
        let store = self.clone();
        let request = RegisterRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            name: name.trim().to_string(),
        };

        async move {
            if request.email.is_empty() || request.password.is_empty() || request.name.is_empty() {
                return Err(ApiError::validation("Please fill in all fields"));
            }

            let auth = store
                .inner
                .api
                .call(&request, &AuthHeaders::new())
                .await
                .map_err(classify_register_error)
                .map_err(|e| e.in_op("session.register"))?;

            let session = store.establish(auth).await?;
            let user = session.user.clone();
            if !store.commit(ticket, Some(session)) {
                return Err(superseded().in_op("session.register"));
            }
            log_info!("[Session] Registered {}", user.id);
            Ok(user)
        }
    }

    /// 登出：同步清除内存与持久化状态，可重复调用
    pub fn logout(&self) {
        let ticket = self.issue_ticket();
        self.commit(ticket, None);
    }

    /// 令牌失效：仅当 `token` 仍是当前令牌时清除会话
    ///
    /// 不领取票号，因此不会影响在此之前发起、尚未完成的新登录。
    pub fn expire(&self, token: &str) {
        if self.token().as_deref() != Some(token) {
            return;
        }
        log_warn!("[Session] Token rejected by backend, signing out.");
        self.persist(None);
        self.inner.state.borrow_mut().session = None;
        self.notify();
    }

    /// 通过 `/api/auth/me` 校验已恢复的令牌
    ///
    /// 成功时刷新身份；`Auth` 错误时清除会话；其他错误不影响会话。
    /// 没有会话时返回 `Ok(None)`。
    pub async fn revalidate(&self) -> ApiResult<Option<UserIdentity>> {
        let Some(token) = self.token() else {
            return Ok(None);
        };

        match self
            .inner
            .api
            .call(&CurrentUserRequest, &self.get_auth_headers())
            .await
        {
            Ok(user) => {
                let refreshed = {
                    let mut state = self.inner.state.borrow_mut();
                    match state.session.as_mut() {
                        Some(session) if session.token == token && session.user != user => {
                            session.user = user.clone();
                            Some(session.clone())
                        }
                        _ => None,
                    }
                };
                if let Some(session) = refreshed {
                    self.persist(Some(&session));
                    self.notify();
                }
                Ok(Some(user))
            }
            Err(e) => {
                if e.is_auth() {
                    self.expire(&token);
                }
                Err(e.in_op("session.revalidate"))
            }
        }
    }

    // --- Internals ---

    fn issue_ticket(&self) -> u64 {
        let ticket = self.inner.issued.get() + 1;
        self.inner.issued.set(ticket);
        ticket
    }

    /// 认证响应缺少身份时，用新令牌查询 `/api/auth/me`
    async fn establish(&self, auth: AuthResponse) -> ApiResult<Session> {
        if auth.token.is_empty() {
            return Err(ApiError::backend("Server returned no token"));
        }

        let user = match auth.user {
            Some(user) => user,
            None => {
                let mut headers = AuthHeaders::new();
                headers.insert(
                    HEADER_AUTHORIZATION.to_string(),
                    format!("Bearer {}", auth.token),
                );
                self.inner
                    .api
                    .call(&CurrentUserRequest, &headers)
                    .await
                    .map_err(|e| e.in_op("session.establish"))?
            }
        };

        Ok(Session {
            user,
            token: auth.token,
        })
    }

    /// 提交操作结果；已有更新的操作提交时丢弃
    fn commit(&self, ticket: u64, session: Option<Session>) -> bool {
        if ticket <= self.inner.committed.get() {
            log_warn!("[Session] Discarding superseded result (ticket {}).", ticket);
            return false;
        }
        self.inner.committed.set(ticket);
        self.persist(session.as_ref());

        {
            let mut state = self.inner.state.borrow_mut();
            state.session = session;
            state.is_loading = false;
        }
        self.notify();
        true
    }

    fn persist(&self, session: Option<&Session>) {
        let storage = &self.inner.storage;
        match session {
            Some(session) => match serde_json::to_string(&session.user) {
                Ok(user_json) => {
                    let saved = storage.set(&self.inner.token_key, &session.token)
                        && storage.set(&self.inner.user_key, &user_json);
                    if !saved {
                        log_warn!("[Session] Durable storage unavailable; session lasts until reload.");
                    }
                }
                Err(e) => log_error!("[Session] Failed to encode user: {}", e),
            },
            None => {
                storage.delete(&self.inner.token_key);
                storage.delete(&self.inner.user_key);
            }
        }
    }

    fn notify(&self) {
        let state = self.state();
        for subscriber in self.inner.subscribers.borrow().iter() {
            subscriber(&state);
        }
    }
}

/// 结果已被之后的登录、注册或登出覆盖，未写入会话
fn superseded() -> ApiError {
    ApiError::backend("Sign-in was cancelled by a newer session change")
}

fn classify_register_error(e: ApiError) -> ApiError {
    match e.status() {
        Some(409) => e.with_kind(ApiErrorKind::DuplicateAccount),
        Some(400) if e.message().to_ascii_lowercase().contains("already") => {
            e.with_kind(ApiErrorKind::DuplicateAccount)
        }
        Some(400) | Some(422) => e.with_kind(ApiErrorKind::Validation),
        _ => e,
    }
}
