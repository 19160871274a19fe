//! 认证模块
//!
//! 把核心库的 [`SessionStore`] 桥接到响应式信号上，与路由系统解耦。
//! 路由服务通过注入的会话状态信号来检查认证状态。

use std::rc::Rc;

use emd_hunter::{ApiClient, AppConfig, EmdApi, SessionState, SessionStore};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::web::{BrowserStorage, FetchHttpClient};

/// 认证上下文
///
/// 会话存储和接口门面不是 `Send`，因此以本地存储的 `StoredValue` 保存；
/// 会话状态的快照放在信号里供视图订阅。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 会话状态（只读）
    pub state: ReadSignal<SessionState>,
    store: StoredValue<SessionStore, LocalStorage>,
    client: StoredValue<ApiClient, LocalStorage>,
}

impl AuthContext {
    /// 创建新的认证上下文，并把会话变化同步到信号
    pub fn new(config: &AppConfig) -> Self {
        let api = EmdApi::from_config(config, Rc::new(FetchHttpClient));
        let store = SessionStore::new(config, api.clone(), Rc::new(BrowserStorage));
        let client = ApiClient::new(api, store.clone());

        let (state, set_state) = signal(store.state());
        store.subscribe(move |next| set_state.set(next.clone()));

        Self {
            state,
            store: StoredValue::new_local(store),
            client: StoredValue::new_local(client),
        }
    }

    pub fn store(&self) -> SessionStore {
        self.store.get_value()
    }

    pub fn client(&self) -> ApiClient {
        self.client.get_value()
    }

    /// 获取会话状态信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<SessionState> {
        let state = self.state;
        Signal::derive(move || state.get())
    }

    /// 当前用户的名字（问候语用）
    pub fn first_name(&self) -> Option<String> {
        self.state
            .with(|s| s.current_user().map(|u| u.first_name().to_string()))
    }

    pub fn user_name(&self) -> Option<String> {
        self.state.with(|s| s.current_user().map(|u| u.name.clone()))
    }

    /// 注销并清除状态
    ///
    /// 受保护页面的守卫会监听会话变化并自动重定向。
    pub fn logout(&self) {
        self.store().logout();
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 从 LocalStorage 恢复会话，然后在后台校验令牌是否仍然有效。
pub fn init_auth(ctx: &AuthContext) {
    let store = ctx.store();
    if store.rehydrate() {
        spawn_local(async move {
            if let Err(e) = store.revalidate().await {
                web_sys::console::warn_1(&format!("[Auth] Session check failed: {}", e).into());
            }
        });
    }
}
