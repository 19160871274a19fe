//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程。

use emd_hunter::guard::redirect_for;
use emd_hunter::{AppRoute, GuardState, Navigation, RouteGuard, SessionState};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话状态信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话状态（注入的信号，实现解耦）
    session: Signal<SessionState>,
}

impl RouterService {
    /// 创建新的路由服务
    fn new(session: Signal<SessionState>) -> Self {
        // 1. 初始化当前路由（从 URL 解析）
        let path = current_path();
        let initial_route = AppRoute::from_path(&path);
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            session,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 导航到路由（新增历史记录）
    pub fn navigate_to(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    /// 执行守卫产生的导航指令
    pub fn apply(&self, navigation: Navigation) {
        match navigation {
            Navigation::Push(route) => self.navigate_to_route(route, true),
            Navigation::Replace(route) => self.navigate_to_route(route, false),
        }
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    ///
    /// 会话恢复期间不做认证判断，受保护页面由 [`RequireAuth`] 负责等待与重定向。
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let session = self.session.get_untracked();

        // --- Step 1: 验证目标路由 ---
        let (route, use_push) = match redirect_for(&target_route, session.is_authenticated()) {
            Some(redirect) if !session.is_loading => {
                web_sys::console::log_1(
                    &format!("[Router] {} is not available, redirecting to {}.", target_route, redirect)
                        .into(),
                );
                // 重定向不新增历史记录，避免后退循环
                (redirect, false)
            }
            _ => (target_route, use_push),
        };

        // --- Step 2: 加载页面 (更新状态) ---
        let path = route.to_path();
        if use_push {
            push_history_state(&path);
        } else {
            replace_history_state(&path);
        }
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let session = self.session;

        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path();
            let target_route = AppRoute::from_path(&path);
            let state = session.get_untracked();

            // popstate 时也执行守卫逻辑
            match redirect_for(&target_route, state.is_authenticated()) {
                Some(redirect) if !state.is_loading => {
                    web_sys::console::log_1(&"[Router] History navigation blocked.".into());
                    replace_history_state(&redirect.to_path());
                    set_route.set(redirect);
                }
                _ => set_route.set(target_route),
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 已登录用户停留在登录/注册页时自动进入控制面板
    ///
    /// 登出后的跳转由受保护页面外层的 [`RequireAuth`] 处理。
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let session = self.session;

        Effect::new(move |_| {
            let state = session.get();
            let route = current_route.get_untracked();

            if state.is_authenticated() && route.should_redirect_when_authenticated() {
                let redirect = AppRoute::auth_success_redirect();
                replace_history_state(&redirect.to_path());
                set_route.set(redirect);
                web_sys::console::log_1(
                    &"[Router] Auth state changed: logged in, redirecting to dashboard.".into(),
                );
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<SessionState>) -> RouterService {
    let router = RouterService::new(session);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话状态信号
    session: Signal<SessionState>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    // 提供路由服务到 Context
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 受保护视图的守卫组件
///
/// 会话恢复期间显示占位内容；确认未登录时只发出一次替换式跳转到登录页。
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let router = use_router();
    let session = router.session;
    let (guard_state, set_guard_state) = signal(GuardState::Resolving);

    // Effect 的上一次返回值保存守卫状态机
    Effect::new(move |previous: Option<RouteGuard>| {
        let mut guard = previous.unwrap_or_default();
        let navigation = session.with(|state| guard.observe(state));

        if guard_state.get_untracked() != guard.state() {
            set_guard_state.set(guard.state());
        }

        if let Some(navigation) = navigation {
            if router.current_route().get_untracked().requires_auth() {
                web_sys::console::log_1(&"[Router] Access Denied. Redirecting to Login.".into());
                router.apply(navigation);
            }
        }
        guard
    });

    move || match guard_state.get() {
        GuardState::Resolving => view! {
            <div class="flex items-center justify-center min-h-screen">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        }
        .into_any(),
        GuardState::Authorized => children().into_any(),
        GuardState::Unauthorized => ().into_any(),
    }
}

/// 应用内链接
///
/// 拦截点击，交给路由服务处理，不刷新页面。
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(optional, into)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let href = to.to_path();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to.clone());
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}
