//! EMD Hunter 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `emd_hunter::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话状态到信号的桥接
//! - `components`: UI 组件层，页面状态由 `emd_hunter::views` 中的视图模型驱动

mod auth;
mod components {
    pub mod dashboard;
    pub mod header;
    pub mod icons;
    pub mod kill_score_gauge;
    pub mod landing;
    pub mod login;
    pub mod opportunities;
    pub mod register;
    pub mod research;
    pub mod serp_analysis;
    pub mod toast;
}

use crate::auth::{AuthContext, init_auth};
use crate::components::dashboard::DashboardPage;
use crate::components::landing::LandingPage;
use crate::components::login::LoginPage;
use crate::components::opportunities::OpportunitiesPage;
use crate::components::register::RegisterPage;
use crate::components::research::ResearchPage;
use crate::components::serp_analysis::SerpAnalysisPage;
use crate::components::toast::{ToastHost, provide_toasts};

use emd_hunter::config::{BACKEND_URL_VAR, STORAGE_NAMESPACE_VAR};
use emd_hunter::{AppConfig, AppRoute, ConfigError, ViewScope};
use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod http;
    pub mod router;
    mod storage;

    pub use http::FetchHttpClient;
    pub use storage::BrowserStorage;
}

use web::router::{RequireAuth, Router, RouterOutlet};

/// 页面根元素上的后端地址属性（部署时注入，优先级低于构建期变量）
const BACKEND_URL_ATTR: &str = "data-api-url";

/// 读取运行时配置
///
/// 构建期环境变量优先，其次是 `<html data-api-url="...">`。
fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| match key {
        BACKEND_URL_VAR => option_env!("EMD_HUNTER_BACKEND_URL")
            .map(str::to_string)
            .or_else(|| {
                web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.document_element())
                    .and_then(|root| root.get_attribute(BACKEND_URL_ATTR))
            }),
        STORAGE_NAMESPACE_VAR => option_env!("EMD_HUNTER_STORAGE_NAMESPACE").map(str::to_string),
        _ => None,
    })
}

/// 组件级的挂载标记，卸载时自动失效
pub(crate) fn use_view_scope() -> ViewScope {
    let scope = ViewScope::new();
    on_cleanup({
        let scope = scope.clone();
        move || scope.unmount()
    });
    scope
}

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件，受保护页面包裹在 [`RequireAuth`] 中。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Landing => view! { <LandingPage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => view! {
            <RequireAuth>
                <DashboardPage />
            </RequireAuth>
        }
        .into_any(),
        AppRoute::Research => view! {
            <RequireAuth>
                <ResearchPage />
            </RequireAuth>
        }
        .into_any(),
        AppRoute::Serp(keyword) => view! {
            <RequireAuth>
                <SerpAnalysisPage keyword=keyword.clone() />
            </RequireAuth>
        }
        .into_any(),
        AppRoute::Opportunities => view! {
            <RequireAuth>
                <OpportunitiesPage />
            </RequireAuth>
        }
        .into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <a href="/" class="btn btn-primary mt-6">"Back to home"</a>
                </div>
            </div>
        }
        .into_any(),
    }
}

/// 已配置的应用主体
#[component]
fn Configured(config: AppConfig) -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new(&config);
    provide_context(auth_ctx);

    // 2. 从 LocalStorage 恢复会话
    init_auth(&auth_ctx);

    // 3. 全局提示
    provide_toasts();

    // 4. 路由器组件：注入会话状态信号实现守卫
    view! {
        <Router session=auth_ctx.session_signal()>
            <RouterOutlet matcher=route_matcher />
        </Router>
        <ToastHost />
    }
}

#[component]
pub fn App() -> impl IntoView {
    match load_config() {
        Ok(config) => view! { <Configured config=config /> }.into_any(),
        Err(e) => {
            web_sys::console::error_1(&format!("[Config] {}", e).into());
            view! {
                <div class="flex items-center justify-center min-h-screen bg-base-200">
                    <div role="alert" class="alert alert-error max-w-lg">
                        <span>{format!("EMD Hunter is not configured: {}", e)}</span>
                    </div>
                </div>
            }
            .into_any()
        }
    }
}
