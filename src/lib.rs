//! EMD Hunter 客户端核心
//!
//! 不依赖 DOM 的客户端逻辑，前端只负责把这里的状态绑定到响应式信号上：
//! - `request` / `storage`: 传输与持久化抽象
//! - `api`: 单个类型化接口的调用与错误映射
//! - `session`: 会话存储（登录、注册、登出、认证头）
//! - `client`: 业务接口门面
//! - `route` / `guard`: 路由定义与路由守卫状态机
//! - `action` / `notice` / `views`: 页面异步动作状态与视图模型
//! - `format`: 展示格式化

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(&format!($($t)*))))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (web_sys::console::warn_1(&wasm_bindgen::JsValue::from_str(&format!($($t)*))))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (web_sys::console::error_1(&wasm_bindgen::JsValue::from_str(&format!($($t)*))))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub mod action;
pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod guard;
pub mod notice;
pub mod request;
pub mod route;
pub mod session;
pub mod storage;
pub mod views;

pub use action::{ActionState, Submission, ViewScope};
pub use api::EmdApi;
pub use client::ApiClient;
pub use config::AppConfig;
pub use error::{ApiError, ApiErrorKind, ApiResult, ConfigError};
pub use guard::{GuardState, RouteGuard};
pub use notice::{Notice, NoticeLevel};
pub use request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use route::{AppRoute, Navigation};
pub use session::{AuthHeaders, Session, SessionState, SessionStore};
pub use storage::{KeyValueStorage, MemoryStorage};

pub use emd_hunter_shared as shared;
