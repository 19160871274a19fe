//! 页面视图模型
//!
//! 每个页面一个纯数据结构，前端把它放进响应式信号里，
//! 按 `begin_* → 等待门面调用 → finish_*` 驱动。
//! 视图模型不发请求，也不碰 DOM，因此可以直接在原生测试里验证页面行为。

pub mod dashboard;
pub mod login;
pub mod opportunities;
pub mod register;
pub mod research;
pub mod serp;

pub use dashboard::{DashboardStats, DashboardView};
pub use login::LoginView;
pub use opportunities::OpportunitiesView;
pub use register::{RegisterView, Registration};
pub use research::{ResearchView, SliderBounds};
pub use serp::{AiRequest, SerpView};

use crate::error::ApiError;

pub(crate) fn missing_fields() -> ApiError {
    ApiError::validation("Please fill in all fields")
}
