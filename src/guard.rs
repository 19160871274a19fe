//! 路由守卫
//!
//! 受保护视图外层的状态机：
//! `Resolving → Authorized | Unauthorized`，在会话存储恢复完成时发生一次；
//! 之后随登录/登出在 `Authorized` 与 `Unauthorized` 之间切换，不再回到 `Resolving`。
//! 每次进入 `Unauthorized` 恰好产生一次替换式跳转到登录页。

use crate::route::{AppRoute, Navigation};
use crate::session::SessionState;

/// 守卫状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    /// 会话仍在恢复，渲染占位内容
    #[default]
    Resolving,
    /// 渲染被包裹的视图
    Authorized,
    /// 已请求跳转到登录页，不渲染任何内容
    Unauthorized,
}

#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    state: GuardState,
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// 观察一次会话状态，返回需要执行的跳转（如果有）
    pub fn observe(&mut self, session: &SessionState) -> Option<Navigation> {
        if session.is_loading {
            // 恢复完成之前不做任何决定
            return None;
        }

        let next = if session.is_authenticated() {
            GuardState::Authorized
        } else {
            GuardState::Unauthorized
        };

        if next == self.state {
            return None;
        }
        self.state = next;

        match next {
            GuardState::Unauthorized => {
                Some(Navigation::Replace(AppRoute::auth_failure_redirect()))
            }
            _ => None,
        }
    }
}

/// 导航前的路由检查
///
/// 返回应替换目标的路由：未登录访问受保护页面去登录页，
/// 已登录访问登录/注册页去控制面板；无需重定向时返回 `None`。
pub fn redirect_for(target: &AppRoute, authenticated: bool) -> Option<AppRoute> {
    if target.requires_auth() && !authenticated {
        Some(AppRoute::auth_failure_redirect())
    } else if target.should_redirect_when_authenticated() && authenticated {
        Some(AppRoute::auth_success_redirect())
    } else {
        None
    }
}
