//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 落地页 (默认路由)
    #[default]
    Landing,
    /// 登录页面
    Login,
    /// 注册页面
    Register,
    /// 控制面板 (需要认证)
    Dashboard,
    /// 关键词研究 (需要认证)
    Research,
    /// SERP 分析，可选关键词参数 (需要认证)
    Serp(Option<String>),
    /// 已保存的机会 (需要认证)
    Opportunities,
    /// 页面未找到
    NotFound,
}

/// 导航指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// 新增一条历史记录
    Push(AppRoute),
    /// 替换当前历史记录（重定向，避免后退循环）
    Replace(AppRoute),
}

impl Navigation {
    pub fn route(&self) -> &AppRoute {
        match self {
            Navigation::Push(route) | Navigation::Replace(route) => route,
        }
    }
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };

        match trimmed {
            "" | "/" => Self::Landing,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/research" => Self::Research,
            "/opportunities" => Self::Opportunities,
            "/serp" => Self::Serp(None),
            other => match other.strip_prefix("/serp/") {
                Some(segment) if !segment.contains('/') => {
                    let keyword = urlencoding::decode(segment)
                        .map(|k| k.into_owned())
                        .unwrap_or_else(|_| segment.to_string());
                    if keyword.trim().is_empty() {
                        Self::Serp(None)
                    } else {
                        Self::Serp(Some(keyword))
                    }
                }
                _ => Self::NotFound,
            },
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Research => "/research".to_string(),
            Self::Serp(None) => "/serp".to_string(),
            Self::Serp(Some(keyword)) => format!("/serp/{}", urlencoding::encode(keyword)),
            Self::Opportunities => "/opportunities".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// 分析指定关键词的 SERP 页面
    pub fn serp_for(keyword: &str) -> Self {
        Self::Serp(Some(keyword.to_string()))
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Research | Self::Serp(_) | Self::Opportunities
        )
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_static_paths() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Landing);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/dashboard/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/research?x=1"), AppRoute::Research);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn serp_keyword_is_url_encoded() {
        let route = AppRoute::serp_for("plumber phoenix");
        assert_eq!(route.to_path(), "/serp/plumber%20phoenix");
        assert_eq!(AppRoute::from_path(&route.to_path()), route);
        assert_eq!(AppRoute::from_path("/serp"), AppRoute::Serp(None));
        assert_eq!(AppRoute::from_path("/serp/%20"), AppRoute::Serp(None));
        assert_eq!(AppRoute::from_path("/serp/a/b"), AppRoute::NotFound);
    }

    #[test]
    fn protected_routes() {
        assert!(AppRoute::Dashboard.requires_auth());
        assert!(AppRoute::Serp(None).requires_auth());
        assert!(!AppRoute::Landing.requires_auth());
        assert!(!AppRoute::Login.requires_auth());
        assert!(AppRoute::Register.should_redirect_when_authenticated());
    }
}
