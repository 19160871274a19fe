use std::fmt;

use serde::Deserialize;

// =========================================================
// 错误类别枚举
// =========================================================

/// 错误类别
///
/// 决定错误的处理方式：是否强制登出、向用户展示什么提示。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 客户端校验失败（如关键词为空），请求不会发出
    Validation,
    /// 登录凭据被后端拒绝
    InvalidCredentials,
    /// 注册邮箱已存在
    DuplicateAccount,
    /// 401/403：令牌失效，需要登出并跳转登录页
    Auth,
    /// 其他 4xx/5xx，或 2xx 响应体无法解析
    Backend,
    /// 没有收到任何响应
    Network,
}

impl ApiErrorKind {
    /// 获取机器可读的错误代码
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorKind::Validation => "VALIDATION_ERROR",
            ApiErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiErrorKind::DuplicateAccount => "DUPLICATE_ACCOUNT",
            ApiErrorKind::Auth => "UNAUTHORIZED",
            ApiErrorKind::Backend => "BACKEND_ERROR",
            ApiErrorKind::Network => "NETWORK_ERROR",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端错误
///
/// - kind: 错误类别
/// - message: 展示给用户的消息（后端消息原样保留）
/// - status: HTTP 状态码（网络错误和校验错误没有）
/// - spans: 操作追踪，仅用于日志
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    message: String,
    status: Option<u16>,
    spans: Vec<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::InvalidCredentials, message)
    }

    pub fn duplicate_account(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::DuplicateAccount, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Auth, message)
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Backend, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    /// 按 HTTP 状态码归类
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            401 | 403 => ApiErrorKind::Auth,
            _ => ApiErrorKind::Backend,
        };
        Self::new(kind, message).with_status(status)
    }

    // --- Builders ---

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// 重新归类（保留消息、状态码与追踪）
    pub fn with_kind(mut self, kind: ApiErrorKind) -> Self {
        self.kind = kind;
        self
    }

    /// 添加操作追踪
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(operation.into());
        self
    }

    // --- Accessors ---

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn spans(&self) -> &[String] {
        &self.spans
    }

    pub fn is_auth(&self) -> bool {
        self.kind == ApiErrorKind::Auth
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: {}", self.spans.join(" -> "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

// =========================================================
// 后端错误负载
// =========================================================

/// FastAPI 风格的错误体：`{"detail": "..."}` 或 `{"detail": [{"msg": "..."}]}`，
/// 也兼容 `{"message": "..."}`。
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    detail: Option<ErrorDetail>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Text(String),
    Items(Vec<ErrorItem>),
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    msg: String,
}

/// 从响应体中提取后端提供的错误消息
pub fn backend_message(body: &str) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_str(body).ok()?;
    let message = match payload.detail {
        Some(ErrorDetail::Text(text)) => text,
        Some(ErrorDetail::Items(items)) => items
            .into_iter()
            .map(|item| item.msg)
            .collect::<Vec<_>>()
            .join("; "),
        None => payload.message?,
    };

    let message = message.trim().to_string();
    if message.is_empty() { None } else { Some(message) }
}

// =========================================================
// 配置错误
// =========================================================

/// 启动期配置错误，不在运行时恢复
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingBackendUrl,
    InvalidBackendUrl(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingBackendUrl => write!(f, "backend URL is not configured"),
            ConfigError::InvalidBackendUrl(url) => {
                write!(f, "backend URL must start with http:// or https://: {}", url)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::from_status(401, "x").kind, ApiErrorKind::Auth);
        assert_eq!(ApiError::from_status(403, "x").kind, ApiErrorKind::Auth);
        assert_eq!(ApiError::from_status(500, "x").kind, ApiErrorKind::Backend);
        assert!(ApiError::from_status(404, "x").is_not_found());
    }

    #[test]
    fn display_includes_trace() {
        let err = ApiError::backend("Search failed")
            .in_op("keywords.search")
            .in_op("research.submit");
        assert_eq!(
            err.to_string(),
            "[BACKEND_ERROR] Search failed | trace: keywords.search -> research.submit"
        );
        assert_eq!(err.message(), "Search failed");
    }

    #[test]
    fn backend_message_formats() {
        assert_eq!(
            backend_message(r#"{"detail":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(
            backend_message(r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address"},{"msg":"field required"}]}"#)
                .as_deref(),
            Some("value is not a valid email address; field required")
        );
        assert_eq!(
            backend_message(r#"{"message":"Opportunity deleted"}"#).as_deref(),
            Some("Opportunity deleted")
        );
        assert_eq!(backend_message("Internal Server Error"), None);
        assert_eq!(backend_message(r#"{"detail":"  "}"#), None);
    }
}
