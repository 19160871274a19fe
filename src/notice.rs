use crate::error::{ApiError, ApiErrorKind};

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl NoticeLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "alert-success",
            NoticeLevel::Info => "alert-info",
            NoticeLevel::Error => "alert-error",
        }
    }
}

/// 展示给用户的一条提示（toast）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// 错误转提示：网络与令牌失效使用固定文案，其余展示原始消息
    pub fn from_error(error: &ApiError) -> Self {
        match error.kind {
            ApiErrorKind::Network => Self::error("Network error. Please try again."),
            ApiErrorKind::Auth => Self::error("Your session has expired. Please sign in again."),
            _ => Self::error(error.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_messages_are_shown_verbatim() {
        let notice = Notice::from_error(&ApiError::backend("Database unavailable"));
        assert_eq!(notice, Notice::error("Database unavailable"));

        let notice = Notice::from_error(&ApiError::network("connection refused"));
        assert_eq!(notice.message, "Network error. Please try again.");
        assert_eq!(notice.level.css_class(), "alert-error");
    }
}
