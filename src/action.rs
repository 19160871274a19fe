use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ApiError;

// =========================================================
// 异步动作状态机
// =========================================================

/// 单个页面动作的状态：`Idle → Pending → {Succeeded | Failed}`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActionState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(ApiError),
}

/// 提交动作的结果
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<T> {
    /// 可以发起请求
    Ready(T),
    /// 本地校验未通过，请求不会发出
    Rejected(ApiError),
    /// 同类请求仍在进行中，本次提交被忽略
    InFlight,
}

impl<T> Submission<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Submission::Ready(value) => Some(value),
            _ => None,
        }
    }
}

impl ActionState {
    /// 进入 `Pending`；已经在 `Pending` 时返回 false
    pub fn begin(&mut self) -> bool {
        if self.is_pending() {
            return false;
        }
        *self = ActionState::Pending;
        true
    }

    pub fn succeed(&mut self) {
        *self = ActionState::Succeeded;
    }

    pub fn fail(&mut self, error: ApiError) {
        *self = ActionState::Failed(error);
    }

    pub fn reset(&mut self) {
        *self = ActionState::Idle;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ActionState::Pending)
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            ActionState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

// =========================================================
// 视图生命周期
// =========================================================

/// 视图是否仍挂载
///
/// 异步任务通过 [`ViewScope::deliver`] 写回视图状态，卸载后到达的响应被丢弃。
/// 使用 `Arc<AtomicBool>` 以便放进要求 `Send + Sync` 的清理回调。
#[derive(Debug, Clone)]
pub struct ViewScope {
    mounted: Arc<AtomicBool>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    /// 仍挂载时执行 `apply` 并返回其结果；已卸载时丢弃，返回 `None`
    pub fn deliver<R>(&self, apply: impl FnOnce() -> R) -> Option<R> {
        if !self.is_mounted() {
            return None;
        }
        Some(apply())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_refused_while_pending() {
        let mut state = ActionState::default();
        assert!(state.begin());
        assert!(!state.begin());

        state.fail(ApiError::network("offline"));
        assert_eq!(state.error().map(|e| e.message()), Some("offline"));

        // 失败后可以重试
        assert!(state.begin());
        state.succeed();
        assert_eq!(state, ActionState::Succeeded);
    }

    #[test]
    fn scope_is_shared_between_clones() {
        let scope = ViewScope::new();
        let task_copy = scope.clone();
        assert!(task_copy.is_mounted());
        scope.unmount();
        assert!(!task_copy.is_mounted());
    }

    #[test]
    fn deliver_runs_only_while_mounted() {
        let scope = ViewScope::new();
        let mut applied = 0;
        assert_eq!(scope.deliver(|| applied += 1), Some(()));

        scope.clone().unmount();
        assert_eq!(scope.deliver(|| applied += 1), None);
        assert_eq!(applied, 1);
    }
}
