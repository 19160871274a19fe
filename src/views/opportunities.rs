use emd_hunter_shared::Opportunity;

use crate::action::{ActionState, Submission};
use crate::error::ApiResult;
use crate::notice::Notice;

/// 已保存机会列表
///
/// 同一时间只允许一个删除请求；正在删除的行被禁用。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpportunitiesView {
    pub opportunities: Vec<Opportunity>,
    pub load: ActionState,
    pub deleting: Option<String>,
}

impl OpportunitiesView {
    pub fn is_loading(&self) -> bool {
        self.load.is_pending()
    }

    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.deleting.as_deref() == Some(id)
    }

    pub fn begin_load(&mut self) -> bool {
        self.load.begin()
    }

    pub fn finish_load(&mut self, result: ApiResult<Vec<Opportunity>>) -> Option<Notice> {
        match result {
            Ok(opportunities) => {
                self.opportunities = opportunities;
                self.load.succeed();
                None
            }
            Err(e) => {
                let notice = Notice::from_error(&e);
                self.load.fail(e);
                Some(notice)
            }
        }
    }

    pub fn begin_delete(&mut self, id: &str) -> Submission<String> {
        if self.deleting.is_some() {
            return Submission::InFlight;
        }
        self.deleting = Some(id.to_string());
        Submission::Ready(id.to_string())
    }

    /// 成功时从本地列表移除；失败时列表保持不变
    pub fn finish_delete(&mut self, id: &str, result: &ApiResult<()>) -> Notice {
        if self.is_deleting(id) {
            self.deleting = None;
        }

        match result {
            Ok(()) => {
                self.opportunities.retain(|o| o.id != id);
                Notice::success("Opportunity deleted")
            }
            Err(e) => Notice::from_error(e),
        }
    }
}
