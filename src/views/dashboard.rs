use std::cmp::Reverse;

use emd_hunter_shared::Opportunity;

use crate::action::ActionState;
use crate::error::ApiResult;
use crate::format::KillScoreTier;
use crate::notice::Notice;

/// 控制面板最多展示的最近机会数
pub const RECENT_LIMIT: usize = 6;

/// 快速统计
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardStats {
    pub total: usize,
    pub average_kill_score: Option<f64>,
    pub high_tier: usize,
}

/// 控制面板
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    /// 按保存时间倒序
    pub opportunities: Vec<Opportunity>,
    pub load: ActionState,
}

impl DashboardView {
    pub fn is_loading(&self) -> bool {
        self.load.is_pending()
    }

    pub fn begin_load(&mut self) -> bool {
        self.load.begin()
    }

    /// 加载失败只记录日志并提示，页面照常显示空列表
    pub fn finish_load(&mut self, result: ApiResult<Vec<Opportunity>>) -> Option<Notice> {
        match result {
            Ok(mut opportunities) => {
                opportunities.sort_by_key(|o| Reverse(o.created_at));
                self.opportunities = opportunities;
                self.load.succeed();
                None
            }
            Err(e) => {
                log_error!("[Dashboard] Failed to fetch opportunities: {}", e);
                let notice = Notice::from_error(&e);
                self.load.fail(e);
                Some(notice)
            }
        }
    }

    pub fn recent(&self) -> &[Opportunity] {
        let end = self.opportunities.len().min(RECENT_LIMIT);
        &self.opportunities[..end]
    }

    pub fn has_opportunities(&self) -> bool {
        !self.opportunities.is_empty()
    }

    pub fn stats(&self) -> DashboardStats {
        let total = self.opportunities.len();
        let average_kill_score = (total > 0).then(|| {
            self.opportunities
                .iter()
                .map(|o| o.kill_score.value())
                .sum::<f64>()
                / total as f64
        });
        let high_tier = self
            .opportunities
            .iter()
            .filter(|o| KillScoreTier::of(o.kill_score) == KillScoreTier::High)
            .count();

        DashboardStats {
            total,
            average_kill_score,
            high_tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use chrono::{TimeZone, Utc};
    use emd_hunter_shared::KillScore;

    fn opportunity(id: &str, day: u32, score: f64) -> Opportunity {
        Opportunity {
            id: id.into(),
            keyword: format!("keyword {id}"),
            location: "United States".into(),
            search_volume: 500,
            cpc: 25.0,
            competition: 0.5,
            kill_score: KillScore::new(score),
            serp_results: vec![],
            ai_analysis: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap(),
            user_id: Some("u1".into()),
        }
    }

    #[test]
    fn shows_six_most_recent() {
        let mut view = DashboardView::default();
        assert!(view.begin_load());
        let list = (1..=8).map(|d| opportunity(&format!("o{d}"), d, 50.0)).collect();
        assert_eq!(view.finish_load(Ok(list)), None);

        let recent: Vec<&str> = view.recent().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(recent, vec!["o8", "o7", "o6", "o5", "o4", "o3"]);
        assert!(!view.is_loading());
    }

    #[test]
    fn stats_summarize_saved_opportunities() {
        let mut view = DashboardView::default();
        assert_eq!(view.stats().average_kill_score, None);

        view.begin_load();
        view.finish_load(Ok(vec![
            opportunity("a", 1, 80.0),
            opportunity("b", 2, 40.0),
            opportunity("c", 3, 30.0),
        ]));
        let stats = view.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.average_kill_score, Some(50.0));
        assert_eq!(stats.high_tier, 1);
    }

    #[test]
    fn load_failure_becomes_notice() {
        let mut view = DashboardView::default();
        view.begin_load();
        let notice = view.finish_load(Err(ApiError::backend("Failed to load opportunities")));
        assert_eq!(notice, Some(Notice::error("Failed to load opportunities")));
        assert!(!view.has_opportunities());
    }
}
