use emd_hunter_shared::{
    AiAnalysisResponse, DEFAULT_LOCATION, KeywordMetrics, KillScore, NewOpportunity, Opportunity,
    SerpAnalysisResponse, SerpResult,
};

use crate::action::{ActionState, Submission};
use crate::error::{ApiError, ApiResult};
use crate::notice::Notice;

pub const MOCK_SERP_NOTICE: &str = "Using demo data. Configure DataForSEO API for real SERP data.";
pub const AI_FAILED_NOTICE: &str = "AI analysis failed. Please try again.";

/// 一次 AI 解读请求的参数
///
/// `generation` 标记请求针对的是哪一份报告，新分析开始后旧的解读结果会被丢弃。
#[derive(Debug, Clone, PartialEq)]
pub struct AiRequest {
    pub generation: u64,
    pub keyword: String,
    pub serp_results: Vec<SerpResult>,
    pub keyword_data: KeywordMetrics,
}

/// SERP 分析页面
///
/// 分析、AI 解读、保存是三个相互独立的动作，各自有 pending 状态。
#[derive(Debug, Clone, PartialEq)]
pub struct SerpView {
    pub keyword: String,
    pub location: String,
    /// 当前报告对应的关键词（输入框可能已被修改）
    pub analyzed_keyword: Option<String>,
    pub report: Option<SerpAnalysisResponse>,
    pub ai_analysis: Option<String>,
    pub analyze: ActionState,
    pub ai: ActionState,
    pub save: ActionState,
    generation: u64,
    autostart: bool,
}

impl Default for SerpView {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SerpView {
    /// 路由参数中的关键词会预填并自动提交一次
    pub fn new(route_keyword: Option<String>) -> Self {
        let keyword = route_keyword.unwrap_or_default();
        let autostart = !keyword.trim().is_empty();
        Self {
            keyword,
            location: DEFAULT_LOCATION.to_string(),
            analyzed_keyword: None,
            report: None,
            ai_analysis: None,
            analyze: ActionState::Idle,
            ai: ActionState::Idle,
            save: ActionState::Idle,
            generation: 0,
            autostart,
        }
    }

    /// 是否需要自动提交（只返回一次 true）
    pub fn take_autostart(&mut self) -> bool {
        std::mem::take(&mut self.autostart)
    }

    pub fn kill_score(&self) -> Option<KillScore> {
        self.report.as_ref().map(|r| r.kill_score)
    }

    /// 报告来自演示数据时，页面需要在仪表盘之前提示
    pub fn is_demo_data(&self) -> bool {
        self.report.as_ref().is_some_and(|r| r.source.is_mock())
    }

    // --- Analyze ---

    /// 返回 `(keyword, location)`；开始新分析会清除上一次的 AI 解读
    pub fn begin_analyze(&mut self) -> Submission<(String, String)> {
        if self.analyze.is_pending() {
            return Submission::InFlight;
        }
        let keyword = self.keyword.trim();
        if keyword.is_empty() {
            let err = ApiError::validation("Please enter a keyword");
            self.analyze.fail(err.clone());
            return Submission::Rejected(err);
        }

        let request = (keyword.to_string(), self.location.clone());
        self.analyze.begin();
        self.generation += 1;
        self.ai_analysis = None;
        self.ai.reset();
        Submission::Ready(request)
    }

    pub fn finish_analyze(
        &mut self,
        keyword: &str,
        result: ApiResult<SerpAnalysisResponse>,
    ) -> Option<Notice> {
        match result {
            Ok(report) => {
                self.analyze.succeed();
                let disclose = report.source.is_mock();
                self.report = Some(report);
                self.analyzed_keyword = Some(keyword.to_string());
                self.save.reset();
                disclose.then(|| Notice::info(MOCK_SERP_NOTICE))
            }
            Err(e) => {
                let notice = Notice::from_error(&e);
                self.analyze.fail(e);
                Some(notice)
            }
        }
    }

    // --- AI ---

    pub fn begin_ai(&mut self) -> Submission<AiRequest> {
        if self.ai.is_pending() {
            return Submission::InFlight;
        }
        let (Some(report), Some(keyword)) = (&self.report, &self.analyzed_keyword) else {
            return Submission::Rejected(ApiError::validation("Run a SERP analysis first"));
        };

        let request = AiRequest {
            generation: self.generation,
            keyword: keyword.clone(),
            serp_results: report.results.clone(),
            keyword_data: KeywordMetrics::placeholder(keyword.clone()),
        };
        self.ai.begin();
        Submission::Ready(request)
    }

    /// `source = error` 不展示文本，只给出失败提示
    pub fn finish_ai(&mut self, generation: u64, result: ApiResult<AiAnalysisResponse>) -> Option<Notice> {
        if generation != self.generation {
            return None;
        }

        match result {
            Ok(response) if response.source.is_error() => {
                self.ai_analysis = None;
                self.ai.fail(ApiError::backend(AI_FAILED_NOTICE));
                Some(Notice::error(AI_FAILED_NOTICE))
            }
            Ok(response) => {
                self.ai.succeed();
                self.ai_analysis = Some(response.analysis);
                None
            }
            Err(e) => {
                let notice = Notice::from_error(&e);
                self.ai.fail(e);
                Some(notice)
            }
        }
    }

    // --- Save ---

    /// 保存当前报告；本页面没有关键词指标，使用占位值
    pub fn begin_save(&mut self) -> Submission<NewOpportunity> {
        if self.save.is_pending() {
            return Submission::InFlight;
        }
        let (Some(report), Some(keyword)) = (&self.report, &self.analyzed_keyword) else {
            return Submission::Rejected(ApiError::validation("Run a SERP analysis first"));
        };

        let metrics = KeywordMetrics::placeholder(keyword.clone());
        let payload = NewOpportunity {
            keyword: metrics.keyword,
            location: self.location.clone(),
            search_volume: metrics.search_volume,
            cpc: metrics.cpc,
            competition: metrics.competition,
            kill_score: report.kill_score,
            serp_results: report.results.clone(),
            ai_analysis: self.ai_analysis.clone(),
        };
        self.save.begin();
        Submission::Ready(payload)
    }

    pub fn finish_save(&mut self, result: &ApiResult<Opportunity>) -> Notice {
        match result {
            Ok(_) => {
                self.save.succeed();
                Notice::success("Opportunity saved!")
            }
            Err(e) => {
                self.save.fail(e.clone());
                Notice::from_error(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;
    use emd_hunter_shared::DataSource;

    fn report(source: &str, score: f64) -> SerpAnalysisResponse {
        SerpAnalysisResponse {
            results: vec![SerpResult {
                rank: 1,
                domain: "yelp.com".into(),
                url: "https://www.yelp.com/search?find_desc=plumber".into(),
                title: "Top 10 Plumbers in Phoenix".into(),
                description: None,
                domain_rank: Some(93),
                backlinks: Some(120_000),
                is_directory: true,
                is_replaceable: true,
            }],
            kill_score: KillScore::new(score),
            source: DataSource::from(source.to_string()),
        }
    }

    fn analyzed(source: &str, score: f64) -> SerpView {
        let mut view = SerpView::new(Some("plumber phoenix".into()));
        let (keyword, _) = view.begin_analyze().ready().unwrap();
        view.finish_analyze(&keyword, Ok(report(source, score)));
        view
    }

    #[test]
    fn route_keyword_autostarts_once() {
        let mut view = SerpView::new(Some("plumber phoenix".into()));
        assert_eq!(view.keyword, "plumber phoenix");
        assert!(view.take_autostart());
        assert!(!view.take_autostart());

        let mut empty = SerpView::new(None);
        assert!(!empty.take_autostart());
        assert!(matches!(empty.begin_analyze(), Submission::Rejected(_)));
    }

    #[test]
    fn mock_report_is_disclosed_and_score_shown_unchanged() {
        let mut view = SerpView::new(Some("plumber phoenix".into()));
        let (keyword, location) = view.begin_analyze().ready().unwrap();
        assert_eq!(location, "United States");

        let notice = view.finish_analyze(&keyword, Ok(report("mock", 72.0)));
        assert_eq!(notice, Some(Notice::info(MOCK_SERP_NOTICE)));
        assert!(view.is_demo_data());
        assert_eq!(view.kill_score(), Some(KillScore::new(72.0)));
    }

    #[test]
    fn ai_error_source_is_not_shown_as_success() {
        let mut view = analyzed("live", 55.0);
        let request = view.begin_ai().ready().unwrap();
        assert_eq!(request.keyword_data.search_volume, 500);

        let notice = view.finish_ai(
            request.generation,
            Ok(AiAnalysisResponse {
                analysis: "AI analysis failed: rate limited".into(),
                source: DataSource::Error,
            }),
        );
        assert_eq!(notice.map(|n| n.level), Some(NoticeLevel::Error));
        assert_eq!(view.ai_analysis, None);
    }

    #[test]
    fn new_analysis_clears_and_discards_old_ai_text() {
        let mut view = analyzed("live", 55.0);
        let request = view.begin_ai().ready().unwrap();
        view.finish_ai(
            request.generation,
            Ok(AiAnalysisResponse {
                analysis: "Strong opportunity".into(),
                source: DataSource::Live("claude".into()),
            }),
        );
        assert_eq!(view.ai_analysis.as_deref(), Some("Strong opportunity"));

        let stale = view.begin_ai().ready().unwrap();
        view.begin_analyze();
        assert_eq!(view.ai_analysis, None);
        assert!(!view.ai.is_pending());

        let notice = view.finish_ai(
            stale.generation,
            Ok(AiAnalysisResponse {
                analysis: "Old".into(),
                source: DataSource::Live("claude".into()),
            }),
        );
        assert_eq!(notice, None);
        assert_eq!(view.ai_analysis, None);
    }

    #[test]
    fn save_uses_placeholder_metrics_and_ai_text() {
        let mut view = analyzed("mock", 72.0);
        let request = view.begin_ai().ready().unwrap();
        view.finish_ai(
            request.generation,
            Ok(AiAnalysisResponse {
                analysis: "Go for it".into(),
                source: DataSource::Mock,
            }),
        );

        let payload = view.begin_save().ready().unwrap();
        assert_eq!(payload.keyword, "plumber phoenix");
        assert_eq!(payload.search_volume, 500);
        assert_eq!(payload.cpc, 25.0);
        assert_eq!(payload.competition, 0.5);
        assert_eq!(payload.kill_score, KillScore::new(72.0));
        assert_eq!(payload.ai_analysis.as_deref(), Some("Go for it"));
        assert_eq!(view.begin_save(), Submission::InFlight);

        let notice = view.finish_save(&Err(ApiError::backend("Failed to save opportunity")));
        assert_eq!(notice, Notice::error("Failed to save opportunity"));
        assert!(view.begin_save().ready().is_some());
    }

    #[test]
    fn actions_require_a_report() {
        let mut view = SerpView::new(None);
        assert!(matches!(view.begin_ai(), Submission::Rejected(_)));
        assert!(matches!(view.begin_save(), Submission::Rejected(_)));
    }
}
