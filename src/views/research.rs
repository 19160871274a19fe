use emd_hunter_shared::{DataSource, KeywordResult, KeywordSearchResponse, SearchParams};

use crate::action::{ActionState, Submission};
use crate::error::{ApiError, ApiResult};
use crate::notice::Notice;
use crate::route::AppRoute;

/// 滑块的取值范围与步长
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderBounds {
    pub const VOLUME: SliderBounds = SliderBounds {
        min: 50.0,
        max: 5000.0,
        step: 50.0,
    };
    pub const MIN_CPC: SliderBounds = SliderBounds {
        min: 1.0,
        max: 100.0,
        step: 1.0,
    };
    pub const LIMIT: SliderBounds = SliderBounds {
        min: 10.0,
        max: 100.0,
        step: 10.0,
    };

    /// 夹到范围内并对齐到最近的步长
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).min(self.max)
    }
}

pub const MOCK_KEYWORDS_NOTICE: &str = "Using demo data. Configure DataForSEO API for real data.";

/// 关键词研究页面
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResearchView {
    pub params: SearchParams,
    pub keywords: Vec<KeywordResult>,
    pub source: Option<DataSource>,
    pub search: ActionState,
}

impl ResearchView {
    pub fn is_searching(&self) -> bool {
        self.search.is_pending()
    }

    // --- Filters ---

    pub fn set_seed(&mut self, seed: &str) {
        self.params.seed_keyword = seed.to_string();
    }

    /// 设置搜索量区间；两端会被排序
    pub fn set_volume_range(&mut self, min: f64, max: f64) {
        let a = SliderBounds::VOLUME.snap(min) as u32;
        let b = SliderBounds::VOLUME.snap(max) as u32;
        self.params.min_volume = a.min(b);
        self.params.max_volume = a.max(b);
    }

    pub fn set_min_volume(&mut self, value: f64) {
        let max = self.params.max_volume as f64;
        self.set_volume_range(value.min(max), max);
    }

    pub fn set_max_volume(&mut self, value: f64) {
        let min = self.params.min_volume as f64;
        self.set_volume_range(min, value.max(min));
    }

    pub fn set_min_cpc(&mut self, value: f64) {
        self.params.min_cpc = SliderBounds::MIN_CPC.snap(value);
    }

    pub fn set_limit(&mut self, value: f64) {
        self.params.limit = SliderBounds::LIMIT.snap(value) as u32;
    }

    // --- Search ---

    pub fn begin_search(&mut self) -> Submission<SearchParams> {
        if self.is_searching() {
            return Submission::InFlight;
        }
        if self.params.seed_keyword.trim().is_empty() {
            let err = ApiError::validation("Please enter a seed keyword");
            self.search.fail(err.clone());
            return Submission::Rejected(err);
        }

        self.search.begin();
        Submission::Ready(self.params.clone())
    }

    /// 失败时保留上一次的结果
    pub fn finish_search(&mut self, result: ApiResult<KeywordSearchResponse>) -> Option<Notice> {
        match result {
            Ok(response) => {
                self.search.succeed();
                self.keywords = response.keywords;
                let disclose = response.source.is_mock();
                self.source = Some(response.source);
                disclose.then(|| Notice::info(MOCK_KEYWORDS_NOTICE))
            }
            Err(e) => {
                let notice = Notice::from_error(&e);
                self.search.fail(e);
                Some(notice)
            }
        }
    }

    pub fn is_demo_data(&self) -> bool {
        self.source.as_ref().is_some_and(DataSource::is_mock)
    }

    /// 某个关键词的 SERP 分析页
    pub fn analyze_route(keyword: &KeywordResult) -> AppRoute {
        AppRoute::serp_for(&keyword.keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;

    fn response(source: &str) -> KeywordSearchResponse {
        KeywordSearchResponse {
            keywords: vec![KeywordResult {
                keyword: "plumber phoenix".into(),
                search_volume: 880,
                cpc: 32.5,
                competition: 0.41,
                advertiser_competition: None,
            }],
            source: DataSource::from(source.to_string()),
        }
    }

    #[test]
    fn sliders_are_bounded_and_stepped() {
        let mut view = ResearchView::default();
        view.set_volume_range(10.0, 9000.0);
        assert_eq!((view.params.min_volume, view.params.max_volume), (50, 5000));

        view.set_volume_range(1240.0, 310.0);
        assert_eq!((view.params.min_volume, view.params.max_volume), (300, 1250));

        view.set_min_volume(4000.0);
        assert_eq!(view.params.min_volume, 1250);

        view.set_min_cpc(0.2);
        assert_eq!(view.params.min_cpc, 1.0);
        view.set_min_cpc(42.6);
        assert_eq!(view.params.min_cpc, 43.0);

        view.set_limit(57.0);
        assert_eq!(view.params.limit, 60);
        view.set_limit(f64::NAN);
        assert_eq!(view.params.limit, 10);
    }

    #[test]
    fn blank_seed_is_rejected_before_any_call() {
        let mut view = ResearchView::default();
        view.set_seed("   ");
        match view.begin_search() {
            Submission::Rejected(e) => {
                assert_eq!(e.kind, ApiErrorKind::Validation);
                assert_eq!(Notice::from_error(&e).message, "Please enter a seed keyword");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn mock_results_are_disclosed() {
        let mut view = ResearchView::default();
        view.set_seed("plumber");
        let params = view.begin_search().ready().unwrap();
        assert_eq!(params.min_volume, 200);
        assert_eq!(view.begin_search(), Submission::InFlight);

        let notice = view.finish_search(Ok(response("mock")));
        assert_eq!(notice, Some(Notice::info(MOCK_KEYWORDS_NOTICE)));
        assert!(view.is_demo_data());
        assert_eq!(view.keywords.len(), 1);

        view.begin_search();
        assert_eq!(view.finish_search(Ok(response("dataforseo"))), None);
        assert!(!view.is_demo_data());
    }

    #[test]
    fn failed_search_keeps_previous_results() {
        let mut view = ResearchView::default();
        view.set_seed("plumber");
        view.begin_search();
        view.finish_search(Ok(response("live")));

        view.begin_search();
        let notice = view.finish_search(Err(ApiError::backend("Search failed")));
        assert_eq!(notice, Some(Notice::error("Search failed")));
        assert_eq!(view.keywords.len(), 1);
        assert!(!view.is_searching());
    }

    #[test]
    fn analyze_links_to_encoded_serp_route() {
        let route = ResearchView::analyze_route(&response("mock").keywords[0]);
        assert_eq!(route.to_path(), "/serp/plumber%20phoenix");
    }
}
