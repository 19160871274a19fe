use emd_hunter::format::format_count;
use emd_hunter::views::SerpView;
use emd_hunter::{ApiClient, Notice, Submission, ViewScope};
use emd_hunter_shared::{ResultStanding, SerpAnalysisResponse, SerpResult};
use leptos::ev::{MouseEvent, SubmitEvent};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::header::AppHeader;
use crate::components::icons::{
    AlertTriangle, ArrowRight, Bookmark, CheckCircle, ExternalLink, Sparkles, Target, XCircle,
};
use crate::components::kill_score_gauge::KillScoreGauge;
use crate::components::toast::{Toasts, use_toasts};
use crate::use_view_scope;

fn standing_badge(standing: ResultStanding) -> &'static str {
    match standing {
        ResultStanding::Directory => "badge badge-warning badge-sm",
        ResultStanding::Replaceable => "badge badge-success badge-sm",
        ResultStanding::Strong => "badge badge-error badge-sm",
    }
}

fn standing_border(standing: ResultStanding) -> &'static str {
    match standing {
        ResultStanding::Directory => "border-warning/30 bg-warning/5",
        ResultStanding::Replaceable => "border-success/30 bg-success/5",
        ResultStanding::Strong => "border-base-300",
    }
}

/// 发起一次 SERP 分析；输入框提交和路由参数自动提交共用
fn start_analysis(serp: RwSignal<SerpView>, client: ApiClient, toasts: Toasts, scope: ViewScope) {
    match serp.try_update(SerpView::begin_analyze) {
        Some(Submission::Ready((keyword, location))) => {
            spawn_local(async move {
                let result = client.analyze_serp(&keyword, &location).await;
                let notice = scope.deliver(|| serp.try_update(|s| s.finish_analyze(&keyword, result)));
                toasts.show_opt(notice.flatten().flatten());
            });
        }
        Some(Submission::Rejected(err)) => toasts.show(Notice::from_error(&err)),
        _ => {}
    }
}

#[component]
fn SerpResultCard(result: SerpResult) -> impl IntoView {
    let standing = result.standing();
    let icon = match standing {
        ResultStanding::Directory => view! { <AlertTriangle attr:class="h-4 w-4 text-warning" /> }.into_any(),
        ResultStanding::Replaceable => view! { <CheckCircle attr:class="h-4 w-4 text-success" /> }.into_any(),
        ResultStanding::Strong => view! { <XCircle attr:class="h-4 w-4 text-error" /> }.into_any(),
    };
    let domain_rank = result
        .domain_rank
        .map(|r| r.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let backlinks = result
        .backlinks
        .map(format_count)
        .unwrap_or_else(|| "N/A".to_string());

    view! {
        <div class=format!("p-4 rounded-lg border {}", standing_border(standing))>
            <div class="flex items-start gap-3">
                <div class="flex items-center justify-center w-8 h-8 rounded bg-base-200 font-mono text-sm font-bold">
                    {result.rank}
                </div>
                <div class="flex-1 min-w-0">
                    <div class="flex items-center gap-2 mb-1">
                        {icon}
                        <span class="font-mono text-sm text-primary truncate">{result.domain.clone()}</span>
                        <span class=standing_badge(standing)>{standing.label()}</span>
                    </div>
                    <h4 class="text-sm font-medium mb-1 line-clamp-1">{result.title.clone()}</h4>
                    <p class="text-xs text-base-content/60 line-clamp-2">
                        {result.description.clone().unwrap_or_default()}
                    </p>
                    <div class="flex items-center gap-4 mt-2 text-xs text-base-content/60">
                        <span>"DA: " <span class="font-mono">{domain_rank}</span></span>
                        <span>"Links: " <span class="font-mono">{backlinks}</span></span>
                        <a
                            href=result.url.clone()
                            target="_blank"
                            rel="noopener noreferrer"
                            class="link link-primary flex items-center gap-1"
                        >
                            "Visit"
                            <ExternalLink attr:class="h-3 w-3" />
                        </a>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn SerpAnalysisPage(
    /// 路由中携带的关键词，存在时自动分析一次
    keyword: Option<String>,
) -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let scope = use_view_scope();
    let serp = RwSignal::new(SerpView::new(keyword));

    if serp.try_update(SerpView::take_autostart) == Some(true) {
        start_analysis(serp, auth.client(), toasts, scope.clone());
    }

    let on_submit = {
        let scope = scope.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            start_analysis(serp, auth.client(), toasts, scope.clone());
        }
    };

    let on_ai = {
        let scope = scope.clone();
        move |_: MouseEvent| match serp.try_update(SerpView::begin_ai) {
            Some(Submission::Ready(request)) => {
                let client = auth.client();
                let scope = scope.clone();
                spawn_local(async move {
                    let result = client
                        .request_ai_analysis(&request.keyword, &request.serp_results, request.keyword_data)
                        .await;
                    let notice = scope.deliver(|| serp.try_update(|s| s.finish_ai(request.generation, result)));
                    toasts.show_opt(notice.flatten().flatten());
                });
            }
            Some(Submission::Rejected(err)) => toasts.show(Notice::from_error(&err)),
            _ => {}
        }
    };

    let on_save = move |_: MouseEvent| match serp.try_update(SerpView::begin_save) {
        Some(Submission::Ready(payload)) => {
            let client = auth.client();
            let scope = scope.clone();
            spawn_local(async move {
                let result = client.save_opportunity(&payload).await;
                let notice = scope.deliver(|| serp.try_update(|s| s.finish_save(&result)));
                toasts.show_opt(notice.flatten());
            });
        }
        Some(Submission::Rejected(err)) => toasts.show(Notice::from_error(&err)),
        _ => {}
    };

    let is_analyzing = move || serp.with(|s| s.analyze.is_pending());
    let is_ai_pending = move || serp.with(|s| s.ai.is_pending());
    let is_saving = move || serp.with(|s| s.save.is_pending());
    let report = move || serp.with(|s| s.report.clone());

    view! {
        <div class="min-h-screen bg-base-200" data-testid="serp-analysis">
            <AppHeader />

            <main class="container mx-auto p-4 md:p-8 max-w-7xl space-y-8">
                <div>
                    <h1 class="text-3xl font-bold mb-2">
                        "SERP " <span class="text-primary">"Analysis"</span>
                    </h1>
                    <p class="text-base-content/70">
                        "Analyze page one to find replaceable results and calculate the Kill Score."
                    </p>
                </div>

                <form on:submit=on_submit class="card bg-base-100 shadow-xl">
                    <div class="card-body flex-col md:flex-row gap-4">
                        <input
                            type="text"
                            class="input input-bordered flex-1"
                            placeholder="Enter keyword to analyze (e.g., plumber phoenix)"
                            on:input=move |ev| serp.update(|s| s.keyword = event_target_value(&ev))
                            prop:value=move || serp.with(|s| s.keyword.clone())
                            data-testid="serp-keyword-input"
                        />
                        <button type="submit" class="btn btn-primary" disabled=is_analyzing data-testid="analyze-serp-btn">
                            {move || if is_analyzing() {
                                view! { <span class="loading loading-spinner"></span> "Analyzing..." }.into_any()
                            } else {
                                view! { "Analyze" <ArrowRight attr:class="h-4 w-4" /> }.into_any()
                            }}
                        </button>
                    </div>
                </form>

                <Show when=move || serp.with(SerpView::is_demo_data)>
                    <div role="alert" class="alert alert-warning" data-testid="demo-data-notice">
                        <AlertTriangle attr:class="h-5 w-5" />
                        <span>"Showing demo data. Live SERP data is not configured on the server."</span>
                    </div>
                </Show>

                {move || match report() {
                    Some(report) => view! { <ReportSection report=report /> }.into_any(),
                    None if !is_analyzing() => view! {
                        <div class="card bg-base-100 shadow-xl">
                            <div class="card-body items-center text-center py-12">
                                <Target attr:class="h-12 w-12 text-base-content/40 mb-4" />
                                <h3 class="text-lg font-medium">"Enter a keyword to analyze"</h3>
                                <p class="text-base-content/60 max-w-md">
                                    "We'll analyze the top 10 results and calculate a Kill Score showing how "
                                    "replaceable the current rankings are with an EMD."
                                </p>
                            </div>
                        </div>
                    }
                    .into_any(),
                    None => ().into_any(),
                }}

                <Show when=move || report().is_some()>
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body gap-3">
                            <button
                                class="btn btn-outline btn-secondary"
                                on:click=on_ai.clone()
                                disabled=is_ai_pending
                                data-testid="ai-analysis-btn"
                            >
                                {move || if is_ai_pending() {
                                    view! { <span class="loading loading-spinner"></span> "Analyzing..." }.into_any()
                                } else {
                                    view! { <Sparkles attr:class="h-4 w-4" /> "Get AI Analysis" }.into_any()
                                }}
                            </button>
                            <button
                                class="btn btn-primary"
                                on:click=on_save.clone()
                                disabled=is_saving
                                data-testid="save-opportunity-btn"
                            >
                                {move || if is_saving() {
                                    view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                                } else {
                                    view! { <Bookmark attr:class="h-4 w-4" /> "Save Opportunity" }.into_any()
                                }}
                            </button>

                            {move || serp.with(|s| s.ai_analysis.clone()).map(|text| view! {
                                <div class="mt-4 p-4 rounded-lg bg-secondary/10 border border-secondary/20">
                                    <div class="flex items-center gap-2 mb-3 text-secondary">
                                        <Sparkles attr:class="h-4 w-4" />
                                        <span class="text-sm font-medium">"AI Analysis"</span>
                                    </div>
                                    <p class="text-sm text-base-content/70 whitespace-pre-wrap" data-testid="ai-analysis-text">
                                        {text}
                                    </p>
                                </div>
                            })}
                        </div>
                    </div>
                </Show>
            </main>
        </div>
    }
}

/// 分析结果：仪表与首页结果列表
#[component]
fn ReportSection(report: SerpAnalysisResponse) -> impl IntoView {
    let replaceable = report.replaceable_count();
    let total = report.results.len();
    let score = report.kill_score;

    view! {
        <div class="grid lg:grid-cols-3 gap-6">
            <div class="card bg-base-100 shadow-xl lg:col-span-1">
                <div class="card-body">
                    <h2 class="card-title text-lg">"Kill Score"</h2>
                    <KillScoreGauge score=score />
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl lg:col-span-2">
                <div class="card-body">
                    <h2 class="card-title text-lg flex items-center justify-between">
                        <span>"Page One Results"</span>
                        <span class="text-sm font-normal text-base-content/60">
                            {format!("{} / {} replaceable", replaceable, total)}
                        </span>
                    </h2>
                    <div class="space-y-3">
                        {report
                            .results
                            .into_iter()
                            .map(|result| view! { <SerpResultCard result=result /> })
                            .collect_view()}
                    </div>
                </div>
            </div>
        </div>
    }
}
