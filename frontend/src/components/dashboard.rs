use emd_hunter::AppRoute;
use emd_hunter::format::{KillScoreTier, format_count, format_currency, format_percent};
use emd_hunter::views::DashboardView;
use emd_hunter_shared::Opportunity;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::header::AppHeader;
use crate::components::icons::{ArrowRight, BarChart3, Bookmark, Search, Zap};
use crate::components::toast::use_toasts;
use crate::use_view_scope;
use crate::web::router::{Link, use_router};

#[component]
fn QuickAction(
    to: AppRoute,
    title: &'static str,
    desc: &'static str,
    testid: &'static str,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    view! {
        <div
            class="card bg-base-100 shadow-xl cursor-pointer hover:shadow-2xl transition-all"
            on:click=move |_| router.navigate_to(to.clone())
            data-testid=testid
        >
            <div class="card-body">
                <div class="p-3 bg-primary/10 rounded-xl text-primary w-fit">{children()}</div>
                <h3 class="card-title text-lg">{title}</h3>
                <p class="text-sm text-base-content/60">{desc}</p>
                <div class="card-actions justify-end text-primary">
                    <ArrowRight attr:class="h-4 w-4" />
                </div>
            </div>
        </div>
    }
}

#[component]
fn RecentCard(opportunity: Opportunity) -> impl IntoView {
    let tier = KillScoreTier::of(opportunity.kill_score);

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body p-4">
                <div class="flex items-start justify-between mb-3">
                    <div>
                        <h4 class="font-mono text-sm text-primary">{opportunity.keyword.clone()}</h4>
                        <p class="text-xs text-base-content/60">{opportunity.location.clone()}</p>
                    </div>
                    <div class=format!("text-2xl font-bold font-mono {}", tier.text_class())>
                        {opportunity.kill_score.to_string()}
                    </div>
                </div>
                <div class="grid grid-cols-3 gap-2 text-xs">
                    <div class="text-center p-2 rounded bg-base-200">
                        <div class="font-mono">{format_count(opportunity.search_volume)}</div>
                        <div class="text-base-content/60">"Vol"</div>
                    </div>
                    <div class="text-center p-2 rounded bg-base-200">
                        <div class="font-mono">{format_currency(opportunity.cpc)}</div>
                        <div class="text-base-content/60">"CPC"</div>
                    </div>
                    <div class="text-center p-2 rounded bg-base-200">
                        <div class="font-mono">{format_percent(opportunity.competition)}</div>
                        <div class="text-base-content/60">"Comp"</div>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let scope = use_view_scope();
    let dashboard = RwSignal::new(DashboardView::default());

    // 挂载时加载一次
    if dashboard.try_update(DashboardView::begin_load) == Some(true) {
        let client = auth.client();
        spawn_local(async move {
            let result = client.list_opportunities().await;
            let notice = scope.deliver(|| dashboard.try_update(|d| d.finish_load(result)));
            toasts.show_opt(notice.flatten().flatten());
        });
    }

    let stats = move || dashboard.with(DashboardView::stats);

    view! {
        <div class="min-h-screen bg-base-200">
            <AppHeader />

            <main class="container mx-auto p-4 md:p-8 max-w-7xl">
                <div class="mb-8">
                    <h1 class="text-3xl md:text-4xl font-bold mb-2">
                        "Welcome back, "
                        <span class="text-primary">{move || auth.first_name().unwrap_or_default()}</span>
                    </h1>
                    <p class="text-base-content/70">"Ready to find your next killer EMD opportunity?"</p>
                </div>

                <div class="grid md:grid-cols-3 gap-6 mb-8">
                    <QuickAction
                        to=AppRoute::Research
                        title="Keyword Research"
                        desc="Find money keywords with the right volume and CPC"
                        testid="quick-action-keyword-research"
                    >
                        <Search attr:class="h-6 w-6" />
                    </QuickAction>
                    <QuickAction
                        to=AppRoute::Serp(None)
                        title="SERP Analysis"
                        desc="Analyze page one for weak competitors"
                        testid="quick-action-serp-analysis"
                    >
                        <BarChart3 attr:class="h-6 w-6" />
                    </QuickAction>
                    <QuickAction
                        to=AppRoute::Opportunities
                        title="Saved Opportunities"
                        desc="View your saved EMD opportunities"
                        testid="quick-action-saved-opportunities"
                    >
                        <Bookmark attr:class="h-6 w-6" />
                    </QuickAction>
                </div>

                <div class="stats shadow w-full bg-base-100 mb-12">
                    <div class="stat">
                        <div class="stat-title">"Saved Opportunities"</div>
                        <div class="stat-value text-primary">{move || stats().total}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Average Kill Score"</div>
                        <div class="stat-value">
                            {move || {
                                stats()
                                    .average_kill_score
                                    .map(|avg| format!("{:.0}", avg))
                                    .unwrap_or_else(|| "-".to_string())
                            }}
                        </div>
                    </div>
                    <div class="stat">
                        <div class="stat-title">"Excellent Opportunities"</div>
                        <div class="stat-value text-success">{move || stats().high_tier}</div>
                        <div class="stat-desc">"Kill Score 70+"</div>
                    </div>
                </div>

                <div class="flex items-center justify-between mb-6">
                    <h2 class="text-2xl font-semibold">"Recent Opportunities"</h2>
                    <Show when=move || dashboard.with(DashboardView::has_opportunities)>
                        <Link to=AppRoute::Opportunities class="link link-primary text-sm">"View all"</Link>
                    </Show>
                </div>

                {move || {
                    if dashboard.with(DashboardView::is_loading) {
                        view! {
                            <div class="flex items-center justify-center py-12">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                        .into_any()
                    } else if !dashboard.with(DashboardView::has_opportunities) {
                        view! {
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body items-center text-center py-12">
                                    <Zap attr:class="h-12 w-12 text-base-content/40 mb-4" />
                                    <h3 class="text-lg font-medium">"No opportunities saved yet"</h3>
                                    <p class="text-base-content/60 mb-6">
                                        "Start by researching keywords and analyzing SERPs to find your first killer EMD."
                                    </p>
                                    <Link to=AppRoute::Research class="btn btn-primary">"Start Research"</Link>
                                </div>
                            </div>
                        }
                        .into_any()
                    } else {
                        view! {
                            <div class="grid md:grid-cols-2 lg:grid-cols-3 gap-4">
                                <For
                                    each=move || dashboard.with(|d| d.recent().to_vec())
                                    key=|o| o.id.clone()
                                    children=|opportunity| view! { <RecentCard opportunity=opportunity /> }
                                />
                            </div>
                        }
                        .into_any()
                    }
                }}
            </main>
        </div>
    }
}
