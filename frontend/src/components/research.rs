use emd_hunter::format::{CompetitionLevel, CpcTier, format_count, format_currency, format_percent};
use emd_hunter::views::{ResearchView, SliderBounds};
use emd_hunter::{Notice, Submission};
use emd_hunter_shared::KeywordResult;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::header::AppHeader;
use crate::components::icons::{AlertTriangle, ArrowRight, Search};
use crate::components::toast::use_toasts;
use crate::use_view_scope;
use crate::web::router::use_router;

/// 滑块的输入值；无法解析时交给 [`SliderBounds::snap`] 回落到最小值
fn slider_value(ev: &leptos::ev::Event) -> f64 {
    event_target_value(ev).parse().unwrap_or(f64::NAN)
}

#[component]
fn KeywordRow(index: usize, keyword: KeywordResult) -> impl IntoView {
    let router = use_router();
    let cpc = CpcTier::of(keyword.cpc);
    let competition = CompetitionLevel::of(keyword.competition);
    let route = ResearchView::analyze_route(&keyword);

    view! {
        <tr class="hover">
            <td><span class="font-mono text-sm">{keyword.keyword.clone()}</span></td>
            <td class="text-center">
                <span class="font-mono text-primary">{format_count(keyword.search_volume)}</span>
            </td>
            <td class="text-center">
                <span class="font-mono">{format_currency(keyword.cpc)}</span>
            </td>
            <td class="text-center">
                <span class=format!("badge badge-sm {}", cpc.badge_class())>{cpc.label()}</span>
            </td>
            <td class="text-center">
                <span class=format!("font-mono {}", competition.text_class())>
                    {format_percent(keyword.competition)}
                </span>
            </td>
            <td class="text-center">
                <button
                    class="btn btn-outline btn-primary btn-sm"
                    on:click=move |_| router.navigate_to(route.clone())
                    data-testid=format!("analyze-{}", index)
                >
                    "Analyze SERP"
                </button>
            </td>
        </tr>
    }
}

#[component]
pub fn ResearchPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let scope = use_view_scope();
    let research = RwSignal::new(ResearchView::default());
    let (show_filters, set_show_filters) = signal(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        match research.try_update(ResearchView::begin_search) {
            Some(Submission::Ready(params)) => {
                let client = auth.client();
                let scope = scope.clone();
                spawn_local(async move {
                    let result = client.search_keywords(&params).await;
                    let notice = scope.deliver(|| research.try_update(|r| r.finish_search(result)));
                    toasts.show_opt(notice.flatten().flatten());
                });
            }
            Some(Submission::Rejected(err)) => toasts.show(Notice::from_error(&err)),
            _ => {}
        }
    };

    let is_searching = move || research.with(ResearchView::is_searching);
    let param = move |f: fn(&ResearchView) -> String| research.with(f);

    view! {
        <div class="min-h-screen bg-base-200" data-testid="keyword-research">
            <AppHeader />

            <main class="container mx-auto p-4 md:p-8 max-w-7xl space-y-8">
                <div>
                    <h1 class="text-3xl font-bold mb-2">
                        "Keyword " <span class="text-primary">"Research"</span>
                    </h1>
                    <p class="text-base-content/70">
                        "Find money keywords with the right volume, CPC, and competition levels."
                    </p>
                </div>

                <form on:submit=on_submit class="card bg-base-100 shadow-xl">
                    <div class="card-body space-y-4">
                        <div class="flex flex-col md:flex-row gap-4">
                            <label class="input input-bordered flex items-center gap-2 flex-1">
                                <Search attr:class="h-4 w-4 opacity-50" />
                                <input
                                    type="text"
                                    class="grow"
                                    placeholder="Enter seed keyword (e.g., plumber phoenix, roofing dallas)"
                                    on:input=move |ev| research.update(|r| r.set_seed(&event_target_value(&ev)))
                                    prop:value=move || param(|r| r.params.seed_keyword.clone())
                                    data-testid="seed-keyword-input"
                                />
                            </label>
                            <button
                                type="button"
                                class="btn btn-outline"
                                on:click=move |_| set_show_filters.update(|v| *v = !*v)
                            >
                                "Filters"
                            </button>
                            <button type="submit" class="btn btn-primary" disabled=is_searching data-testid="search-btn">
                                {move || if is_searching() {
                                    view! { <span class="loading loading-spinner"></span> "Searching..." }.into_any()
                                } else {
                                    view! { "Search" <ArrowRight attr:class="h-4 w-4" /> }.into_any()
                                }}
                            </button>
                        </div>

                        <Show when=move || show_filters.get()>
                            <div class="grid md:grid-cols-3 gap-6 pt-4 border-t border-base-300">
                                <div class="space-y-2">
                                    <span class="label-text font-medium">"Search Volume Range"</span>
                                    <input
                                        type="range"
                                        class="range range-primary range-sm"
                                        min=SliderBounds::VOLUME.min
                                        max=SliderBounds::VOLUME.max
                                        step=SliderBounds::VOLUME.step
                                        prop:value=move || param(|r| r.params.min_volume.to_string())
                                        on:input=move |ev| research.update(|r| r.set_min_volume(slider_value(&ev)))
                                    />
                                    <input
                                        type="range"
                                        class="range range-primary range-sm"
                                        min=SliderBounds::VOLUME.min
                                        max=SliderBounds::VOLUME.max
                                        step=SliderBounds::VOLUME.step
                                        prop:value=move || param(|r| r.params.max_volume.to_string())
                                        on:input=move |ev| research.update(|r| r.set_max_volume(slider_value(&ev)))
                                    />
                                    <div class="flex justify-between text-xs text-base-content/60">
                                        <span>{move || param(|r| r.params.min_volume.to_string())}</span>
                                        <span>{move || param(|r| r.params.max_volume.to_string())}</span>
                                    </div>
                                </div>

                                <div class="space-y-2">
                                    <span class="label-text font-medium">"Minimum CPC"</span>
                                    <input
                                        type="range"
                                        class="range range-primary range-sm"
                                        min=SliderBounds::MIN_CPC.min
                                        max=SliderBounds::MIN_CPC.max
                                        step=SliderBounds::MIN_CPC.step
                                        prop:value=move || param(|r| r.params.min_cpc.to_string())
                                        on:input=move |ev| research.update(|r| r.set_min_cpc(slider_value(&ev)))
                                    />
                                    <div class="flex justify-between text-xs text-base-content/60">
                                        <span>{move || param(|r| format!("${}", r.params.min_cpc))}</span>
                                        <span>"$100+"</span>
                                    </div>
                                </div>

                                <div class="space-y-2">
                                    <span class="label-text font-medium">"Results Limit"</span>
                                    <input
                                        type="range"
                                        class="range range-primary range-sm"
                                        min=SliderBounds::LIMIT.min
                                        max=SliderBounds::LIMIT.max
                                        step=SliderBounds::LIMIT.step
                                        prop:value=move || param(|r| r.params.limit.to_string())
                                        on:input=move |ev| research.update(|r| r.set_limit(slider_value(&ev)))
                                    />
                                    <div class="text-xs text-base-content/60">
                                        {move || param(|r| format!("{} keywords", r.params.limit))}
                                    </div>
                                </div>
                            </div>
                        </Show>
                    </div>
                </form>

                <Show when=move || research.with(ResearchView::is_demo_data)>
                    <div role="alert" class="alert alert-warning">
                        <AlertTriangle attr:class="h-5 w-5" />
                        <span>"Showing demo data. Live keyword data is not configured on the server."</span>
                    </div>
                </Show>

                <Show
                    when=move || research.with(|r| !r.keywords.is_empty())
                    fallback=move || view! {
                        <Show when=move || !is_searching()>
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body items-center text-center py-12">
                                    <Search attr:class="h-12 w-12 text-base-content/40 mb-4" />
                                    <h3 class="text-lg font-medium">"Start your keyword research"</h3>
                                    <p class="text-base-content/60 max-w-md">
                                        "Enter a seed keyword like \"plumber phoenix\" or \"roofing dallas\" to find money keywords "
                                        "with the right volume and CPC for EMD opportunities."
                                    </p>
                                </div>
                            </div>
                        </Show>
                    }
                >
                    <h2 class="text-xl font-semibold">
                        "Found "
                        <span class="text-primary">{move || research.with(|r| r.keywords.len())}</span>
                        " opportunities"
                    </h2>
                    <div class="card bg-base-100 shadow-xl overflow-x-auto">
                        <table class="table table-zebra w-full" data-testid="keywords-table">
                            <thead>
                                <tr>
                                    <th>"Keyword"</th>
                                    <th class="text-center">"Volume"</th>
                                    <th class="text-center">"CPC"</th>
                                    <th class="text-center">"Type"</th>
                                    <th class="text-center">"Competition"</th>
                                    <th class="text-center">"Action"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || {
                                        research.with(|r| r.keywords.iter().cloned().enumerate().collect::<Vec<_>>())
                                    }
                                    key=|(i, kw)| (*i, kw.keyword.clone())
                                    children=|(index, keyword)| view! { <KeywordRow index=index keyword=keyword /> }
                                />
                            </tbody>
                        </table>
                    </div>
                </Show>
            </main>
        </div>
    }
}
