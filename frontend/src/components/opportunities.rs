use emd_hunter::format::{KillScoreTier, format_count, format_currency, format_percent, format_saved_date};
use emd_hunter::views::OpportunitiesView;
use emd_hunter::{AppRoute, Submission};
use emd_hunter_shared::Opportunity;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::header::AppHeader;
use crate::components::icons::{Bookmark, ExternalLink, Trash2};
use crate::components::toast::use_toasts;
use crate::use_view_scope;
use crate::web::router::{Link, use_router};

#[component]
fn OpportunityCard(
    opportunity: Opportunity,
    list: RwSignal<OpportunitiesView>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let router = use_router();
    let tier = KillScoreTier::of(opportunity.kill_score);
    let id = opportunity.id.clone();
    let is_deleting = {
        let id = id.clone();
        move || list.with(|l| l.is_deleting(&id))
    };
    let serp_route = AppRoute::serp_for(&opportunity.keyword);

    view! {
        <div class=format!("card bg-base-100 shadow-xl border {}", tier.card_class())>
            <div class="card-body p-5">
                <div class="flex items-start justify-between mb-4">
                    <div>
                        <h3 class="font-mono text-lg text-primary mb-1">{opportunity.keyword.clone()}</h3>
                        <p class="text-xs text-base-content/60">{opportunity.location.clone()}</p>
                    </div>
                    <div class="text-right">
                        <div class=format!("text-3xl font-bold font-mono {}", tier.text_class())>
                            {opportunity.kill_score.to_string()}
                        </div>
                        <div class="text-xs text-base-content/60">"Kill Score"</div>
                    </div>
                </div>

                <div class="grid grid-cols-3 gap-3 mb-4">
                    <div class="text-center p-2 rounded bg-base-200">
                        <div class="font-mono text-sm">{format_count(opportunity.search_volume)}</div>
                        <div class="text-xs text-base-content/60">"Volume"</div>
                    </div>
                    <div class="text-center p-2 rounded bg-base-200">
                        <div class="font-mono text-sm">{format_currency(opportunity.cpc)}</div>
                        <div class="text-xs text-base-content/60">"CPC"</div>
                    </div>
                    <div class="text-center p-2 rounded bg-base-200">
                        <div class="font-mono text-sm">{format_percent(opportunity.competition)}</div>
                        <div class="text-xs text-base-content/60">"Comp"</div>
                    </div>
                </div>

                {opportunity.ai_analysis.clone().map(|text| view! {
                    <div class="mb-4 p-3 rounded bg-secondary/10 border border-secondary/20">
                        <p class="text-xs text-base-content/70 line-clamp-3">{text}</p>
                    </div>
                })}

                <div class="flex items-center gap-2">
                    <button
                        class="btn btn-outline btn-primary btn-sm flex-1"
                        on:click=move |_| router.navigate_to(serp_route.clone())
                    >
                        <ExternalLink attr:class="h-3 w-3" />
                        "View SERP"
                    </button>
                    <button
                        class="btn btn-outline btn-error btn-sm"
                        disabled=is_deleting.clone()
                        on:click=move |_| on_delete.run(id.clone())
                        data-testid="delete-opportunity-btn"
                    >
                        {move || if is_deleting() {
                            view! { <span class="loading loading-spinner loading-xs"></span> }.into_any()
                        } else {
                            view! { <Trash2 attr:class="h-4 w-4" /> }.into_any()
                        }}
                    </button>
                </div>

                <div class="mt-3 text-xs text-base-content/60">
                    {format!("Saved {}", format_saved_date(&opportunity.created_at))}
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn OpportunitiesPage() -> impl IntoView {
    let auth = use_auth();
    let toasts = use_toasts();
    let scope = use_view_scope();
    let list = RwSignal::new(OpportunitiesView::default());

    if list.try_update(OpportunitiesView::begin_load) == Some(true) {
        let client = auth.client();
        let scope = scope.clone();
        spawn_local(async move {
            let result = client.list_opportunities().await;
            let notice = scope.deliver(|| list.try_update(|l| l.finish_load(result)));
            toasts.show_opt(notice.flatten().flatten());
        });
    }

    let on_delete = Callback::new(move |id: String| {
        let Some(Submission::Ready(id)) = list.try_update(|l| l.begin_delete(&id)) else {
            return;
        };
        let client = auth.client();
        let scope = scope.clone();
        spawn_local(async move {
            let result = client.delete_opportunity(&id).await;
            let notice = scope.deliver(|| list.try_update(|l| l.finish_delete(&id, &result)));
            toasts.show_opt(notice.flatten());
        });
    });

    view! {
        <div class="min-h-screen bg-base-200" data-testid="saved-opportunities">
            <AppHeader />

            <main class="container mx-auto p-4 md:p-8 max-w-7xl space-y-8">
                <div>
                    <h1 class="text-3xl font-bold mb-2">
                        "Saved " <span class="text-primary">"Opportunities"</span>
                    </h1>
                    <p class="text-base-content/70">
                        "Your saved EMD opportunities with Kill Scores and analysis."
                    </p>
                </div>

                {move || {
                    if list.with(OpportunitiesView::is_loading) {
                        view! {
                            <div class="flex items-center justify-center py-20">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                        .into_any()
                    } else if list.with(OpportunitiesView::is_empty) {
                        view! {
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body items-center text-center py-12">
                                    <Bookmark attr:class="h-12 w-12 text-base-content/40 mb-4" />
                                    <h3 class="text-lg font-medium">"No saved opportunities yet"</h3>
                                    <p class="text-base-content/60 mb-6 max-w-md">
                                        "Research keywords and analyze SERPs to find opportunities worth saving."
                                    </p>
                                    <Link to=AppRoute::Research class="btn btn-primary">"Start Research"</Link>
                                </div>
                            </div>
                        }
                        .into_any()
                    } else {
                        view! {
                            <div class="grid md:grid-cols-2 lg:grid-cols-3 gap-6">
                                <For
                                    each=move || list.with(|l| l.opportunities.clone())
                                    key=|o| o.id.clone()
                                    children=move |opportunity| view! {
                                        <OpportunityCard opportunity=opportunity list=list on_delete=on_delete />
                                    }
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
