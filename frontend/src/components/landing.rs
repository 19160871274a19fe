use emd_hunter::AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::icons::{ArrowRight, BarChart3, Search, Sparkles, Target};
use crate::use_view_scope;
use crate::web::router::Link;

const STEPS: [(&str, &str, &str); 4] = [
    (
        "01",
        "Enter your niche or location",
        "Start with a seed keyword like 'plumber phoenix' or 'roofing dallas'",
    ),
    (
        "02",
        "Filter for money keywords",
        "Automatically filter by volume (200-1200), CPC ($10-$50+), and competition",
    ),
    (
        "03",
        "Analyze SERP weakness",
        "See which page one results are directories or weak competitors",
    ),
    (
        "04",
        "Get your Kill Score",
        "Our algorithm tells you exactly how viable each EMD opportunity is",
    ),
];

#[component]
fn Feature(title: &'static str, description: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="p-3 bg-primary/10 rounded-xl text-primary w-fit">{children()}</div>
                <h3 class="card-title text-lg">{title}</h3>
                <p class="text-sm text-base-content/60">{description}</p>
            </div>
        </div>
    }
}

/// 后端状态徽标
///
/// 挂载时请求一次 `/api/health`，失败不提示，只显示离线。
#[component]
fn BackendStatus() -> impl IntoView {
    let auth = use_auth();
    let scope = use_view_scope();
    let (healthy, set_healthy) = signal(Option::<bool>::None);

    let client = auth.client();
    spawn_local(async move {
        let status = client.health().await;
        if let Err(e) = &status {
            web_sys::console::warn_1(&format!("[Landing] Backend unreachable: {}", e).into());
        }
        let ok = status.as_ref().is_ok_and(|s| s.is_healthy());
        scope.deliver(|| set_healthy.set(Some(ok)));
    });

    move || match healthy.get() {
        None => view! { <span class="badge badge-ghost gap-2">"Checking backend..."</span> }.into_any(),
        Some(true) => view! {
            <span class="badge badge-success badge-outline gap-2" data-testid="backend-status">
                "Backend online"
            </span>
        }
        .into_any(),
        Some(false) => view! {
            <span class="badge badge-error badge-outline gap-2" data-testid="backend-status">
                "Backend offline"
            </span>
        }
        .into_any(),
    }
}

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200">
            <div class="navbar bg-base-100 shadow-xl px-4 md:px-8">
                <div class="flex-1 gap-2">
                    <Target attr:class="h-6 w-6 text-primary" />
                    <span class="text-xl font-bold">"EMD Hunter"</span>
                </div>
                <div class="flex-none gap-2">
                    <Link to=AppRoute::Login class="btn btn-ghost btn-sm">"Sign In"</Link>
                    <Link to=AppRoute::Register class="btn btn-primary btn-sm">"Get Started"</Link>
                </div>
            </div>

            <section class="hero py-24">
                <div class="hero-content text-center flex-col max-w-3xl">
                    <BackendStatus />
                    <h1 class="text-5xl md:text-7xl font-bold leading-tight">
                        "Hunt " <span class="text-primary">"Killer"</span> " EMD Opportunities"
                    </h1>
                    <p class="text-lg text-base-content/70">
                        "Discover exact match domain opportunities that can actually rank and make money. "
                        "Even in markets people swear are \"too competitive.\""
                    </p>
                    <div class="flex flex-col sm:flex-row gap-4 mt-4">
                        <Link to=AppRoute::Register class="btn btn-primary btn-lg gap-2">
                            "Start Hunting Free"
                            <ArrowRight attr:class="h-5 w-5" />
                        </Link>
                        <Link to=AppRoute::Login class="btn btn-outline btn-lg">"Sign In"</Link>
                    </div>
                </div>
            </section>

            <section class="px-6 py-16 max-w-6xl mx-auto">
                <div class="text-center mb-12">
                    <h2 class="text-3xl md:text-5xl font-semibold mb-4">
                        "Find the " <span class="text-primary">"chinks in the armor"</span>
                    </h2>
                    <p class="text-base-content/60 text-lg">
                        "Page one might look strong, but our analysis reveals which results are actually replaceable."
                    </p>
                </div>
                <div class="grid md:grid-cols-2 lg:grid-cols-4 gap-6">
                    <Feature
                        title="Keyword Discovery"
                        description="Find hidden keyword opportunities with real search volume, CPC, and competition data."
                    >
                        <Search attr:class="h-6 w-6" />
                    </Feature>
                    <Feature
                        title="SERP Analysis"
                        description="Identify weak competitors and directory placeholders on page one of Google."
                    >
                        <BarChart3 attr:class="h-6 w-6" />
                    </Feature>
                    <Feature
                        title="Kill Score"
                        description="Proprietary scoring system (0-100) that reveals how easy a keyword is to dominate."
                    >
                        <Target attr:class="h-6 w-6" />
                    </Feature>
                    <Feature
                        title="AI Analysis"
                        description="Claude-powered insights that tell you exactly why an opportunity is worth pursuing."
                    >
                        <Sparkles attr:class="h-6 w-6" />
                    </Feature>
                </div>
            </section>

            <section class="px-6 py-16 max-w-6xl mx-auto">
                <div class="text-center mb-12">
                    <h2 class="text-3xl md:text-5xl font-semibold mb-4">"How EMD Hunter Works"</h2>
                    <p class="text-base-content/60 text-lg">
                        "Four steps to finding your next money-making domain opportunity."
                    </p>
                </div>
                <div class="grid md:grid-cols-2 lg:grid-cols-4 gap-6">
                    {STEPS
                        .iter()
                        .map(|(num, title, desc)| view! {
                            <div class="p-6">
                                <div class="text-6xl font-bold text-primary/20 font-mono mb-4">{*num}</div>
                                <h3 class="text-lg font-semibold mb-2">{*title}</h3>
                                <p class="text-sm text-base-content/60">{*desc}</p>
                            </div>
                        })
                        .collect_view()}
                </div>
            </section>

            <section class="px-6 py-16 text-center">
                <h2 class="text-3xl md:text-4xl font-semibold mb-4">"Ready to find your killer EMD?"</h2>
                <p class="text-base-content/60 mb-8">
                    "Stop guessing. Start finding real opportunities with data-driven analysis."
                </p>
                <Link to=AppRoute::Register class="btn btn-primary btn-lg gap-2">
                    "Start Hunting Now"
                    <ArrowRight attr:class="h-5 w-5" />
                </Link>
            </section>

            <footer class="footer footer-center p-8 text-base-content/60">
                <p>"EMD Hunter. Find your next money-making domain."</p>
            </footer>
        </div>
    }
}
