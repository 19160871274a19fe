use emd_hunter::AppRoute;
use leptos::prelude::*;

use crate::auth::use_auth;
use crate::components::icons::{LogOut, Target, User};
use crate::web::router::{Link, use_router};

/// 已登录页面的顶部导航
#[component]
pub fn AppHeader() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let on_logout = move |_| {
        auth.logout();
        router.navigate_to(AppRoute::Landing);
    };

    view! {
        <div class="navbar bg-base-100 shadow-xl sticky top-0 z-40 px-4 md:px-8">
            <div class="flex-1">
                <Link to=AppRoute::Dashboard class="btn btn-ghost text-xl gap-2">
                    <Target attr:class="h-6 w-6 text-primary" />
                    "EMD Hunter"
                </Link>
            </div>
            <div class="hidden md:flex flex-none gap-2">
                <Link to=AppRoute::Research class="btn btn-ghost btn-sm">"Research"</Link>
                <Link to=AppRoute::Serp(None) class="btn btn-ghost btn-sm">"SERP Analysis"</Link>
                <Link to=AppRoute::Opportunities class="btn btn-ghost btn-sm">"Saved"</Link>
            </div>
            <div class="flex-none gap-2 ml-4">
                <span class="flex items-center gap-2 text-sm text-base-content/70">
                    <User attr:class="h-4 w-4" />
                    {move || auth.user_name().unwrap_or_default()}
                </span>
                <button on:click=on_logout class="btn btn-ghost btn-sm" data-testid="logout-btn">
                    <LogOut attr:class="h-4 w-4" />
                </button>
            </div>
        </div>
    }
}
