use emd_hunter::views::RegisterView;
use emd_hunter::{AppRoute, Notice, Submission};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::icons::{ArrowLeft, Target};
use crate::components::toast::use_toasts;
use crate::use_view_scope;
use crate::web::router::{Link, use_router};

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let toasts = use_toasts();
    let scope = use_view_scope();
    let form = RwSignal::new(RegisterView::default());

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();

        match form.try_update(RegisterView::begin_submit) {
            Some(Submission::Ready(reg)) => {
                let pending = auth.store().register(&reg.email, &reg.password, &reg.name);
                let scope = scope.clone();
                spawn_local(async move {
                    let result = pending.await;
                    let Some(notice) = scope.deliver(|| form.try_update(|f| f.finish_submit(&result))) else {
                        return;
                    };
                    toasts.show_opt(notice);
                    if result.is_ok() {
                        router.navigate_to(AppRoute::auth_success_redirect());
                    }
                });
            }
            Some(Submission::Rejected(err)) => toasts.show(Notice::from_error(&err)),
            _ => {}
        }
    };

    let is_submitting = move || form.with(RegisterView::is_submitting);

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <Link to=AppRoute::Landing class="self-start flex items-center gap-2 text-sm text-base-content/60 hover:text-base-content">
                    <ArrowLeft attr:class="h-4 w-4" />
                    "Back to home"
                </Link>

                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Target attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Create your account"</h1>
                        <p class="text-base-content/70">
                            "Discover EMD opportunities that others miss"
                        </p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <div class="form-control">
                            <label class="label" for="name">
                                <span class="label-text">"Name"</span>
                            </label>
                            <input
                                id="name"
                                type="text"
                                placeholder="John Hunter"
                                on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.name.clone())
                                class="input input-bordered"
                                data-testid="register-name-input"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="hunter@example.com"
                                on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.email.clone())
                                class="input input-bordered"
                                data-testid="register-email-input"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                minlength="6"
                                on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.password.clone())
                                class="input input-bordered"
                                data-testid="register-password-input"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=is_submitting data-testid="register-submit-btn">
                                {move || if is_submitting() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Create Account".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm text-base-content/60 mt-4">
                            "Already have an account? "
                            <Link to=AppRoute::Login class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
