use emd_hunter::Notice;
use leptos::prelude::*;

const TOAST_TTL_SECS: u64 = 4;

/// 全局提示上下文
///
/// 只保留最新的一条提示；计时器只清除它自己那一条。
#[derive(Clone, Copy)]
pub struct Toasts {
    current: RwSignal<Option<(u64, Notice)>>,
    next_id: StoredValue<u64>,
}

impl Toasts {
    pub fn show(&self, notice: Notice) {
        let id = self.next_id.get_value() + 1;
        self.next_id.set_value(id);
        self.current.set(Some((id, notice)));

        let current = self.current;
        set_timeout(
            move || {
                if current.with_untracked(|c| c.as_ref().is_some_and(|(cid, _)| *cid == id)) {
                    current.set(None);
                }
            },
            std::time::Duration::from_secs(TOAST_TTL_SECS),
        );
    }

    pub fn show_opt(&self, notice: Option<Notice>) {
        if let Some(notice) = notice {
            self.show(notice);
        }
    }
}

pub fn provide_toasts() -> Toasts {
    let toasts = Toasts {
        current: RwSignal::new(None),
        next_id: StoredValue::new(0),
    };
    provide_context(toasts);
    toasts
}

pub fn use_toasts() -> Toasts {
    use_context::<Toasts>().expect("Toasts should be provided")
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = use_toasts();
    let current = toasts.current;

    view! {
        <Show when=move || current.with(Option::is_some)>
            <div class="toast toast-top toast-end z-50">
                <div
                    class=move || {
                        current
                            .with(|c| c.as_ref().map(|(_, n)| n.level.css_class()))
                            .map(|level| format!("alert {} shadow-lg", level))
                            .unwrap_or_else(|| "alert".to_string())
                    }
                    on:click=move |_| current.set(None)
                >
                    <span>
                        {move || current.with(|c| c.as_ref().map(|(_, n)| n.message.clone()))}
                    </span>
                </div>
            </div>
        </Show>
    }
}
