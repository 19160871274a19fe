use emd_hunter::format::{GAUGE_RADIUS, KillScoreTier, gauge_circumference, gauge_offset};
use emd_hunter_shared::KillScore;
use leptos::prelude::*;

/// Kill Score 圆环仪表
///
/// 显示的数字就是后端给出的分值，不做任何换算。
#[component]
pub fn KillScoreGauge(score: KillScore) -> impl IntoView {
    let tier = KillScoreTier::of(score);
    let circumference = gauge_circumference();
    let offset = gauge_offset(score);
    let color = tier.stroke_color();

    view! {
        <div class="relative w-48 h-48 mx-auto" data-testid="kill-score-gauge">
            <svg class="w-full h-full -rotate-90" viewBox="0 0 200 200">
                <circle
                    cx="100"
                    cy="100"
                    r=GAUGE_RADIUS
                    fill="none"
                    stroke="currentColor"
                    stroke-width="12"
                    class="text-base-300"
                />
                <circle
                    cx="100"
                    cy="100"
                    r=GAUGE_RADIUS
                    fill="none"
                    stroke=color
                    stroke-width="12"
                    stroke-linecap="round"
                    stroke-dasharray=circumference
                    stroke-dashoffset=offset
                    style=format!("filter: drop-shadow(0 0 8px {}); transition: stroke-dashoffset 1s ease-out", color)
                />
            </svg>
            <div class="absolute inset-0 flex flex-col items-center justify-center">
                <div class=format!("text-5xl font-bold font-mono {}", tier.text_class())>
                    {score.to_string()}
                </div>
                <div class="text-xs text-base-content/60 mt-1">"out of 100"</div>
            </div>
        </div>
        <div class="text-center mt-4">
            <span
                class="text-sm font-medium px-3 py-1 rounded-full"
                style=format!("background-color: {}20; color: {}", color, color)
            >
                {tier.label()}
            </span>
        </div>
    }
}
