//! Dashboard Page
//!
//! Due counts, streak and the last days of activity.

use leptos::*;
use leptos_router::*;

use kioku::stats::{bar_percent, summarize};
use kioku::Dashboard as DashboardData;

use crate::api;
use crate::components::{Loading, Panel};
use crate::state::GlobalState;

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let (data, set_data) = create_signal(None::<DashboardData>);

    // Fetch on mount
    create_effect(move |_| {
        spawn_local(async move {
            state.loading.set(true);
            match api::fetch_dashboard().await {
                Ok(dashboard) => set_data.set(Some(dashboard)),
                Err(e) => {
                    web_sys::console::error_1(&format!("Failed to fetch dashboard: {}", e).into());
                    state.show_error(&e);
                }
            }
            state.loading.set(false);
        });
    });

    let greeting = move || {
        state
            .user
            .get()
            .map(|u| format!("おかえり, {}", u.name))
            .unwrap_or_else(|| "おかえり".to_string())
    };

    view! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">{greeting}</h1>
                    <p class="text-gray-500 mt-1">"Your study at a glance"</p>
                </div>
                <A
                    href="/review"
                    class="px-6 py-3 bg-primary-600 hover:bg-primary-700 text-white rounded-lg font-medium transition-colors"
                >
                    "Start review"
                </A>
            </div>

            {move || match data.get() {
                None => view! { <Loading /> }.into_view(),
                Some(dashboard) => view! { <Overview dashboard=dashboard /> }.into_view(),
            }}
        </div>
    }
}

#[component]
fn Overview(dashboard: DashboardData) -> impl IntoView {
    let summary = summarize(&dashboard.chart_data);
    let days = dashboard.chart_data.clone();

    view! {
        <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
            <StatTile label="Due" value=dashboard.due_count.to_string() accent=true />
            <StatTile label="New" value=dashboard.new_count.to_string() />
            <StatTile
                label="Learned"
                value=format!("{} / {}", dashboard.learned_cards, dashboard.total_cards)
            />
            <StatTile label="Streak" value=format!("{} 🔥", summary.streak) />
        </div>

        <Panel title="This week">
            {if days.is_empty() {
                view! { <p class="text-gray-500 text-sm">"No activity yet"</p> }.into_view()
            } else {
                view! {
                    <div class="flex items-end justify-between h-40 space-x-2">
                        {days.iter().map(|day| {
                            let height = bar_percent(day, &days).max(2);
                            let label = day.date.format("%a").to_string();
                            let title = format!("{} reviews, {} min", day.reviews, day.focus_minutes);
                            view! {
                                <div class="flex-1 flex flex-col items-center h-full justify-end" title=title>
                                    <div
                                        class=if day.is_active() { "w-full bg-primary-500 rounded-t" } else { "w-full bg-gray-200 dark:bg-gray-700 rounded-t" }
                                        style=format!("height: {}%", height)
                                    />
                                    <span class="text-xs text-gray-500 mt-2">{label}</span>
                                </div>
                            }
                        }).collect_view()}
                    </div>
                }.into_view()
            }}

            <div class="mt-6 grid grid-cols-3 gap-4 text-sm">
                <div>
                    <div class="text-gray-500">"Reviews"</div>
                    <div class="font-semibold">{summary.reviews}</div>
                </div>
                <div>
                    <div class="text-gray-500">"Focus"</div>
                    <div class="font-semibold">{format!("{} min", summary.focus_minutes)}</div>
                </div>
                <div>
                    <div class="text-gray-500">"Best day"</div>
                    <div class="font-semibold">
                        {summary.best_day.map(|d| d.format("%A").to_string()).unwrap_or_else(|| "-".to_string())}
                    </div>
                </div>
            </div>
        </Panel>
    }
}

#[component]
fn StatTile(
    label: &'static str,
    #[prop(into)]
    value: String,
    #[prop(optional)]
    accent: bool,
) -> impl IntoView {
    let value_class = if accent {
        "text-3xl font-bold text-primary-600"
    } else {
        "text-3xl font-bold"
    };

    view! {
        <div class="bg-white dark:bg-gray-800 rounded-xl p-4 shadow-sm">
            <div class="text-sm text-gray-500">{label}</div>
            <div class=value_class>{value}</div>
        </div>
    }
}
