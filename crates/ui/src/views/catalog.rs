use std::time::Duration;

use dioxus::document::eval;
use dioxus::prelude::*;
use dioxus_router::use_navigator;
use quiz_core::gate::{CatalogItem, GateDecision, LockedNotice};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{SignInState, ViewState, view_state_from_resource};
use crate::vm::{catalog_items, item_class, load_catalog};

const NOTICE_DURATION: Duration = Duration::from_secs(3);

fn focus_script(target: &str) -> String {
    format!(
        r#"(function() {{
            const el = document.getElementById({target:?});
            if (!el) return;
            el.scrollIntoView({{ behavior: "smooth", block: "center" }});
            el.focus();
        }})();"#
    )
}

fn show_locked_notice(mut notice: Signal<Option<LockedNotice>>, locked: LockedNotice) {
    notice.set(Some(locked));
    let _ = eval(&focus_script(locked.focus_target));
    spawn(async move {
        tokio::time::sleep(NOTICE_DURATION).await;
        notice.set(None);
    });
}

#[component]
pub fn CatalogView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let record = use_context::<SignInState>();
    let notice = use_signal(|| None::<LockedNotice>);
    let gate = ctx.gate();

    let launch_entry = use_hook(|| ctx.take_entry_on_launch());
    use_effect(move || {
        if let Some(entry) = launch_entry.as_ref() {
            navigator.replace(Route::for_entry(entry));
        }
    });

    let catalog = ctx.catalog();
    let resource = use_resource(move || {
        let catalog = catalog.clone();
        async move { load_catalog(&catalog).await }
    });
    let state = view_state_from_resource(&resource);
    let signed_in = record.read().is_some();
    let items = match &state {
        ViewState::Ready(names) => catalog_items(gate, names, signed_in),
        _ => Vec::new(),
    };

    rsx! {
        div { class: "page catalog-page",
            h2 { "Tests" }
            if let Some(locked) = notice() {
                div { class: "toast", role: "status", "{locked.message}" }
            }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
                ViewState::Ready(_) => rsx! {
                    if items.is_empty() {
                        p { class: "empty", "No tests published yet." }
                    } else {
                    ul { class: "test-list",
                        {items.into_iter().map(|item| {
                            let class = item_class(&item);
                            let CatalogItem { name, label, index, locked } = item;
                            let title = if locked { "Sign in to unlock" } else { "" };
                            rsx! {
                                li { key: "{name}",
                                    button {
                                        class,
                                        r#type: "button",
                                        title,
                                        aria_disabled: "{locked}",
                                        onclick: move |evt: MouseEvent| {
                                            match gate.intercept(signed_in, index) {
                                                GateDecision::Open => {
                                                    navigator.push(Route::Test { test: name.to_string() });
                                                }
                                                GateDecision::Blocked(blocked) => {
                                                    evt.stop_propagation();
                                                    evt.prevent_default();
                                                    show_locked_notice(notice, blocked);
                                                }
                                            }
                                        },
                                        "{label}"
                                    }
                                }
                            }
                        })}
                    }
                    }
                },
            }
        }
    }
}
