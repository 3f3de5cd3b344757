use dioxus::prelude::*;
use quiz_core::gate::SIGN_IN_AREA_ID;
use quiz_core::model::SignInRecord;

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::signed_in_label;

/// Current sign-in record, kept in step with the sign-in service's broadcasts.
pub type SignInState = Signal<Option<SignInRecord>>;

/// Mirror the sign-in service into a signal so views re-render on every
/// sign-in and sign-out.
pub fn use_sign_in_state() -> SignInState {
    let ctx = use_context::<AppContext>();
    let sign_in = ctx.sign_in();
    let mut state = use_signal(|| sign_in.current());
    use_future(move || {
        let mut rx = sign_in.subscribe();
        async move {
            while rx.changed().await.is_ok() {
                let record = rx.borrow_and_update().clone();
                state.set(record);
            }
        }
    });
    state
}

#[component]
pub fn SignInArea() -> Element {
    let ctx = use_context::<AppContext>();
    let record = use_context::<SignInState>();
    let mut credential = use_signal(String::new);
    let mut error = use_signal(|| None::<ViewError>);

    let on_sign_in = {
        let sign_in = ctx.sign_in();
        move |_: MouseEvent| {
            let sign_in = sign_in.clone();
            let token = credential();
            spawn(async move {
                match sign_in.handle_credential(&token).await {
                    Ok(_) => {
                        credential.set(String::new());
                        error.set(None);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "sign-in failed");
                        error.set(Some(ViewError::Unknown));
                    }
                }
            });
        }
    };
    let on_sign_out = {
        let sign_in = ctx.sign_in();
        move |_: MouseEvent| {
            let sign_in = sign_in.clone();
            spawn(async move {
                if let Err(err) = sign_in.sign_out().await {
                    tracing::warn!(error = %err, "sign-out failed");
                    error.set(Some(ViewError::Unknown));
                }
            });
        }
    };

    let current = record.read().clone();

    rsx! {
        div { class: "user-area", id: SIGN_IN_AREA_ID, tabindex: "-1",
            if let Some(record) = current {
                span { class: "user-area__name", "{signed_in_label(&record)}" }
                button {
                    class: "user-area__sign-out",
                    id: "sign-out",
                    r#type: "button",
                    onclick: on_sign_out,
                    "Sign out"
                }
            } else {
                input {
                    class: "user-area__credential",
                    id: "sign-in-credential",
                    r#type: "text",
                    placeholder: "Paste identity token",
                    value: "{credential}",
                    oninput: move |evt: FormEvent| credential.set(evt.value()),
                }
                button {
                    class: "user-area__sign-in",
                    id: "sign-in",
                    r#type: "button",
                    onclick: on_sign_in,
                    "Sign in"
                }
            }
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
        }
    }
}
