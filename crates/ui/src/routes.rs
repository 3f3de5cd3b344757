use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};
use services::EntryRequest;

use crate::views::{CatalogView, QuestionView, SignInArea, TestView, use_sign_in_state};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", CatalogView)] Catalog {},
        #[route("/quiz/:test", TestView)] Test { test: String },
        #[route("/question/:reference", QuestionView)] Question { reference: String },
}

impl Route {
    /// Route that opens what an entry request names.
    #[must_use]
    pub fn for_entry(entry: &EntryRequest) -> Self {
        match entry {
            EntryRequest::Test(name) => Route::Test {
                test: name.to_string(),
            },
            EntryRequest::Question(reference) => Route::Question {
                reference: reference.clone(),
            },
        }
    }
}

#[component]
fn Layout() -> Element {
    let record = use_sign_in_state();
    use_context_provider(|| record);

    rsx! {
        div { class: "app",
            header { class: "topbar",
                h1 { Link { to: Route::Catalog {}, "Quiz" } }
                SignInArea {}
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
