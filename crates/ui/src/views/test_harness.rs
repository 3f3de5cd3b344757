use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::gate::AccessGate;
use quiz_core::time::fixed_now;
use services::{
    AppServices, CatalogService, Clock, EntryRequest, FetchError, QuizConfig, QuizLoopService,
    ResourceFetcher, SignInService,
};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::quiz::QuizTestHandles;
use crate::views::{CatalogView, QuestionView, SignInArea, TestView, use_sign_in_state};

/// In-memory stand-in for a published quiz site.
pub struct FakeSite {
    files: HashMap<String, String>,
}

impl FakeSite {
    /// `sets` test sets named `set_<n>.json`, each over questions `1..=per_set`.
    pub fn new(sets: usize, per_set: usize) -> Self {
        let mut files = HashMap::new();
        let links: String = (1..=sets)
            .map(|n| format!(r#"<a href="set_{n}.json">set_{n}.json</a>"#))
            .collect();
        files.insert(
            "test_sets/".to_string(),
            format!(r#"<html><body><a href="../">../</a>{links}</body></html>"#),
        );
        let entries: Vec<String> = (1..=per_set).map(|n| format!("\"{n}\"")).collect();
        for n in 1..=sets {
            files.insert(
                format!("test_sets/set_{n}.json"),
                format!(r#"{{"title":"Set {n}","questions":[{}]}}"#, entries.join(",")),
            );
        }
        for n in 1..=per_set {
            files.insert(
                format!("question_json/question_{n}.json"),
                format!(
                    r#"{{"question_number":"{n}","question":"What is {n}?","choices":["right","wrong"],"correct_answer":"A","explanation":"Because {n}."}}"#
                ),
            );
        }
        Self { files }
    }

    /// A site that serves nothing, not even the test-set listing.
    pub fn offline() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    pub fn empty_catalog() -> Self {
        let mut files = HashMap::new();
        files.insert("test_sets/".to_string(), "<html><body></body></html>".to_string());
        Self { files }
    }

    pub fn with_file(mut self, path: &str, body: &str) -> Self {
        self.files.insert(path.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl ResourceFetcher for FakeSite {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::InvalidPath(path.to_string()))
    }
}

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn gate(&self) -> AccessGate {
        self.services.gate()
    }

    fn entry_on_launch(&self) -> Option<EntryRequest> {
        None
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.services.quiz_loop()
    }

    fn sign_in(&self) -> Arc<SignInService> {
        self.services.sign_in()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Catalog,
    Test(String),
    Question(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    quiz_handles: QuizTestHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    use_context_provider(|| props.quiz_handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    let record = use_sign_in_state();
    use_context_provider(|| record);
    rsx! {
        SignInArea {}
        match view {
            ViewKind::Catalog => rsx! { CatalogView {} },
            ViewKind::Test(test) => rsx! { TestView { test } },
            ViewKind::Question(reference) => rsx! { QuestionView { reference } },
        }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub services: AppServices,
    pub quiz_handles: QuizTestHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Let pending resources and spawned tasks settle.
    pub async fn settle(&mut self) {
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn harness_config() -> QuizConfig {
    QuizConfig {
        free_count: 2,
        pass_threshold: 2,
        ..QuizConfig::default()
    }
}

pub async fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_site(view, FakeSite::new(3, 3), harness_config()).await
}

pub async fn setup_view_harness_with_site(
    view: ViewKind,
    site: FakeSite,
    config: QuizConfig,
) -> ViewHarness {
    let services = AppServices::with_fetcher(
        &config,
        Clock::fixed(fixed_now()),
        Storage::in_memory(),
        Arc::new(site),
    )
    .await
    .expect("build services");
    let quiz_handles = QuizTestHandles::default();

    let app = Arc::new(TestApp {
        services: services.clone(),
    });
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            quiz_handles: quiz_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        services,
        quiz_handles,
    }
}
