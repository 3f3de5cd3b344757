use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{TestSetName, progress_key};
use quiz_core::session::{CompletionReason, PassPolicy, QuizState};
use quiz_core::time::fixed_now;
use services::{
    CatalogPaths, CatalogService, Clock, EntryRequest, FetchError, OnMissingQuestion,
    ProgressPolicy, ProgressService, QuizLoopService, ResourceFetcher,
};
use storage::repository::{InMemoryStore, KeyValueStore};

struct FakeSite {
    files: HashMap<String, String>,
}

impl FakeSite {
    fn with_questions(count: usize) -> Self {
        let mut files = HashMap::new();
        let entries: Vec<String> = (1..=count).map(|n| format!("\"{n}\"")).collect();
        files.insert(
            "test_sets/set_1.json".to_string(),
            format!("[{}]", entries.join(",")),
        );
        files.insert("test_sets/empty.json".to_string(), "[]".to_string());
        for n in 1..=count {
            files.insert(
                format!("question_json/question_{n}.json"),
                format!(r#"{{"question":"Q{n}","choices":["a","b"],"correct_index":0}}"#),
            );
        }
        Self { files }
    }
}

#[async_trait]
impl ResourceFetcher for FakeSite {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::HttpStatus {
                path: path.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}

fn loop_service(store: Arc<InMemoryStore>, questions: usize, resume: bool) -> QuizLoopService {
    let catalog = Arc::new(CatalogService::new(
        Arc::new(FakeSite::with_questions(questions)),
        CatalogPaths::default(),
        OnMissingQuestion::Abort,
    ));
    let progress = Arc::new(ProgressService::new(store));
    let policy = if resume {
        ProgressPolicy::Resume
    } else {
        ProgressPolicy::StartFresh
    };
    QuizLoopService::new(
        Clock::fixed(fixed_now()),
        catalog,
        progress,
        PassPolicy::new(15),
        1200,
    )
    .with_progress_policy(policy)
}

#[tokio::test]
async fn full_test_run_passes_and_clears_progress() {
    let store = Arc::new(InMemoryStore::new());
    let service = loop_service(store.clone(), 16, false);
    let mut quiz = service
        .start(&EntryRequest::Test(TestSetName::new("set_1.json")))
        .await
        .unwrap();
    assert_eq!(quiz.session().total(), 16);
    assert_eq!(quiz.session().remaining_seconds(), Some(1200));

    while !quiz.session().is_complete() {
        let choice = if quiz.session().current_index() == 0 { 1 } else { 0 };
        service.select_answer(&mut quiz, choice).await.unwrap();
        service.next(&mut quiz).await.unwrap();
    }

    let result = quiz.session().result().unwrap();
    assert_eq!(result.score, 15);
    assert!(result.passed);
    assert_eq!(result.reason, CompletionReason::Finished);
    assert!(store.get(&progress_key("set_1.json")).await.unwrap().is_none());
}

#[tokio::test]
async fn progress_is_saved_and_resumed() {
    let store = Arc::new(InMemoryStore::new());
    let name = TestSetName::new("set_1.json");

    let first = loop_service(store.clone(), 3, true);
    let mut quiz = first.start_test(&name).await.unwrap();
    first.select_answer(&mut quiz, 0).await.unwrap();
    first.next(&mut quiz).await.unwrap();
    assert!(store.get(&progress_key("set_1.json")).await.unwrap().is_some());

    let resumed = loop_service(store.clone(), 3, true)
        .start_test(&name)
        .await
        .unwrap();
    assert_eq!(resumed.session().state(), QuizState::Presenting(1));
    assert_eq!(resumed.session().score(), 1);

    let fresh = loop_service(store.clone(), 3, false)
        .start_test(&name)
        .await
        .unwrap();
    assert_eq!(fresh.session().state(), QuizState::Presenting(0));
    assert!(store.get(&progress_key("set_1.json")).await.unwrap().is_none());
}

#[tokio::test]
async fn restart_after_results_starts_over_with_full_clock() {
    let store = Arc::new(InMemoryStore::new());
    let service = loop_service(store.clone(), 2, false);
    let mut quiz = service
        .start_test(&TestSetName::new("set_1.json"))
        .await
        .unwrap();
    service.tick(&mut quiz).await.unwrap();
    while !quiz.session().is_complete() {
        service.select_answer(&mut quiz, 0).await.unwrap();
        service.next(&mut quiz).await.unwrap();
    }
    assert_eq!(quiz.session().result().unwrap().percent(), 100);

    service.restart(&mut quiz).await.unwrap();
    assert_eq!(quiz.session().state(), QuizState::Presenting(0));
    assert_eq!(quiz.session().score(), 0);
    assert_eq!(quiz.session().remaining_seconds(), Some(1200));
    assert!(store.get(&progress_key("set_1.json")).await.unwrap().is_some());
}

#[tokio::test]
async fn empty_test_is_reported() {
    let service = loop_service(Arc::new(InMemoryStore::new()), 1, false);
    let err = service
        .start_test(&TestSetName::new("empty.json"))
        .await
        .unwrap_err();
    assert!(err.is_empty());
}

#[tokio::test]
async fn single_question_is_untimed() {
    let service = loop_service(Arc::new(InMemoryStore::new()), 2, false);
    let mut quiz = service
        .start(&EntryRequest::Question("q2".into()))
        .await
        .unwrap();
    assert!(quiz.is_single_question());
    assert_eq!(quiz.title(), "Q2");
    assert_eq!(quiz.session().remaining_seconds(), None);
    assert!(!service.tick(&mut quiz).await.unwrap());

    let feedback = service.select_answer(&mut quiz, 0).await.unwrap().unwrap();
    assert!(feedback.is_correct);
}
