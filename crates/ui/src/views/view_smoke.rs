use crate::vm::QuizIntent;

use super::test_harness::{
    FakeSite, ViewKind, harness_config, setup_view_harness, setup_view_harness_with_site,
};

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_smoke_lists_tests_and_locks_past_free_count() {
    let mut harness = setup_view_harness(ViewKind::Catalog).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    for label in ["Test 1", "Test 2", "Test 3"] {
        assert!(html.contains(label), "missing {label} in {html}");
    }
    assert_eq!(html.matches("test-link locked").count(), 1, "{html}");
    assert!(html.contains("Sign in to unlock"), "missing lock title in {html}");
    assert!(html.contains("Sign in"), "missing sign-in button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_smoke_unlocks_after_sign_in() {
    let mut harness = setup_view_harness(ViewKind::Catalog).await;
    harness.rebuild();
    harness.settle().await;
    assert!(harness.render().contains("test-link locked"));

    harness
        .services
        .sign_in()
        .handle_credential("not-a-token")
        .await
        .expect("sign in");
    harness.settle().await;

    let html = harness.render();
    assert!(!html.contains("test-link locked"), "still locked in {html}");
    assert!(html.contains("Signed in"), "missing signed-in label in {html}");
    assert!(html.contains("Sign out"), "missing sign-out button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_smoke_renders_empty_catalog() {
    let mut harness = setup_view_harness_with_site(
        ViewKind::Catalog,
        FakeSite::empty_catalog(),
        harness_config(),
    )
    .await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("No tests published yet."), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_smoke_reports_listing_failure() {
    let mut harness =
        setup_view_harness_with_site(ViewKind::Catalog, FakeSite::offline(), harness_config())
            .await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Failed to list tests in"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_view_smoke_renders_first_question() {
    let mut harness = setup_view_harness(ViewKind::Test("set_1.json".into())).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    for expected in [
        "Set 1",
        "Question 1 of 3",
        "Score: 0",
        "20:00",
        "Source: question_1",
        "What is 1?",
        "Back to tests",
    ] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
    assert!(!html.contains("Because 1."), "feedback shown before answering: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_view_smoke_answers_and_advances() {
    let mut harness = setup_view_harness(ViewKind::Test("set_1.json".into())).await;
    harness.rebuild();
    harness.settle().await;

    let dispatch = harness.quiz_handles.dispatch();
    harness.dom.in_runtime(|| dispatch.call(QuizIntent::Select(0)));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Correct"), "missing verdict in {html}");
    assert!(html.contains("Because 1."), "missing explanation in {html}");
    assert!(html.contains("Score: 1"), "score not updated in {html}");

    harness.dom.in_runtime(|| dispatch.call(QuizIntent::Next));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Question 2 of 3"), "did not advance: {html}");
    assert!(html.contains("What is 2?"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_view_smoke_shows_results_when_finished() {
    let mut harness = setup_view_harness(ViewKind::Test("set_2.json".into())).await;
    harness.rebuild();
    harness.settle().await;

    let dispatch = harness.quiz_handles.dispatch();
    for choice in [0, 1, 0] {
        harness
            .dom
            .in_runtime(|| dispatch.call(QuizIntent::Select(choice)));
        harness.settle().await;
        harness.dom.in_runtime(|| dispatch.call(QuizIntent::Next));
        harness.settle().await;
    }

    let vm = harness.quiz_handles.vm();
    let complete = harness
        .dom
        .in_runtime(|| vm.peek().as_ref().is_some_and(|quiz| quiz.is_complete()));
    assert!(complete);

    let html = harness.render();
    assert!(
        html.contains("PASSED \u{2014} You scored 2 out of 3. (2 required to pass)"),
        "missing results in {html}"
    );
    assert!(html.contains("Score: 67%"), "missing percentage in {html}");
    assert!(html.contains("Restart"), "missing restart button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_view_smoke_restart_starts_over() {
    let mut harness = setup_view_harness(ViewKind::Test("set_1.json".into())).await;
    harness.rebuild();
    harness.settle().await;

    let dispatch = harness.quiz_handles.dispatch();
    for _ in 0..3 {
        harness
            .dom
            .in_runtime(|| dispatch.call(QuizIntent::Select(0)));
        harness.dom.in_runtime(|| dispatch.call(QuizIntent::Next));
        harness.settle().await;
    }
    assert!(harness.render().contains("Score: 100%"));

    harness.dom.in_runtime(|| dispatch.call(QuizIntent::Restart));
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Question 1 of 3"), "did not restart: {html}");
    assert!(html.contains("Score: 0"), "{html}");
    assert!(!html.contains("Because 1."), "answer survived restart: {html}");

    let vm = harness.quiz_handles.vm();
    let remaining = harness.dom.in_runtime(|| {
        vm.peek()
            .as_ref()
            .and_then(|quiz| quiz.quiz().session().remaining_seconds())
    });
    assert!(remaining.is_some_and(|secs| secs >= 1195), "{remaining:?}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_view_smoke_queues_rapid_actions() {
    let mut harness = setup_view_harness(ViewKind::Test("set_1.json".into())).await;
    harness.rebuild();
    harness.settle().await;

    let dispatch = harness.quiz_handles.dispatch();
    harness.dom.in_runtime(|| {
        dispatch.call(QuizIntent::Select(0));
        dispatch.call(QuizIntent::Next);
        dispatch.call(QuizIntent::Select(1));
    });

    let vm = harness.quiz_handles.vm();
    let mid_flight = harness.dom.in_runtime(|| vm.peek().is_some());
    assert!(mid_flight, "quiz body dropped while an action was pending");

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Question 2 of 3"), "{html}");
    assert!(html.contains("Score: 1"), "{html}");
    assert!(html.contains("Incorrect"), "third action was dropped: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn question_view_smoke_is_untimed() {
    let mut harness = setup_view_harness(ViewKind::Question("2".into())).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("What is 2?"), "missing stem in {html}");
    assert!(html.contains("Source: question_2"), "{html}");
    assert!(!html.contains("20:00"), "single question should be untimed: {html}");
    assert!(html.contains("Question 1 of 1"), "{html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_load_errors() {
    let cases = [
        (ViewKind::Test("missing.json".into()), "Failed to load test."),
        (ViewKind::Question("99".into()), "Failed to load question."),
        (ViewKind::Test("empty.json".into()), "No questions found for this test."),
    ];
    for (view, expected) in cases {
        let site = FakeSite::new(1, 1).with_file("test_sets/empty.json", "[]");
        let mut harness = setup_view_harness_with_site(view, site, harness_config()).await;
        harness.rebuild();
        harness.settle().await;

        let html = harness.render();
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
}
