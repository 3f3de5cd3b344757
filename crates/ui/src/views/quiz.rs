use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::Link;
use quiz_core::model::TestSetName;
use services::{EntryRequest, QuizLoopService};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ChoiceMark, QuizIntent, QuizVm, start_quiz};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

const TICK: Duration = Duration::from_secs(1);

#[component]
pub fn TestView(test: String) -> Element {
    let request = EntryRequest::Test(TestSetName::from(test.as_str()));
    rsx! {
        QuizView { request }
    }
}

#[component]
pub fn QuestionView(reference: String) -> Element {
    let request = EntryRequest::Question(reference);
    rsx! {
        QuizView { request }
    }
}

#[component]
fn QuizView(request: EntryRequest) -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();

    let error = use_signal(|| None::<ViewError>);
    let vm = use_signal(|| None::<QuizVm>);

    let resource = {
        let quiz_loop = Arc::clone(&quiz_loop);
        use_resource(move || {
            let quiz_loop = quiz_loop.clone();
            let request = request.clone();
            let mut error = error;
            let mut vm = vm;
            async move {
                let started = start_quiz(&quiz_loop, &request).await?;
                vm.set(Some(started));
                error.set(None);
                Ok::<_, ViewError>(())
            }
        })
    };
    let state = view_state_from_resource(&resource);

    let runner = QuizRunner {
        quiz_loop,
        vm,
        error,
        pending: use_signal(VecDeque::new),
        busy: use_signal(|| false),
    };

    let dispatch = {
        let runner = runner.clone();
        use_callback(move |intent: QuizIntent| runner.push(Step::Intent(intent)))
    };

    // One tick per second while a timed quiz is running.
    use_future(move || {
        let runner = runner.clone();
        async move {
            loop {
                tokio::time::sleep(TICK).await;
                let running = runner
                    .vm
                    .peek()
                    .as_ref()
                    .is_some_and(|quiz| quiz.timer_label().is_some() && !quiz.is_complete());
                if running {
                    runner.push(Step::Tick);
                }
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch, vm);
            }
        }
    }

    let current = vm.read().clone();

    rsx! {
        div { class: "page quiz-page",
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
                ViewState::Ready(()) => rsx! {
                    if let Some(current) = current {
                        {quiz_body(&current, dispatch)}
                    }
                },
            }
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
            Link { class: "back-link", to: Route::Catalog {}, "Back to tests" }
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Step {
    Intent(QuizIntent),
    Tick,
}

/// Applies quiz steps one at a time, in arrival order.
///
/// The committed `vm` stays in place while a step awaits persistence, so the
/// page keeps rendering and steps that arrive meanwhile are queued.
#[derive(Clone)]
struct QuizRunner {
    quiz_loop: Arc<QuizLoopService>,
    vm: Signal<Option<QuizVm>>,
    error: Signal<Option<ViewError>>,
    pending: Signal<VecDeque<Step>>,
    busy: Signal<bool>,
}

impl QuizRunner {
    fn push(&self, step: Step) {
        let mut pending = self.pending;
        pending.write().push_back(step);
        if *self.busy.peek() {
            return;
        }
        let mut busy = self.busy;
        busy.set(true);
        let runner = self.clone();
        spawn(async move {
            runner.drain().await;
            busy.set(false);
        });
    }

    async fn drain(&self) {
        let mut pending = self.pending;
        let mut vm = self.vm;
        let mut error = self.error;
        loop {
            let Some(step) = pending.write().pop_front() else {
                return;
            };
            let Some(mut working) = vm.peek().clone() else {
                continue;
            };
            let result = match step {
                Step::Intent(intent) => working.apply(&self.quiz_loop, intent).await,
                Step::Tick => working.tick(&self.quiz_loop).await.map(|_| ()),
            };
            vm.set(Some(working));
            match (step, result) {
                (_, Err(err)) => error.set(Some(err)),
                (Step::Intent(_), Ok(())) => error.set(None),
                (Step::Tick, Ok(())) => {}
            }
        }
    }
}

fn quiz_body(vm: &QuizVm, dispatch: Callback<QuizIntent>) -> Element {
    let title = vm.title().to_string();
    let timer = vm.timer_label().zip(vm.timer_width());
    let score = vm.score_label();
    let progress = vm.progress_label();
    let source = vm.source_label();
    let stem = vm.stem().map(str::to_string);
    let choices = vm.choices();
    let feedback = vm.feedback();
    let results = vm.results();
    let can_previous = vm.can_go_previous();
    let can_next = vm.can_go_next();

    rsx! {
        h2 { class: "quiz-title", "{title}" }
        if let Some((label, width)) = timer {
            div { class: "timer",
                span { class: "timer__label", id: "timer", "{label}" }
                div { class: "timer__track",
                    div { class: "timer__bar", style: "width: {width}" }
                }
            }
        }
        if let Some(results) = results {
            div {
                class: if results.passed { "results results--passed" } else { "results results--failed" },
                id: "results",
                if results.timed_out {
                    p { class: "results__note", "Time is up." }
                }
                p { "{results.text}" }
                p { class: "results__percent", "{results.percent_label}" }
                button {
                    id: "restart",
                    r#type: "button",
                    onclick: move |_| dispatch.call(QuizIntent::Restart),
                    "Restart"
                }
            }
        } else {
            div { class: "quiz-status",
                span { class: "score", "{score}" }
                if let Some(progress) = progress {
                    span { class: "progress", "{progress}" }
                }
            }
            if let Some(source) = source {
                p { class: "source", "{source}" }
            }
            if let Some(stem) = stem {
                p { class: "stem", id: "question", "{stem}" }
            }
            ul { class: "answers",
                for choice in choices {
                    li { key: "{choice.index}",
                        button {
                            class: choice.mark.class(),
                            r#type: "button",
                            disabled: choice.mark != ChoiceMark::Open,
                            onclick: move |_| dispatch.call(QuizIntent::Select(choice.index)),
                            "{choice.label}"
                        }
                    }
                }
            }
            if let Some(feedback) = feedback {
                div {
                    class: "feedback",
                    "data-type": if feedback.success { "success" } else { "error" },
                    strong { "{feedback.verdict}" }
                    if !feedback.explanation.is_empty() {
                        p { class: "feedback__explanation", "{feedback.explanation}" }
                    }
                }
            }
            div { class: "quiz-nav",
                button {
                    id: "prev",
                    r#type: "button",
                    disabled: !can_previous,
                    onclick: move |_| dispatch.call(QuizIntent::Previous),
                    "Previous"
                }
                button {
                    id: "next",
                    r#type: "button",
                    disabled: !can_next,
                    onclick: move |_| dispatch.call(QuizIntent::Next),
                    "Next"
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<QuizVm>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>, vm: Signal<Option<QuizVm>>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<QuizVm>> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
