use std::sync::{Arc, Mutex};

use quiz_core::gate::AccessGate;
use services::{CatalogService, EntryRequest, QuizLoopService, SignInService};

pub trait UiApp: Send + Sync {
    fn gate(&self) -> AccessGate;
    /// Test or question requested on the command line, opened once at launch.
    fn entry_on_launch(&self) -> Option<EntryRequest>;

    fn catalog(&self) -> Arc<CatalogService>;
    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn sign_in(&self) -> Arc<SignInService>;
}

#[derive(Clone)]
pub struct AppContext {
    gate: AccessGate,
    entry_on_launch_once: Arc<Mutex<Option<EntryRequest>>>,

    catalog: Arc<CatalogService>,
    quiz_loop: Arc<QuizLoopService>,
    sign_in: Arc<SignInService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            gate: app.gate(),
            entry_on_launch_once: Arc::new(Mutex::new(app.entry_on_launch())),
            catalog: app.catalog(),
            quiz_loop: app.quiz_loop(),
            sign_in: app.sign_in(),
        }
    }

    #[must_use]
    pub fn gate(&self) -> AccessGate {
        self.gate
    }

    /// Hand out the launch entry request; later calls return `None`.
    #[must_use]
    pub fn take_entry_on_launch(&self) -> Option<EntryRequest> {
        self.entry_on_launch_once
            .lock()
            .ok()
            .and_then(|mut guard| guard.take())
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn sign_in(&self) -> Arc<SignInService> {
        Arc::clone(&self.sign_in)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
