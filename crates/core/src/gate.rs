//! Client-side access gate for the test catalog.
//!
//! This is a convenience heuristic, not a trust boundary: an unsigned user
//! may open the first `free_count` tests, everything after is locked until a
//! sign-in record is present.

use crate::model::TestSetName;

pub const DEFAULT_FREE_COUNT: usize = 5;

/// Element id of the sign-in area that receives focus when a locked test is clicked.
pub const SIGN_IN_AREA_ID: &str = "user-area";

pub const LOCKED_MESSAGE: &str = "Sign in to unlock more tests";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessGate {
    free_count: usize,
}

impl AccessGate {
    #[must_use]
    pub fn new(free_count: usize) -> Self {
        Self { free_count }
    }

    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_count
    }

    #[must_use]
    pub fn is_locked(&self, signed_in: bool, index: usize) -> bool {
        !signed_in && index >= self.free_count
    }

    /// Decide what a click on catalog item `index` does.
    #[must_use]
    pub fn intercept(&self, signed_in: bool, index: usize) -> GateDecision {
        if self.is_locked(signed_in, index) {
            GateDecision::Blocked(LockedNotice::default())
        } else {
            GateDecision::Open
        }
    }

    /// Build the catalog view items for the discovered test sets.
    #[must_use]
    pub fn decorate(&self, names: &[TestSetName], signed_in: bool) -> Vec<CatalogItem> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| CatalogItem {
                name: name.clone(),
                label: format!("Test {}", index + 1),
                index,
                locked: self.is_locked(signed_in, index),
            })
            .collect()
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(DEFAULT_FREE_COUNT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub name: TestSetName,
    pub label: String,
    pub index: usize,
    pub locked: bool,
}

/// What the view must do for a locked item: swallow the click, show the
/// message briefly and move focus to the sign-in area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockedNotice {
    pub message: &'static str,
    pub focus_target: &'static str,
}

impl Default for LockedNotice {
    fn default() -> Self {
        Self {
            message: LOCKED_MESSAGE,
            focus_target: SIGN_IN_AREA_ID,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Open,
    Blocked(LockedNotice),
}
