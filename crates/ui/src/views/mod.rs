mod catalog;
mod quiz;
mod sign_in;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use catalog::CatalogView;
pub use quiz::{QuestionView, TestView};
pub use sign_in::{SignInArea, SignInState, use_sign_in_state};
pub use state::{ViewError, ViewState, view_state_from_resource};
