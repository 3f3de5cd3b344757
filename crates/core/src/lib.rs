#![forbid(unsafe_code)]

pub mod error;
pub mod gate;
pub mod model;
pub mod normalize;
pub mod session;
pub mod time;

pub use error::QuizError;
pub use time::{Clock, Countdown};
