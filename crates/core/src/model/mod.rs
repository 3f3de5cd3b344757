mod progress;
mod question;
mod sign_in;
mod test_set;

pub use progress::{PROGRESS_KEY_PREFIX, QuizProgress, progress_key};
pub use question::{Choice, Question, UNTITLED_QUESTION};
pub use sign_in::SignInRecord;
pub use test_set::{EntryId, TestSet, TestSetEntry, TestSetName, UNTITLED_TEST};
