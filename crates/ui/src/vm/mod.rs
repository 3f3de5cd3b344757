mod catalog_vm;
mod quiz_vm;
mod time_fmt;

pub use catalog_vm::{catalog_items, item_class, load_catalog, signed_in_label};
pub use quiz_vm::{
    ChoiceMark, ChoiceVm, FeedbackVm, QuizIntent, QuizVm, ResultsVm, results_text, source_label,
    start_quiz,
};
pub use time_fmt::{elapsed_width, format_countdown};
