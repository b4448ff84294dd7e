pub mod exam;
pub mod loaders;
pub mod question;

pub use exam::{Exam, ExamMeta};
pub use loaders::{load_all_toml_files, load_toml_to_exam};
pub use question::{Question, QuestionId, QuestionKind};
