pub mod question_renderer;
pub mod render_ctx;

pub use question_renderer::{QuestionRenderer, RenderOptions};
pub use render_ctx::{RenderCtx, RenderMode};
