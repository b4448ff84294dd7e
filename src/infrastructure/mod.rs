pub mod recording_writer;
pub mod text_writer;
pub mod writer;

pub use recording_writer::{RecordingWriter, WriterCall};
pub use text_writer::TextWriter;
pub use writer::{Align, DocumentWriter, ExportSink, ParagraphStyle, StagedFile, TableId};
