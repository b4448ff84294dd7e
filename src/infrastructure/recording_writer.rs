//! 记录型写入器
//!
//! 按顺序记录所有调用，用于测试和调试导出（JSON 格式）。

use serde::Serialize;

use super::writer::{DocumentWriter, ExportSink, ParagraphStyle, TableId};
use crate::error::ExportError;

/// 一次写入器调用
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum WriterCall {
    Paragraph {
        text: String,
        style: ParagraphStyle,
    },
    Table {
        table: TableId,
        rows: usize,
        cols: usize,
    },
    Cell {
        table: TableId,
        row: usize,
        col: usize,
        text: String,
    },
    PageBreak,
    Image {
        len: usize,
    },
}

#[derive(Debug, Default, Clone)]
pub struct RecordingWriter {
    calls: Vec<WriterCall>,
    tables: usize,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[WriterCall] {
        &self.calls
    }

    /// 所有段落文本，按输出顺序
    pub fn paragraphs(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                WriterCall::Paragraph { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// 某个表格的单元格内容，未设置的单元格为空串
    pub fn table_cells(&self, table: TableId) -> Vec<Vec<String>> {
        let mut grid: Vec<Vec<String>> = Vec::new();
        for call in &self.calls {
            match call {
                WriterCall::Table { table: id, rows, cols } if *id == table => {
                    grid = vec![vec![String::new(); *cols]; *rows];
                }
                WriterCall::Cell {
                    table: id,
                    row,
                    col,
                    text,
                } if *id == table => {
                    if let Some(cell) = grid.get_mut(*row).and_then(|r| r.get_mut(*col)) {
                        *cell = text.clone();
                    }
                }
                _ => {}
            }
        }
        grid
    }
}

impl DocumentWriter for RecordingWriter {
    fn add_paragraph(&mut self, text: &str, style: ParagraphStyle) {
        self.calls.push(WriterCall::Paragraph {
            text: text.to_string(),
            style,
        });
    }

    fn add_table(&mut self, rows: usize, cols: usize) -> TableId {
        let table = TableId(self.tables);
        self.tables += 1;
        self.calls.push(WriterCall::Table { table, rows, cols });
        table
    }

    fn set_cell(&mut self, table: TableId, row: usize, col: usize, text: &str) {
        self.calls.push(WriterCall::Cell {
            table,
            row,
            col,
            text: text.to_string(),
        });
    }

    fn add_page_break(&mut self) {
        self.calls.push(WriterCall::PageBreak);
    }

    fn add_image(&mut self, bytes: &[u8]) {
        self.calls.push(WriterCall::Image { len: bytes.len() });
    }
}

impl ExportSink for RecordingWriter {
    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn into_bytes(self) -> Result<Vec<u8>, ExportError> {
        let mut json = serde_json::to_vec_pretty(&self.calls)?;
        json.push(b'\n');
        Ok(json)
    }
}
