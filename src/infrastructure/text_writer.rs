//! 纯文本写入器
//!
//! 把抽象调用排版成等宽纯文本：居中/右对齐按行宽补空格，加粗用 `**` 包裹，
//! 表格按列宽对齐，分页符输出为换页符 `\x0c`。

use super::writer::{Align, DocumentWriter, ExportSink, ParagraphStyle, TableId};
use crate::error::ExportError;

#[derive(Debug)]
enum Block {
    Paragraph { text: String, style: ParagraphStyle },
    Table(usize),
    PageBreak,
    Image(usize),
}

#[derive(Debug)]
pub struct TextWriter {
    width: usize,
    blocks: Vec<Block>,
    tables: Vec<Vec<Vec<String>>>,
}

impl TextWriter {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            blocks: Vec::new(),
            tables: Vec::new(),
        }
    }

    /// 排版后的全文
    pub fn render(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph { text, style } => {
                    for line in text.lines() {
                        out.push_str(&self.format_line(line, style));
                        out.push('\n');
                    }
                    if text.is_empty() {
                        out.push('\n');
                    }
                }
                Block::Table(index) => {
                    out.push_str(&format_table(&self.tables[*index]));
                }
                Block::PageBreak => out.push_str("\x0c\n"),
                Block::Image(len) => out.push_str(&format!("[Bild: {} Bytes]\n", len)),
            }
        }
        out
    }

    fn format_line(&self, line: &str, style: &ParagraphStyle) -> String {
        let text = if style.bold && !line.is_empty() {
            format!("**{}**", line)
        } else {
            line.to_string()
        };
        let len = text.chars().count();
        let padding = self.width.saturating_sub(len);
        match style.align {
            Align::Left => text,
            Align::Center => format!("{}{}", " ".repeat(padding / 2), text),
            Align::Right => format!("{}{}", " ".repeat(padding), text),
        }
    }
}

impl Default for TextWriter {
    fn default() -> Self {
        Self::new(80)
    }
}

fn format_table(rows: &[Vec<String>]) -> String {
    let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..cols)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width - cell.chars().count();
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

impl DocumentWriter for TextWriter {
    fn add_paragraph(&mut self, text: &str, style: ParagraphStyle) {
        self.blocks.push(Block::Paragraph {
            text: text.to_string(),
            style,
        });
    }

    fn add_table(&mut self, rows: usize, cols: usize) -> TableId {
        self.tables.push(vec![vec![String::new(); cols]; rows]);
        let index = self.tables.len() - 1;
        self.blocks.push(Block::Table(index));
        TableId(index)
    }

    fn set_cell(&mut self, table: TableId, row: usize, col: usize, text: &str) {
        if let Some(cell) = self
            .tables
            .get_mut(table.0)
            .and_then(|t| t.get_mut(row))
            .and_then(|r| r.get_mut(col))
        {
            *cell = text.to_string();
        }
    }

    fn add_page_break(&mut self) {
        self.blocks.push(Block::PageBreak);
    }

    fn add_image(&mut self, bytes: &[u8]) {
        self.blocks.push(Block::Image(bytes.len()));
    }
}

impl ExportSink for TextWriter {
    fn file_extension(&self) -> &'static str {
        "txt"
    }

    fn into_bytes(self) -> Result<Vec<u8>, ExportError> {
        Ok(self.render().into_bytes())
    }
}
