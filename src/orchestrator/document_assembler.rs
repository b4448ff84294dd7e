//! 整卷组装器 - 编排层
//!
//! ## 职责
//!
//! 按顺序向写入器发出整张试卷的调用：
//!
//! 1. **封面**：标题、模块、学期、Hilfsmittel、考试时长
//! 2. **评分表**：每道顶层题目一行（题号 + 有效分值），最后一行为总分
//! 3. **正文**：依次渲染顶层题目；要求另起一页的顶层题目前插入空白页
//!
//! 组装器本身不做 I/O，也不关心写入器调用是否成功。

use tracing::{debug, info};

use crate::infrastructure::{Align, DocumentWriter, ParagraphStyle};
use crate::models::{Exam, ExamMeta};
use crate::services::numbering;
use crate::workflow::{QuestionRenderer, RenderCtx, RenderMode, RenderOptions};

/// 空白页上的提示
pub const BLANK_PAGE_NOTICE: &str = "Diese Seite bleibt absichtlich leer.";
pub const ANSWER_KEY_HEADING: &str = "Musterlösung";
pub const GRADING_HEADER: [&str; 3] = ["Aufgabe", "Punkte", "Erreicht"];
pub const GRADING_TOTAL_LABEL: &str = "Gesamt";

const EXAM_TITLE_SIZE: u16 = 20;
const HEADING_SIZE: u16 = 16;

/// 组装统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblySummary {
    pub mode: RenderMode,
    /// 渲染的题目数量（含子题目）
    pub questions: usize,
    pub total_points: i64,
    /// 插入的空白页数量
    pub blank_pages: usize,
}

/// 整卷组装器
pub struct DocumentAssembler {
    renderer: QuestionRenderer,
}

impl DocumentAssembler {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            renderer: QuestionRenderer::new(options),
        }
    }

    /// 组装整张试卷
    pub fn assemble<W: DocumentWriter + ?Sized>(
        &self,
        writer: &mut W,
        exam: &Exam,
        mode: RenderMode,
    ) -> AssemblySummary {
        info!(
            "📝 开始组装{}: {} ({} 道顶层题目)",
            mode,
            exam.meta.title,
            exam.questions.len()
        );

        write_cover(writer, &exam.meta, mode);
        write_grading_table(writer, exam);
        writer.add_page_break();

        let mut blank_pages = 0;
        // 封面之后正文从新的一页开始
        let mut at_page_start = true;

        for (index, question) in exam.questions.iter().enumerate() {
            let ctx = RenderCtx::top_level(index + 1, mode);

            if question.start_on_new_page {
                debug!("{} 插入空白页", ctx);
                write_blank_page(writer, at_page_start);
                blank_pages += 1;
            }

            self.renderer.render(writer, question, &ctx);
            at_page_start = false;
        }

        let summary = AssemblySummary {
            mode,
            questions: exam.question_count(),
            total_points: exam.total_points(),
            blank_pages,
        };
        info!(
            "✓ {}组装完成: {} 道题目, 总分 {}",
            mode, summary.questions, summary.total_points
        );
        summary
    }
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// 空白页：提示文字单独占一页，之后分页
fn write_blank_page<W: DocumentWriter + ?Sized>(writer: &mut W, at_page_start: bool) {
    if !at_page_start {
        writer.add_page_break();
    }
    writer.add_paragraph(
        BLANK_PAGE_NOTICE,
        ParagraphStyle::plain().align(Align::Center),
    );
    writer.add_page_break();
}

fn write_cover<W: DocumentWriter + ?Sized>(writer: &mut W, meta: &ExamMeta, mode: RenderMode) {
    let centered = ParagraphStyle::plain().align(Align::Center);

    if !meta.organization.is_empty() {
        writer.add_paragraph(&meta.organization, centered);
    }
    writer.add_paragraph(&meta.title, centered.bold().size(EXAM_TITLE_SIZE));
    if mode.is_answer_key() {
        writer.add_paragraph(ANSWER_KEY_HEADING, centered.bold().size(HEADING_SIZE));
    }

    let fields = [
        ("Modul", &meta.module),
        ("Semester", &meta.semester),
        ("Erstellt von", &meta.author),
        ("Bearbeitungszeit", &meta.time_allowance),
        ("Hilfsmittel", &meta.permitted_aids),
    ];
    for (name, value) in fields {
        if !value.is_empty() {
            writer.add_paragraph(&format!("{}: {}", name, value), ParagraphStyle::plain());
        }
    }

    if mode == RenderMode::StudentPaper {
        writer.add_paragraph("Name: ______________________________", ParagraphStyle::plain());
        writer.add_paragraph(
            "Matrikelnummer: ____________________",
            ParagraphStyle::plain(),
        );
    }
}

fn write_grading_table<W: DocumentWriter + ?Sized>(writer: &mut W, exam: &Exam) {
    let rows = exam.questions.len() + 2;
    let table = writer.add_table(rows, GRADING_HEADER.len());

    for (col, header) in GRADING_HEADER.iter().enumerate() {
        writer.set_cell(table, 0, col, header);
    }

    for (index, question) in exam.questions.iter().enumerate() {
        let row = index + 1;
        writer.set_cell(table, row, 0, &numbering::top_level_label(index + 1));
        writer.set_cell(table, row, 1, &question.effective_points().to_string());
    }

    let total_row = rows - 1;
    writer.set_cell(table, total_row, 0, GRADING_TOTAL_LABEL);
    writer.set_cell(table, total_row, 1, &exam.total_points().to_string());
}
