//! 题目渲染 - 流程层
//!
//! 核心职责：决定"一道题"输出哪些内容
//!
//! 输出顺序：
//! 1. 标题行 `"<题号>. <标题> (<分值说明>)"`
//! 2. 按题型输出题干和作答区域（答案卷输出答案）
//! 3. 递归输出子题目

use std::collections::HashSet;
use tracing::debug;

use crate::config::Config;
use crate::infrastructure::{DocumentWriter, ParagraphStyle};
use crate::models::{Question, QuestionKind};
use crate::services::{option_normalizer, points};
use crate::workflow::render_ctx::{RenderCtx, RenderMode};

pub const UNCHECKED_BOX: &str = "☐";
pub const CHECKED_BOX: &str = "☑";
/// 填空题占位符
pub const BLANK_PLACEHOLDER: &str = "___";
pub const TRUE_LABEL: &str = "Richtig";
pub const FALSE_LABEL: &str = "Falsch";
pub const SOLUTION_PREFIX: &str = "Lösung: ";
/// 子题目要求另起一页时，在分页前输出的提示
pub const CONTINUATION_NOTICE: &str = "Fortsetzung auf der nächsten Seite.";

const TOP_LEVEL_TITLE_SIZE: u16 = 14;
const NESTED_TITLE_SIZE: u16 = 12;

/// 渲染参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// 答题横线长度（字符数）
    pub answer_line_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            answer_line_width: 80,
        }
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            answer_line_width: config.answer_line_width,
        }
    }
}

/// 题目渲染器
///
/// - 只读取题目，不修改
/// - 不做 I/O，只向写入器发出调用
pub struct QuestionRenderer {
    options: RenderOptions,
}

impl QuestionRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// 渲染一道题目及其全部子题目
    pub fn render<W: DocumentWriter + ?Sized>(
        &self,
        writer: &mut W,
        question: &Question,
        ctx: &RenderCtx,
    ) {
        debug!(
            "{} 渲染 {} 题，子题目 {} 个",
            ctx,
            question.kind.name(),
            question.children.len()
        );

        writer.add_paragraph(&title_line(question, &ctx.label), title_style(ctx));

        match &question.kind {
            QuestionKind::Open {
                answer_lines,
                solution,
            } => self.render_open(writer, question, *answer_lines, solution, ctx.mode),
            QuestionKind::MultipleChoice { solution } => {
                self.render_multiple_choice(writer, question, solution, ctx)
            }
            QuestionKind::FillInBlank { solution } => {
                self.render_fill_in_blank(writer, question, solution, ctx.mode)
            }
            QuestionKind::TrueFalse { solution } => {
                self.render_true_false(writer, question, solution, ctx.mode)
            }
        }

        if ctx.mode.is_answer_key() {
            if let Some(bytes) = &question.solution_image {
                writer.add_image(bytes);
            }
        }

        for (index, child) in question.children.iter().enumerate() {
            if child.start_on_new_page {
                // 父题目中间无法插入真正的空白页，只能提示后分页
                writer.add_paragraph(CONTINUATION_NOTICE, ParagraphStyle::plain());
                writer.add_page_break();
            }
            self.render(writer, child, &ctx.child(index + 1));
        }
    }

    fn render_open<W: DocumentWriter + ?Sized>(
        &self,
        writer: &mut W,
        question: &Question,
        answer_lines: u32,
        solution: &str,
        mode: RenderMode,
    ) {
        write_body(writer, &question.body);
        write_image(writer, question);

        match mode {
            RenderMode::StudentPaper => {
                let line = "_".repeat(self.options.answer_line_width);
                for _ in 0..answer_lines {
                    writer.add_paragraph(&line, ParagraphStyle::plain());
                }
            }
            RenderMode::AnswerKey => write_solution(writer, solution),
        }
    }

    fn render_multiple_choice<W: DocumentWriter + ?Sized>(
        &self,
        writer: &mut W,
        question: &Question,
        solution: &str,
        ctx: &RenderCtx,
    ) {
        let scan = option_normalizer::scan_options(&question.body);

        if scan.options.is_empty() {
            debug!("{} 未识别到选项，按普通文本输出", ctx);
            write_body(writer, &question.body);
            write_image(writer, question);
            if ctx.mode.is_answer_key() && !solution.trim().is_empty() {
                write_solution(writer, solution);
            }
            return;
        }

        if !scan.dropped.is_empty() {
            debug!("{} 选项整理丢弃了 {} 段内容", ctx, scan.dropped.len());
        }

        write_image(writer, question);

        let correct = correct_letters(solution);
        for option in &scan.options {
            let checked = ctx.mode.is_answer_key()
                && option_letter(option).is_some_and(|letter| correct.contains(&letter));
            let mark = if checked { CHECKED_BOX } else { UNCHECKED_BOX };
            writer.add_paragraph(&format!("{} {}", mark, option), ParagraphStyle::plain());
        }
    }

    fn render_fill_in_blank<W: DocumentWriter + ?Sized>(
        &self,
        writer: &mut W,
        question: &Question,
        solution: &str,
        mode: RenderMode,
    ) {
        match mode {
            RenderMode::StudentPaper => write_body(writer, &question.body),
            RenderMode::AnswerKey => write_body(writer, &fill_blanks(&question.body, solution)),
        }
        write_image(writer, question);
    }

    fn render_true_false<W: DocumentWriter + ?Sized>(
        &self,
        writer: &mut W,
        question: &Question,
        solution: &str,
        mode: RenderMode,
    ) {
        write_body(writer, &question.body);
        write_image(writer, question);

        let answer = if mode.is_answer_key() { solution } else { "" };
        for label in [TRUE_LABEL, FALSE_LABEL] {
            let mark = if answer == label {
                CHECKED_BOX
            } else {
                UNCHECKED_BOX
            };
            writer.add_paragraph(&format!("{} {}", mark, label), ParagraphStyle::plain());
        }
    }
}

impl Default for QuestionRenderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// 标题行：`"1.a. Titel (5 Punkte)"`
pub fn title_line(question: &Question, label: &str) -> String {
    format!(
        "{}. {} {}",
        label,
        question.title,
        points::points_caption(question)
    )
}

fn title_style(ctx: &RenderCtx) -> ParagraphStyle {
    let size = if ctx.is_top_level() {
        TOP_LEVEL_TITLE_SIZE
    } else {
        NESTED_TITLE_SIZE
    };
    ParagraphStyle::plain().bold().size(size)
}

fn write_body<W: DocumentWriter + ?Sized>(writer: &mut W, body: &str) {
    if !body.trim().is_empty() {
        writer.add_paragraph(body, ParagraphStyle::plain());
    }
}

fn write_image<W: DocumentWriter + ?Sized>(writer: &mut W, question: &Question) {
    if let Some(bytes) = &question.image {
        writer.add_image(bytes);
    }
}

fn write_solution<W: DocumentWriter + ?Sized>(writer: &mut W, solution: &str) {
    writer.add_paragraph(
        &format!("{}{}", SOLUTION_PREFIX, solution),
        ParagraphStyle::plain(),
    );
}

/// 按顺序把 `solution` 中分号分隔的内容填入占位符
///
/// 内容不足时剩余占位符保持原样，多余的内容被忽略。
pub fn fill_blanks(body: &str, solution: &str) -> String {
    let tokens: Vec<&str> = if solution.trim().is_empty() {
        Vec::new()
    } else {
        solution.split(';').map(str::trim).collect()
    };

    let mut filled = String::with_capacity(body.len());
    let mut rest = body;
    let mut tokens = tokens.into_iter();
    while let Some(pos) = rest.find(BLANK_PLACEHOLDER) {
        let Some(token) = tokens.next() else {
            break;
        };
        filled.push_str(&rest[..pos]);
        filled.push_str(token);
        rest = &rest[pos + BLANK_PLACEHOLDER.len()..];
    }
    filled.push_str(rest);
    filled
}

/// 正确选项字母集合，例如 `"A, c;D)"` → {A, C, D}
fn correct_letters(solution: &str) -> HashSet<char> {
    solution
        .split([',', ';'])
        .map(|token| token.trim().trim_end_matches([')', '.']).trim())
        .filter_map(|token| {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(letter), None) => Some(letter.to_ascii_uppercase()),
                _ => None,
            }
        })
        .collect()
}

/// 选项的编号字母
fn option_letter(option: &str) -> Option<char> {
    option.trim().chars().next().map(|c| c.to_ascii_uppercase())
}
