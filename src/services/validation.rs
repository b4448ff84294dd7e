//! 输入校验
//!
//! 渲染引擎假定输入已经合法，这里的检查由调用方在导出之前执行。

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::models::{Exam, Question, QuestionId};
use crate::services::numbering;

/// 校验整张试卷，返回遇到的第一个错误
///
/// - 题目标识在整棵树中唯一
/// - 标题不为空
/// - 嵌套深度不超过 `max_depth`（顶层为 1）
/// - 各题及全卷的分值合计不超出 `i64` 范围
pub fn validate_exam(exam: &Exam, max_depth: usize) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    let mut total: i64 = 0;
    for (index, question) in exam.questions.iter().enumerate() {
        let label = numbering::top_level_label(index + 1);
        let points = validate_question(question, &label, 1, max_depth, &mut seen)?;
        total = total
            .checked_add(points)
            .ok_or_else(|| ValidationError::PointsOverflow {
                label: "Gesamt".to_string(),
            })?;
    }
    Ok(())
}

fn validate_question(
    question: &Question,
    label: &str,
    depth: usize,
    max_depth: usize,
    seen: &mut HashSet<QuestionId>,
) -> Result<i64, ValidationError> {
    if !seen.insert(question.id) {
        return Err(ValidationError::DuplicateId { id: question.id });
    }
    if question.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle {
            label: label.to_string(),
        });
    }
    if depth > max_depth {
        return Err(ValidationError::TooDeep {
            label: label.to_string(),
            depth,
            max_depth,
        });
    }

    if !question.has_children() {
        return Ok(question.points);
    }

    // 有效分值，逐级检查溢出
    let mut sum: i64 = 0;
    for (index, child) in question.children.iter().enumerate() {
        let child_label = numbering::child_label(label, index + 1);
        let points = validate_question(child, &child_label, depth + 1, max_depth, seen)?;
        sum = sum
            .checked_add(points)
            .ok_or_else(|| ValidationError::PointsOverflow {
                label: label.to_string(),
            })?;
    }
    Ok(sum)
}
