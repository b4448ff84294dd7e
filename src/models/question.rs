//! 题目树数据模型
//!
//! 一道题目独占自己的子题目（`children`），不存在共享的父节点，也不存在环。

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 题目的稳定标识
///
/// 创建时分配，之后不再重新计算；只用于相等比较和变更跟踪，不参与排序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(Uuid);

impl QuestionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 题型
///
/// 每个变体只携带对该题型有意义的字段。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QuestionKind {
    /// 简答题：学生卷输出答题横线，答案卷输出 "Lösung: ..."
    #[serde(rename = "open")]
    Open {
        #[serde(default)]
        answer_lines: u32,
        #[serde(default)]
        solution: String,
    },
    /// 选择题：`solution` 为逗号/分号分隔的正确选项字母
    #[serde(rename = "multiple_choice")]
    MultipleChoice {
        #[serde(default)]
        solution: String,
    },
    /// 填空题：`solution` 为分号分隔的填空内容
    #[serde(rename = "fill_in_blank")]
    FillInBlank {
        #[serde(default)]
        solution: String,
    },
    /// 判断题：`solution` 为 "Richtig" 或 "Falsch"
    #[serde(rename = "true_false")]
    TrueFalse {
        #[serde(default)]
        solution: String,
    },
}

impl QuestionKind {
    /// 题型名称（仅用于日志）
    pub fn name(&self) -> &'static str {
        match self {
            QuestionKind::Open { .. } => "open",
            QuestionKind::MultipleChoice { .. } => "multiple_choice",
            QuestionKind::FillInBlank { .. } => "fill_in_blank",
            QuestionKind::TrueFalse { .. } => "true_false",
        }
    }
}

/// 题目节点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub id: QuestionId,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    /// 作者录入的分值；一旦存在子题目就不再可信，见 [`Question::effective_points`]
    #[serde(default)]
    pub points: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_image: Option<Vec<u8>>,
    #[serde(default)]
    pub start_on_new_page: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Question>,
}

impl Question {
    pub fn new(title: impl Into<String>, kind: QuestionKind, points: i64) -> Self {
        Self {
            id: QuestionId::new(),
            title: title.into(),
            body: String::new(),
            kind,
            points,
            image: None,
            solution_image: None,
            start_on_new_page: false,
            children: Vec::new(),
        }
    }

    pub fn open(title: impl Into<String>, points: i64, answer_lines: u32) -> Self {
        Self::new(
            title,
            QuestionKind::Open {
                answer_lines,
                solution: String::new(),
            },
            points,
        )
    }

    pub fn multiple_choice(title: impl Into<String>, points: i64) -> Self {
        Self::new(
            title,
            QuestionKind::MultipleChoice {
                solution: String::new(),
            },
            points,
        )
    }

    pub fn fill_in_blank(title: impl Into<String>, points: i64) -> Self {
        Self::new(
            title,
            QuestionKind::FillInBlank {
                solution: String::new(),
            },
            points,
        )
    }

    pub fn true_false(title: impl Into<String>, points: i64) -> Self {
        Self::new(
            title,
            QuestionKind::TrueFalse {
                solution: String::new(),
            },
            points,
        )
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// 设置 Musterlösung（所有题型共用）
    pub fn with_solution(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        match &mut self.kind {
            QuestionKind::Open { solution, .. }
            | QuestionKind::MultipleChoice { solution }
            | QuestionKind::FillInBlank { solution }
            | QuestionKind::TrueFalse { solution } => *solution = value,
        }
        self
    }

    pub fn with_image(mut self, bytes: Vec<u8>) -> Self {
        self.image = Some(bytes);
        self
    }

    pub fn with_solution_image(mut self, bytes: Vec<u8>) -> Self {
        self.solution_image = Some(bytes);
        self
    }

    pub fn on_new_page(mut self) -> Self {
        self.start_on_new_page = true;
        self
    }

    pub fn with_child(mut self, child: Question) -> Self {
        self.children.push(child);
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// 有效分值，见 [`crate::services::points::effective_points`]
    pub fn effective_points(&self) -> i64 {
        crate::services::points::effective_points(self)
    }
}

impl PartialEq for Question {
    /// 按稳定标识比较，而不是按内容
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Question {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_uses_id() {
        let a = Question::open("Gleich", 1, 0);
        let b = Question::open("Gleich", 1, 0);
        let mut edited = a.clone();
        edited.title = "Geändert".to_string();

        assert_ne!(a, b);
        assert_eq!(a, edited);
    }

    #[test]
    fn test_with_solution_sets_kind_field() {
        let question = Question::true_false("Frage", 1).with_solution("Falsch");
        assert_eq!(
            question.kind,
            QuestionKind::TrueFalse {
                solution: "Falsch".to_string()
            }
        );
    }
}
