//! 渲染上下文
//!
//! 封装"我正在渲染哪种卷子的第几题"这一信息

use std::fmt::Display;

use crate::services::numbering;

/// 渲染模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// 学生卷
    StudentPaper,
    /// 答案卷
    AnswerKey,
}

impl RenderMode {
    pub fn is_answer_key(self) -> bool {
        self == RenderMode::AnswerKey
    }
}

impl Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::StudentPaper => write!(f, "学生卷"),
            RenderMode::AnswerKey => write!(f, "答案卷"),
        }
    }
}

/// 单道题目的渲染上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCtx {
    /// 题号，例如 "2" 或 "2.b"
    pub label: String,
    /// 嵌套深度，顶层为 1
    pub depth: usize,
    pub mode: RenderMode,
}

impl RenderCtx {
    /// 顶层题目上下文（`position` 从 1 开始）
    pub fn top_level(position: usize, mode: RenderMode) -> Self {
        Self {
            label: numbering::top_level_label(position),
            depth: 1,
            mode,
        }
    }

    /// 子题目上下文（`position` 从 1 开始）
    pub fn child(&self, position: usize) -> Self {
        Self {
            label: numbering::child_label(&self.label, position),
            depth: self.depth + 1,
            mode: self.mode,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.depth == 1
    }
}

impl Display for RenderCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} 题目#{}]", self.mode, self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_context() {
        let top = RenderCtx::top_level(2, RenderMode::AnswerKey);
        let child = top.child(3);

        assert_eq!(child.label, "2.c");
        assert_eq!(child.depth, 2);
        assert_eq!(child.mode, RenderMode::AnswerKey);
        assert!(top.is_top_level());
        assert!(!child.is_top_level());
        assert_eq!(child.to_string(), "[答案卷 题目#2.c]");
    }
}
