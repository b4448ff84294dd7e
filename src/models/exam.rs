use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::models::question::Question;

/// 试卷元数据（封面内容）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamMeta {
    pub title: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub author: String,
    /// Hilfsmittel
    #[serde(default)]
    pub permitted_aids: String,
    /// 考试时长说明，例如 "90 Minuten"
    #[serde(default)]
    pub time_allowance: String,
}

/// 试卷
///
/// 元数据 + 有序的顶层题目列表，题目与试卷之间只有包含关系。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Exam {
    #[serde(flatten)]
    pub meta: ExamMeta,
    #[serde(default, rename = "question")]
    pub questions: Vec<Question>,
}

impl Exam {
    pub fn new(meta: ExamMeta) -> Self {
        Self {
            meta,
            questions: Vec::new(),
        }
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    /// 全卷总分：所有顶层题目有效分值之和
    pub fn total_points(&self) -> i64 {
        self.questions
            .iter()
            .map(Question::effective_points)
            .fold(0, i64::saturating_add)
    }

    /// 题目总数（含子题目）
    pub fn question_count(&self) -> usize {
        fn count(questions: &[Question]) -> usize {
            questions.iter().map(|q| 1 + count(&q.children)).sum()
        }
        count(&self.questions)
    }

    /// 在读锁下深拷贝当前试卷
    ///
    /// 编辑器可以在导出期间继续修改原试卷，导出只读取这份快照。
    pub async fn snapshot(live: &RwLock<Exam>) -> Exam {
        live.read().await.clone()
    }
}
