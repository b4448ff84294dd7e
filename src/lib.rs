//! # Exam Export
//!
//! 把结构化试卷（带分值的多级题目、多种题型、可选图片）渲染成两份并行的文档：
//! 学生卷（Klausur）和答案卷（Musterlösung）。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 抽象文档写入器，只暴露"段落 / 表格 / 分页 / 图片"能力
//! - `TextWriter` - 纯文本输出，临时文件 + 改名落盘
//! - `RecordingWriter` - 记录所有调用，用于测试和调试
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 纯函数，只处理单个题目
//! - `points` - 有效分值（有子题目时取子题目之和）
//! - `numbering` - 题号（`1`、`1.a`、`1.b` ...）
//! - `option_normalizer` - 选择题选项整理
//! - `validation` - 导出前的输入校验
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一道题"如何输出
//! - `RenderCtx` - 上下文封装（题号 + 深度 + 模式）
//! - `QuestionRenderer` - 按题型输出标题、题干、作答区域和答案
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/document_assembler` - 封面、评分表、正文
//! - `orchestrator/export_task` - 后台导出任务，可取消
//! - `orchestrator/batch_processor` - 批量加载、校验、导出
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, ExportError, ValidationError};
pub use infrastructure::{DocumentWriter, RecordingWriter, TextWriter};
pub use models::{Exam, ExamMeta, Question, QuestionId, QuestionKind};
pub use orchestrator::{
    spawn_export, App, DocumentAssembler, ExportHandle, ExportOutcome, ExportRequest,
};
pub use workflow::{QuestionRenderer, RenderCtx, RenderMode, RenderOptions};
