//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量试卷导出
//! - 加载一份或多份试卷并校验
//! - 为每份试卷启动后台导出任务
//! - 输出全局统计信息
//!
//! ### `export_task` - 单份试卷的后台导出
//! - 渲染学生卷和答案卷
//! - 临时文件 + 改名，支持取消
//!
//! ### `document_assembler` - 整卷组装
//! - 封面、评分表、正文
//! - 顶层题目的空白页
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Exam>)
//!     ↓
//! export_task (处理单个 Exam，两种模式)
//!     ↓
//! document_assembler (处理 Vec<Question>)
//!     ↓
//! workflow::QuestionRenderer (处理单个 Question)
//!     ↓
//! services (能力层：分值 / 题号 / 选项整理)
//!     ↓
//! infrastructure (基础设施：DocumentWriter)
//! ```

pub mod batch_processor;
pub mod document_assembler;
pub mod export_task;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats};
pub use document_assembler::{AssemblySummary, DocumentAssembler};
pub use export_task::{
    spawn_export, CancelFlag, ExportHandle, ExportJob, ExportOutcome, ExportReport, ExportRequest,
};
