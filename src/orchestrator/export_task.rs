//! 后台导出任务 - 编排层
//!
//! ## 职责
//!
//! 把同一份试卷快照渲染成学生卷和答案卷两个文件。
//!
//! ## 流程
//!
//! 1. 在阻塞线程池中渲染两份文档（渲染本身不会失败）
//! 2. 两份文档都写入临时文件
//! 3. 检查是否已取消；已取消则丢弃临时文件
//! 4. 依次改名为目标文件；第二个失败时删除第一个，保证要么都有要么都没有
//!
//! 结果通过 `oneshot` 通道返回：完成 / 失败 / 已取消。

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::ExportError;
use crate::infrastructure::ExportSink;
use crate::models::Exam;
use crate::orchestrator::document_assembler::DocumentAssembler;
use crate::workflow::{RenderMode, RenderOptions};

/// 导出参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub output_dir: PathBuf,
    /// 输出文件名主干（不含后缀和扩展名）
    pub base_name: String,
    pub student_suffix: String,
    pub answer_key_suffix: String,
    pub options: RenderOptions,
}

impl ExportRequest {
    /// 根据配置和试卷标题生成导出参数
    pub fn from_config(config: &Config, exam: &Exam) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            base_name: sanitize_file_stem(&exam.meta.title),
            student_suffix: config.student_suffix.clone(),
            answer_key_suffix: config.answer_key_suffix.clone(),
            options: RenderOptions::from(config),
        }
    }

    fn target_path(&self, suffix: &str, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.{}", self.base_name, suffix, extension))
    }
}

/// 导出成功后的统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub student_paper: PathBuf,
    pub answer_key: PathBuf,
    pub questions: usize,
    pub total_points: i64,
}

/// 导出结果
#[derive(Debug)]
pub enum ExportOutcome {
    Completed(ExportReport),
    Failed(ExportError),
    Cancelled,
}

impl ExportOutcome {
    /// 转成 Result，取消视为 [`ExportError::Cancelled`]
    pub fn into_result(self) -> Result<ExportReport, ExportError> {
        match self {
            ExportOutcome::Completed(report) => Ok(report),
            ExportOutcome::Failed(e) => Err(e),
            ExportOutcome::Cancelled => Err(ExportError::Cancelled),
        }
    }
}

/// 取消标记，可以在线程间共享
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 正在运行的导出任务
pub struct ExportHandle {
    cancel: CancelFlag,
    outcome: oneshot::Receiver<ExportOutcome>,
}

impl ExportHandle {
    /// 请求取消；任务在改名之前检查该标记
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// 等待任务结束
    pub async fn outcome(self) -> ExportOutcome {
        match self.outcome.await {
            Ok(outcome) => outcome,
            Err(_) => ExportOutcome::Failed(ExportError::TaskPanicked(
                "导出任务未返回结果".to_string(),
            )),
        }
    }
}

/// 一次导出（学生卷 + 答案卷）
pub struct ExportJob<F> {
    exam: Exam,
    request: ExportRequest,
    make_writer: F,
}

impl<W, F> ExportJob<F>
where
    W: ExportSink,
    F: Fn() -> W,
{
    /// `exam` 必须是快照，任务运行期间不会再读取原试卷
    pub fn new(exam: Exam, request: ExportRequest, make_writer: F) -> Self {
        Self {
            exam,
            request,
            make_writer,
        }
    }

    /// 在当前线程执行导出
    pub fn run(self, cancel: &CancelFlag) -> ExportOutcome {
        if cancel.is_cancelled() {
            info!("导出在开始前已取消: {}", self.exam.meta.title);
            return ExportOutcome::Cancelled;
        }

        let assembler = DocumentAssembler::new(self.request.options);

        let mut student = (self.make_writer)();
        let summary = assembler.assemble(&mut student, &self.exam, RenderMode::StudentPaper);
        let mut key = (self.make_writer)();
        assembler.assemble(&mut key, &self.exam, RenderMode::AnswerKey);

        let student_path = self
            .request
            .target_path(&self.request.student_suffix, student.file_extension());
        let key_path = self
            .request
            .target_path(&self.request.answer_key_suffix, key.file_extension());

        let staged = student
            .stage(&student_path)
            .and_then(|s| key.stage(&key_path).map(|k| (s, k)));
        let (staged_student, staged_key) = match staged {
            Ok(pair) => pair,
            Err(e) => {
                error!("❌ 写入临时文件失败: {}", e);
                return ExportOutcome::Failed(e);
            }
        };

        if cancel.is_cancelled() {
            info!("导出已取消，丢弃临时文件: {}", self.exam.meta.title);
            return ExportOutcome::Cancelled;
        }

        let student_paper = match staged_student.commit() {
            Ok(path) => path,
            Err(e) => return ExportOutcome::Failed(e),
        };
        let answer_key = match staged_key.commit() {
            Ok(path) => path,
            Err(e) => {
                remove_partial_output(&student_paper);
                return ExportOutcome::Failed(e);
            }
        };

        debug!(
            "已生成: {} / {}",
            student_paper.display(),
            answer_key.display()
        );

        ExportOutcome::Completed(ExportReport {
            student_paper,
            answer_key,
            questions: summary.questions,
            total_points: summary.total_points,
        })
    }
}

impl<W, F> ExportJob<F>
where
    W: ExportSink + 'static,
    F: Fn() -> W + Send + 'static,
{
    /// 在阻塞线程池中运行，立即返回任务句柄
    pub fn spawn(self) -> ExportHandle {
        self.spawn_with(CancelFlag::new())
    }

    /// 使用调用方提供的取消标记运行
    pub fn spawn_with(self, cancel: CancelFlag) -> ExportHandle {
        let (tx, rx) = oneshot::channel();
        let task_cancel = cancel.clone();

        tokio::task::spawn_blocking(move || {
            let outcome = self.run(&task_cancel);
            if tx.send(outcome).is_err() {
                debug!("导出结果无人接收");
            }
        });

        ExportHandle {
            cancel,
            outcome: rx,
        }
    }
}

/// 在后台导出学生卷和答案卷
pub fn spawn_export<W, F>(exam: Exam, request: ExportRequest, make_writer: F) -> ExportHandle
where
    W: ExportSink + 'static,
    F: Fn() -> W + Send + 'static,
{
    ExportJob::new(exam, request, make_writer).spawn()
}

fn remove_partial_output(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("无法删除不完整的导出文件 {}: {}", path.display(), e);
    }
}

/// 试卷标题转成文件名主干：空白变下划线，只保留字母数字、`-` 和 `_`
pub fn sanitize_file_stem(title: &str) -> String {
    let stem: String = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    if stem.is_empty() {
        "Klausur".to_string()
    } else {
        stem
    }
}
