//! 批量试卷导出 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责加载、校验并导出一份或多份试卷。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：打印启动信息
//! 2. **加载**：单个 TOML 文件，或目录下的所有 TOML 文件
//! 3. **校验**：导出前拒绝结构不合法的试卷
//! 4. **并发导出**：每份试卷一个后台任务，互不共享可变状态
//! 5. **全局统计**：汇总成功/失败数量

use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::TextWriter;
use crate::models::{self, Exam};
use crate::orchestrator::export_task::{spawn_export, ExportHandle, ExportOutcome, ExportRequest};
use crate::services::validate_exam;
use crate::utils::logging::{self, truncate_text};
use anyhow::Result;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Self {
        logging::log_startup(&config.exam_path, &config.output_dir);
        Self { config }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        let exams = self.load_exams().await?;

        if exams.is_empty() {
            warn!("⚠️ 没有找到待导出的试卷，程序结束");
            return Ok(ProcessingStats::default());
        }

        logging::log_exams_loaded(exams.len());

        let stats = self.export_all(exams).await;
        logging::print_final_stats(stats.success, stats.failed, stats.total);

        Ok(stats)
    }

    /// 加载试卷：路径为目录时加载其中所有 TOML 文件
    async fn load_exams(&self) -> Result<Vec<(PathBuf, Exam)>> {
        let path = &self.config.exam_path;
        info!("\n📁 正在加载试卷: {}", path.display());

        if path.is_dir() {
            models::load_all_toml_files(path).await
        } else {
            let exam = models::load_toml_to_exam(path)
                .await
                .map_err(AppError::from)?;
            Ok(vec![(path.clone(), exam)])
        }
    }

    /// 导出所有试卷
    async fn export_all(&self, exams: Vec<(PathBuf, Exam)>) -> ProcessingStats {
        let mut stats = ProcessingStats {
            total: exams.len(),
            ..Default::default()
        };

        let mut handles: Vec<(String, ExportHandle)> = Vec::new();
        let mut used_names = HashSet::new();
        for (path, exam) in exams {
            let name = truncate_text(&exam.meta.title, 40);

            if let Err(e) = validate_exam(&exam, self.config.max_nesting_depth) {
                error!("[{}] ❌ 试卷校验失败 ({}): {}", name, path.display(), e);
                stats.failed += 1;
                continue;
            }

            let mut request = ExportRequest::from_config(&self.config, &exam);
            request.base_name = unique_base_name(&mut used_names, &request.base_name);
            let width = self.config.answer_line_width;
            info!("[{}] 📤 开始导出 ({} 分)", name, exam.total_points());
            handles.push((name, spawn_export(exam, request, move || TextWriter::new(width))));
        }

        for (name, handle) in handles {
            match handle.outcome().await {
                ExportOutcome::Completed(report) => {
                    info!(
                        "[{}] ✓ 导出完成: {} / {}",
                        name,
                        report.student_paper.display(),
                        report.answer_key.display()
                    );
                    stats.success += 1;
                }
                ExportOutcome::Failed(e) => {
                    error!("[{}] ❌ {}", name, AppError::from(e));
                    stats.failed += 1;
                }
                ExportOutcome::Cancelled => {
                    warn!("[{}] ⚠️ 导出已取消", name);
                    stats.failed += 1;
                }
            }
        }

        stats
    }
}

/// 同一批次中标题相同的试卷依次加上 `_2`、`_3` ... 后缀，避免输出文件互相覆盖
fn unique_base_name(used: &mut HashSet<String>, base: &str) -> String {
    if used.insert(base.to_string()) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}", base, n);
        if used.insert(candidate.clone()) {
            warn!("⚠️ 试卷文件名重复，改用: {}", candidate);
            return candidate;
        }
        n += 1;
    }
}
