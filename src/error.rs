use std::path::PathBuf;
use thiserror::Error;

use crate::models::QuestionId;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 导出错误
    #[error("导出失败: {0}")]
    Export(#[from] ExportError),
    /// 输入校验错误
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 导出错误（写入器收尾阶段的 I/O 失败）
#[derive(Debug, Error)]
pub enum ExportError {
    /// 写入或重命名文件失败
    #[error("写入 {} 失败: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 文档序列化失败
    #[error("文档序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
    /// 导出被取消
    #[error("导出已取消")]
    Cancelled,
    /// 后台任务异常退出
    #[error("导出任务异常退出: {0}")]
    TaskPanicked(String),
}

impl ExportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}

/// 输入校验错误
///
/// 这些都是结构性问题，必须在渲染之前被拒绝。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// 同一个标识出现在树的多个位置
    #[error("题目标识重复: {id}")]
    DuplicateId { id: QuestionId },
    /// 标题为空
    #[error("第 {label} 题标题为空")]
    EmptyTitle { label: String },
    /// 嵌套过深
    #[error("第 {label} 题嵌套深度 {depth} 超过上限 {max_depth}")]
    TooDeep {
        label: String,
        depth: usize,
        max_depth: usize,
    },
    /// 分值合计超出范围
    #[error("{label} 的分值合计超出范围")]
    PointsOverflow { label: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {}", .path.display())]
    NotFound { path: PathBuf },
    /// 读取失败
    #[error("读取文件失败 ({}): {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({}): {source}", .path.display())]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// 配置错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
