//! 文档写入器 - 基础设施层
//!
//! 渲染引擎只认识这里的抽象调用（段落 / 表格 / 分页 / 图片），
//! 不关心这些调用最终变成什么格式的文件。

use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::ExportError;

/// 段落对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// 段落样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ParagraphStyle {
    pub bold: bool,
    /// 字号（磅），None 表示正文默认字号
    pub size: Option<u16>,
    pub align: Align,
}

impl ParagraphStyle {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn size(mut self, size: u16) -> Self {
        self.size = Some(size);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// 表格句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TableId(pub usize);

/// 抽象文档写入器
///
/// 所有调用都不会失败；真正的 I/O 发生在 [`ExportSink::stage`]。
pub trait DocumentWriter {
    fn add_paragraph(&mut self, text: &str, style: ParagraphStyle);
    fn add_table(&mut self, rows: usize, cols: usize) -> TableId;
    fn set_cell(&mut self, table: TableId, row: usize, col: usize, text: &str);
    fn add_page_break(&mut self);
    fn add_image(&mut self, bytes: &[u8]);
}

/// 可以落盘的写入器
pub trait ExportSink: DocumentWriter + Send + Sized {
    /// 输出文件扩展名（不含点）
    fn file_extension(&self) -> &'static str;

    /// 序列化后的文件内容
    fn into_bytes(self) -> Result<Vec<u8>, ExportError>;

    /// 写入临时文件，等待 [`StagedFile::commit`] 改名为目标文件
    fn stage(self, target: &Path) -> Result<StagedFile, ExportError> {
        let bytes = self.into_bytes()?;
        StagedFile::write(target, &bytes)
    }
}

/// 已写入临时文件、尚未改名的输出
///
/// 临时文件与目标文件在同一目录，文件名随机，同时进行的导出互不干扰。
/// 没有 commit 就被丢弃时删除临时文件，目标路径上不会出现半成品。
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    target_path: PathBuf,
}

impl StagedFile {
    fn write(target: &Path, bytes: &[u8]) -> Result<Self, ExportError> {
        let parent = match target.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
                parent
            }
            None => Path::new("."),
        };

        let prefix = format!(
            ".{}.",
            target.file_name().unwrap_or_default().to_string_lossy()
        );
        let mut temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(|e| ExportError::io(parent, e))?;

        temp.write_all(bytes)
            .map_err(|e| ExportError::io(temp.path(), e))?;
        debug!("已写入临时文件: {}", temp.path().display());

        Ok(Self {
            temp,
            target_path: target.to_path_buf(),
        })
    }

    /// 改名为目标文件
    pub fn commit(self) -> Result<PathBuf, ExportError> {
        let Self { temp, target_path } = self;
        temp.persist(&target_path)
            .map_err(|e| ExportError::io(&target_path, e.error))?;
        debug!("已改名为目标文件: {}", target_path.display());
        Ok(target_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_builder() {
        let style = ParagraphStyle::plain().bold().size(16).align(Align::Center);
        assert!(style.bold);
        assert_eq!(style.size, Some(16));
        assert_eq!(style.align, Align::Center);
        assert_eq!(ParagraphStyle::plain(), ParagraphStyle::default());
    }

    #[test]
    fn test_staged_file_commit_renames() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("sub").join("out.txt");

        let staged = StagedFile::write(&target, b"hallo").unwrap();
        assert!(!target.exists());

        let path = staged.commit().unwrap();
        assert_eq!(path, target);
        assert_eq!(fs::read_to_string(&target).unwrap(), "hallo");
        assert_eq!(fs::read_dir(dir.path().join("sub")).unwrap().count(), 1);
    }

    #[test]
    fn test_staged_files_for_same_target_do_not_share_temp() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");

        let first = StagedFile::write(&target, b"eins").unwrap();
        let second = StagedFile::write(&target, b"zwei").unwrap();
        assert_ne!(first.temp.path(), second.temp.path());

        // 丢弃其中一个不会影响另一个的临时文件
        drop(first);
        let path = second.commit().unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "zwei");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_dropped_staged_file_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");

        let staged = StagedFile::write(&target, b"hallo").unwrap();
        drop(staged);

        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
