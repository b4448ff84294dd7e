use crate::error::FileError;
use crate::models::exam::Exam;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载试卷
pub async fn load_toml_to_exam(toml_file_path: &Path) -> Result<Exam, FileError> {
    if !toml_file_path.exists() {
        return Err(FileError::NotFound {
            path: toml_file_path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: toml_file_path.to_path_buf(),
            source,
        })?;

    parse_exam(&content).map_err(|source| FileError::TomlParseFailed {
        path: toml_file_path.to_path_buf(),
        source,
    })
}

/// 解析 TOML 文本
pub fn parse_exam(content: &str) -> Result<Exam, toml::de::Error> {
    toml::from_str(content)
}

/// 从文件夹中加载所有 TOML 试卷，按文件名排序
///
/// 单个文件解析失败只记录警告，不影响其他文件。
pub async fn load_all_toml_files(folder_path: &Path) -> Result<Vec<(PathBuf, Exam)>> {
    if !folder_path.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path.display());
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(folder_path)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut exams = Vec::new();
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_toml_to_exam(&path).await {
            Ok(exam) => {
                tracing::info!("成功加载 {} 个题目", exam.question_count());
                exams.push((path, exam));
            }
            Err(e) => {
                tracing::warn!("加载文件失败: {}", e);
            }
        }
    }

    Ok(exams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionKind;

    const SAMPLE: &str = r#"
title = "Klausur Rechnernetze"
module = "RN"
semester = "WiSe 2025/26"
permitted_aids = "Taschenrechner"
time_allowance = "90 Minuten"

[[question]]
title = "Grundlagen"
type = "open"
points = 0

[[question.children]]
title = "OSI"
type = "open"
points = 4
answer_lines = 3
solution = "Sieben Schichten"

[[question.children]]
title = "TCP"
type = "true_false"
points = 2
solution = "Richtig"

[[question]]
title = "Protokolle"
type = "multiple_choice"
points = 5
body = "A) HTTP\nB) FTP"
solution = "A"
start_on_new_page = true
"#;

    #[test]
    fn test_parse_exam_nested_questions() {
        let exam = parse_exam(SAMPLE).unwrap();

        assert_eq!(exam.meta.title, "Klausur Rechnernetze");
        assert_eq!(exam.meta.permitted_aids, "Taschenrechner");
        assert_eq!(exam.questions.len(), 2);
        assert_eq!(exam.questions[0].children.len(), 2);
        assert_eq!(exam.question_count(), 4);
        assert_eq!(exam.total_points(), 11);
        assert!(exam.questions[1].start_on_new_page);
        assert_eq!(
            exam.questions[0].children[0].kind,
            QuestionKind::Open {
                answer_lines: 3,
                solution: "Sieben Schichten".to_string()
            }
        );
    }

    #[test]
    fn test_parse_exam_assigns_distinct_ids() {
        let exam = parse_exam(SAMPLE).unwrap();
        assert_ne!(exam.questions[0].id, exam.questions[1].id);
        assert_ne!(exam.questions[0].children[0].id, exam.questions[0].children[1].id);
    }

    #[test]
    fn test_parse_exam_rejects_unknown_type() {
        let result = parse_exam("title = \"x\"\n[[question]]\ntitle = \"q\"\ntype = \"essay\"\n");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_toml_to_exam(&dir.path().join("missing.toml")).await;
        assert!(matches!(result, Err(FileError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_load_all_toml_files_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.toml"), SAMPLE).unwrap();
        std::fs::write(dir.path().join("b.toml"), "title = ").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let exams = load_all_toml_files(dir.path()).await.unwrap();

        assert_eq!(exams.len(), 1);
        assert!(exams[0].0.ends_with("a.toml"));
    }
}
