use exam_export::orchestrator::{CancelFlag, ExportJob};
use exam_export::{
    spawn_export, Exam, ExamMeta, ExportError, ExportOutcome, ExportRequest, Question,
    RecordingWriter, RenderOptions, TextWriter,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

fn request(dir: &Path) -> ExportRequest {
    ExportRequest {
        output_dir: dir.to_path_buf(),
        base_name: "Klausur_Netze".to_string(),
        student_suffix: "Klausur".to_string(),
        answer_key_suffix: "Musterloesung".to_string(),
        options: RenderOptions {
            answer_line_width: 20,
        },
    }
}

fn exam() -> Exam {
    Exam::new(ExamMeta {
        title: "Klausur Netze".to_string(),
        ..Default::default()
    })
    .with_question(
        Question::open("Routing", 0, 0)
            .with_child(Question::open("a", 3, 2).with_solution("Dijkstra"))
            .with_child(Question::open("b", 4, 2).with_solution("Bellman-Ford")),
    )
}

#[tokio::test]
async fn export_writes_student_paper_and_answer_key() {
    let dir = tempfile::tempdir().unwrap();

    let outcome = spawn_export(exam(), request(dir.path()), TextWriter::default)
        .outcome()
        .await;

    let report = outcome.into_result().unwrap();
    assert_eq!(report.questions, 3);
    assert_eq!(report.total_points, 7);

    let student = std::fs::read_to_string(&report.student_paper).unwrap();
    let key = std::fs::read_to_string(&report.answer_key).unwrap();
    assert!(student.contains("1. Routing (3 + 4 = 7 Punkte)"));
    assert!(!student.contains("Dijkstra"));
    assert!(key.contains("Lösung: Dijkstra"));
    assert!(key.contains("Lösung: Bellman-Ford"));

    // 没有残留的临时文件
    let leftovers = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("tmp"))
        .count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn cancelled_export_produces_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let cancel = CancelFlag::new();
    cancel.cancel();

    let handle = ExportJob::new(exam(), request(dir.path()), TextWriter::default)
        .spawn_with(cancel);
    let outcome = handle.outcome().await;

    assert!(matches!(outcome, ExportOutcome::Cancelled));
    assert!(matches!(outcome.into_result(), Err(ExportError::Cancelled)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn export_failure_is_reported_not_swallowed() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("datei");
    std::fs::write(&blocker, "kein Verzeichnis").unwrap();

    let outcome = spawn_export(exam(), request(&blocker), TextWriter::default)
        .outcome()
        .await;

    assert!(matches!(outcome, ExportOutcome::Failed(ExportError::Io { .. })));
}

#[tokio::test]
async fn snapshot_is_isolated_from_later_edits() {
    let dir = tempfile::tempdir().unwrap();
    let live = Arc::new(RwLock::new(exam()));

    let snapshot = Exam::snapshot(&live).await;
    let handle = spawn_export(snapshot, request(dir.path()), RecordingWriter::new);

    // 编辑器在导出期间继续修改原试卷
    live.write().await.questions[0].children.clear();

    let report = handle.outcome().await.into_result().unwrap();
    assert_eq!(report.total_points, 7);
    assert_eq!(live.read().await.total_points(), 0);

    let dump = std::fs::read_to_string(&report.answer_key).unwrap();
    assert!(report.answer_key.extension().is_some_and(|e| e == "json"));
    assert!(dump.contains("Lösung: Dijkstra"));
}

#[test]
fn export_runs_on_blocking_pool_from_sync_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_path_buf();

    let report = tokio_test::block_on(async move {
        spawn_export(exam(), request(&path), TextWriter::default)
            .outcome()
            .await
            .into_result()
    })
    .unwrap();

    assert!(report.student_paper.exists());
    assert!(report.answer_key.exists());
}
