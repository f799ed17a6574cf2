use super::*;
use crate::test_support::scratch_dir;

fn artifact(id: &str, bytes: &[u8]) -> OutputArtifact {
    OutputArtifact {
        identifier: id.to_string(),
        bytes: bytes.to_vec(),
    }
}

#[test]
fn dir_sink_creates_missing_directory() {
    let base = scratch_dir("sink_create");
    let out = base.join("nested").join("output");
    assert!(!out.exists());

    let sink = DirSink::create(&out).unwrap();
    assert!(out.is_dir());
    assert_eq!(sink.dir(), out.as_path());
}

#[test]
fn dir_sink_writes_final_file_without_leftovers() {
    let out = scratch_dir("sink_write");
    let sink = DirSink::create(&out).unwrap();
    let a = artifact("abc123", b"jpeg-bytes");

    sink.put(&a).unwrap();

    assert_eq!(std::fs::read(out.join("abc123.jpg")).unwrap(), b"jpeg-bytes");
    let names: Vec<String> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["abc123.jpg".to_string()]);
}

#[test]
fn rewriting_same_identifier_is_idempotent() {
    let out = scratch_dir("sink_idempotent");
    let sink = DirSink::create(&out).unwrap();
    let a = artifact("same", b"payload");

    sink.put(&a).unwrap();
    sink.put(&a).unwrap();

    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 1);
    assert_eq!(std::fs::read(sink.path_for(&a)).unwrap(), b"payload");
}

#[test]
fn dir_sink_reports_write_failures_with_path() {
    let out = scratch_dir("sink_fail");
    let sink = DirSink::create(&out).unwrap();
    std::fs::remove_dir_all(&out).unwrap();

    let err = sink.put(&artifact("gone", b"x")).unwrap_err();
    assert!(matches!(err, LayermixError::Write { .. }));
    assert!(err.to_string().contains("gone.jpg"));
}

#[test]
fn in_memory_sink_captures_artifacts() {
    let sink = InMemorySink::new();
    assert!(sink.is_empty());
    sink.put(&artifact("a", b"1")).unwrap();
    sink.put(&artifact("b", b"2")).unwrap();
    assert_eq!(sink.len(), 2);

    let ids: Vec<String> = sink
        .into_artifacts()
        .into_iter()
        .map(|a| a.identifier)
        .collect();
    assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
}
