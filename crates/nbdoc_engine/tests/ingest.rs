use std::fs;

use nbdoc_core::{FailureKind, SelectedFile};
use nbdoc_engine::{read_all, IngestSettings, ReadError};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> SelectedFile {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    SelectedFile::from_path(path)
}

#[tokio::test]
async fn contents_follow_selection_order() {
    let dir = TempDir::new().unwrap();
    let files = vec![
        write(&dir, "b.ipynb", b"{\"b\": 1}"),
        write(&dir, "a.ipynb", b"{\"a\": 1}"),
        write(&dir, "c.ipynb", b"{\"c\": 1}"),
    ];

    let contents = read_all(&files, &IngestSettings::default()).await.unwrap();
    let names: Vec<&str> = contents.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["b.ipynb", "a.ipynb", "c.ipynb"]);
    assert_eq!(contents[1].text, "{\"a\": 1}");
}

#[tokio::test]
async fn byte_order_mark_is_dropped() {
    let dir = TempDir::new().unwrap();
    let files = vec![write(&dir, "bom.ipynb", b"\xEF\xBB\xBF{\"cells\": []}")];

    let contents = read_all(&files, &IngestSettings::default()).await.unwrap();
    assert_eq!(contents[0].text, "{\"cells\": []}");
}

#[tokio::test]
async fn one_undecodable_file_fails_the_batch() {
    let dir = TempDir::new().unwrap();
    let files = vec![
        write(&dir, "good.ipynb", b"{}"),
        write(&dir, "bad.ipynb", b"{\"x\": \"\xFF\xFE\"}"),
    ];

    let err = read_all(&files, &IngestSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ReadError::Decode { .. }));
    assert_eq!(err.file(), "bad.ipynb");
    assert!(matches!(
        FailureKind::from(err),
        FailureKind::BatchReadFailure { file, .. } if file == "bad.ipynb"
    ));
}

#[tokio::test]
async fn missing_file_is_an_io_failure() {
    let dir = TempDir::new().unwrap();
    let files = vec![SelectedFile::from_path(dir.path().join("gone.ipynb"))];

    let err = read_all(&files, &IngestSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ReadError::Io { .. }));
    assert_eq!(err.file(), "gone.ipynb");
}

#[tokio::test]
async fn oversized_file_is_rejected_before_reading() {
    let dir = TempDir::new().unwrap();
    let files = vec![write(&dir, "big.ipynb", &[b' '; 64])];
    let settings = IngestSettings { max_file_bytes: 16 };

    let err = read_all(&files, &settings).await.unwrap_err();
    match err {
        ReadError::TooLarge { size, limit, .. } => {
            assert_eq!(size, 64);
            assert_eq!(limit, 16);
        }
        other => panic!("expected size failure, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_batch_reads_nothing() {
    let contents = read_all(&[], &IngestSettings::default()).await.unwrap();
    assert!(contents.is_empty());
}
