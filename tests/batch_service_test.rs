//! Tests for BatchService

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use rxtree::application::{ApplicationError, BatchService, VisualizeService};
use rxtree::domain::{DomainError, MalformedPostfix};
use rxtree::infrastructure::traits::{FileSystem, RealFileSystem};
use rxtree::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

/// In-memory filesystem for service tests.
#[derive(Default)]
struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    fn with_file(path: &str, content: &str) -> Self {
        let fs = Self::default();
        fs.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        fs
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "not found"))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}

fn service(fs: impl FileSystem + 'static) -> BatchService {
    BatchService::new(Arc::new(fs), Arc::new(VisualizeService::default()))
}

#[test]
fn given_file_with_blank_lines_when_processing_then_skips_them_and_keeps_line_numbers() {
    let svc = service(MemoryFileSystem::with_file(
        "/exprs.txt",
        "ab.\n\n   \n  ab|*  \nabc||\n",
    ));
    let mut seen = Vec::new();

    let count = svc
        .process(Path::new("/exprs.txt"), |line, vis| {
            seen.push((line, vis.postfix.clone(), vis.layout.len()));
            Ok(())
        })
        .unwrap();

    assert_eq!(count, 3);
    assert_eq!(
        seen,
        vec![
            (1, "ab.".to_string(), 3),
            (4, "ab|*".to_string(), 4),
            (5, "abc||".to_string(), 5),
        ]
    );
}

#[test]
fn given_malformed_line_when_processing_then_aborts_after_earlier_lines() {
    let svc = service(MemoryFileSystem::with_file("/exprs.txt", "ab.\na.\nab|\n"));
    let mut seen = Vec::new();

    let err = svc
        .process(Path::new("/exprs.txt"), |line, _| {
            seen.push(line);
            Ok(())
        })
        .unwrap_err();

    assert_eq!(seen, vec![1]);
    match err {
        ApplicationError::BatchLine {
            line,
            expression,
            source,
        } => {
            assert_eq!(line, 2);
            assert_eq!(expression, "a.");
            assert!(matches!(
                source,
                DomainError::MalformedPostfix(MalformedPostfix::InsufficientOperands { .. })
            ));
        }
        other => panic!("expected batch line error, got {:?}", other),
    }
}

#[test]
fn given_missing_file_when_processing_then_input_not_found() {
    let svc = service(MemoryFileSystem::default());

    let err = svc.process(Path::new("/nope.txt"), |_, _| Ok(())).unwrap_err();

    assert!(matches!(err, ApplicationError::InputNotFound(p) if p == Path::new("/nope.txt")));
}

#[test]
fn given_sink_error_when_processing_then_propagates() {
    let svc = service(MemoryFileSystem::with_file("/exprs.txt", "a\nb\n"));

    let err = svc
        .process(Path::new("/exprs.txt"), |_, _| {
            Err(ApplicationError::Render {
                message: "sink closed".to_string(),
            })
        })
        .unwrap_err();

    assert!(matches!(err, ApplicationError::Render { .. }));
}

#[test]
fn given_real_file_when_processing_then_reads_from_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("exprs.txt");
    std::fs::write(&path, "ab.c|\nab.\n").unwrap();
    let svc = service(RealFileSystem);

    let count = svc.process(&path, |_, _| Ok(())).unwrap();

    assert_eq!(count, 2);
}

#[test]
fn given_empty_file_when_processing_then_processes_nothing() {
    let svc = service(MemoryFileSystem::with_file("/empty.txt", "\n\n"));
    assert_eq!(svc.process(Path::new("/empty.txt"), |_, _| Ok(())).unwrap(), 0);
}
