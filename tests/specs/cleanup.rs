//! Existing, empty and read-only outputs

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn empty_run_with_delete_if_empty_leaves_no_file() {
    let scratch = Scratch::new();
    let mut writer = scratch.raw_writer(scratch.target().with_delete_if_empty(true));

    writer.open(&ExecutionContext::new()).unwrap();
    writer.close().unwrap();

    assert!(!scratch.output.exists());
}

#[test]
fn empty_run_without_delete_if_empty_leaves_empty_file() {
    let scratch = Scratch::new();
    let mut writer = scratch.raw_writer(scratch.target());

    writer.open(&ExecutionContext::new()).unwrap();
    writer.close().unwrap();

    assert_eq!(scratch.contents(), "");
}

#[test]
fn existing_output_is_replaced_by_default() {
    let scratch = Scratch::new();
    std::fs::write(&scratch.output, "stale contents").unwrap();
    let mut writer = scratch.raw_writer(scratch.target());

    writer.open(&ExecutionContext::new()).unwrap();
    writer.write(&fragments(&["true"])).unwrap();
    writer.close().unwrap();

    assert_eq!(scratch.contents(), "[true]");
}

#[test]
fn existing_output_is_kept_when_overwrite_disabled() {
    let scratch = Scratch::new();
    std::fs::write(&scratch.output, "precious").unwrap();
    let mut writer = scratch.raw_writer(scratch.target().with_delete_if_exists(false));

    let err = writer.open(&ExecutionContext::new()).unwrap_err();

    assert!(matches!(
        err,
        WriterError::Output(OutputError::FileExists(_))
    ));
    assert_eq!(scratch.contents(), "precious");
}

#[test]
fn missing_parent_directories_are_created() {
    let scratch = Scratch::new();
    let nested = scratch.dir.path().join("a/b/c/out.json");
    let mut writer = scratch.raw_writer(OutputTarget::new(&nested));

    writer.open(&ExecutionContext::new()).unwrap();
    writer.write(&fragments(&["1"])).unwrap();
    writer.close().unwrap();

    assert_eq!(read(&nested), "[1]");
}

#[test]
fn read_only_output_is_not_writable() {
    let scratch = Scratch::new();
    std::fs::write(&scratch.output, "").unwrap();
    let mut permissions = std::fs::metadata(&scratch.output).unwrap().permissions();
    permissions.set_readonly(true);
    std::fs::set_permissions(&scratch.output, permissions).unwrap();
    let mut writer = scratch.raw_writer(scratch.target().with_append_allowed(true));

    let err = writer.open(&ExecutionContext::new()).unwrap_err();

    assert!(matches!(
        err,
        WriterError::Output(OutputError::NotWritable(_))
    ));
}
