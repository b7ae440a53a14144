//! Uninterrupted runs produce one well-formed array

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn batches_join_into_one_array() {
    let scratch = Scratch::new();
    let mut ctx = ExecutionContext::new();
    let mut writer = scratch.raw_writer(scratch.target());

    writer.open(&ctx).unwrap();
    writer
        .write(&fragments(&[r#"{"id":1}"#, r#"{"id":2}"#]))
        .unwrap();
    writer.update(&mut ctx).unwrap();
    writer.write(&fragments(&[r#"{"id":3}"#])).unwrap();
    writer.update(&mut ctx).unwrap();
    writer.close().unwrap();

    assert_eq!(scratch.contents(), r#"[{"id":1},{"id":2},{"id":3}]"#);
}

#[test]
fn serde_records_round_trip_through_file() {
    let scratch = Scratch::new();
    let records = vec![
        json!({"name": "Zoë", "tags": ["a", "b"]}),
        json!({"name": "<b>&amp;</b>", "n": 1.5}),
        json!(null),
    ];
    let mut writer =
        JsonArrayWriter::new(JsonEncoder::<Value>::new()).with_target(scratch.target());

    writer.open(&ExecutionContext::new()).unwrap();
    writer.write(&records).unwrap();
    writer.close().unwrap();

    let parsed: Vec<Value> = serde_json::from_str(&scratch.contents()).unwrap();
    assert_eq!(parsed, records);
}

#[test]
fn usage_outside_open_does_no_io() {
    let scratch = Scratch::new();
    let mut ctx = ExecutionContext::new();
    let mut writer = scratch.raw_writer(scratch.target());

    assert!(matches!(
        writer.write(&fragments(&["1"])),
        Err(WriterError::NotOpen)
    ));
    assert!(matches!(writer.update(&mut ctx), Err(WriterError::NotOpen)));
    assert!(!scratch.output.exists());

    writer.open(&ctx).unwrap();
    writer.close().unwrap();
    assert!(matches!(
        writer.write(&fragments(&["1"])),
        Err(WriterError::NotOpen)
    ));
    assert_eq!(scratch.contents(), "");
}

#[test]
fn append_mode_starts_a_new_array_after_existing_bytes() {
    let scratch = Scratch::new();
    std::fs::write(&scratch.output, "[0]\n").unwrap();
    let mut writer = scratch.raw_writer(scratch.target().with_append_allowed(true));

    writer.open(&ExecutionContext::new()).unwrap();
    writer.write(&fragments(&["1", "2"])).unwrap();
    writer.close().unwrap();

    assert_eq!(scratch.contents(), "[0]\n[1,2]");
}

#[test]
fn utf16_output_is_encoded() {
    let scratch = Scratch::new();
    let mut writer = scratch.raw_writer(scratch.target().with_encoding("UTF-16LE"));

    writer.open(&ExecutionContext::new()).unwrap();
    writer.write(&fragments(&["1"])).unwrap();
    writer.close().unwrap();

    assert_eq!(
        std::fs::read(&scratch.output).unwrap(),
        vec![b'[', 0, b'1', 0, b']', 0]
    );
}

#[test]
fn unsupported_encoding_fails_before_touching_the_file() {
    let scratch = Scratch::new();
    let mut writer = scratch.raw_writer(scratch.target().with_encoding("EBCDIC"));

    let err = writer.open(&ExecutionContext::new()).unwrap_err();

    assert!(matches!(
        err,
        WriterError::Output(OutputError::Encoding(_))
    ));
    assert!(!scratch.output.exists());
}
