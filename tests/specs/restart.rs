//! Crash and resume against a persisted checkpoint

use crate::prelude::*;
use crate::prelude::assert_eq;
use jaw_engine::JsonLinesReader;
use std::io::Cursor;

fn batches() -> Vec<Vec<String>> {
    vec![
        fragments(&["1", "2"]),
        fragments(&["3"]),
        fragments(&["4", "5", "6"]),
        fragments(&["7"]),
    ]
}

#[test]
fn resume_through_json_store_is_byte_identical() {
    let clean = Scratch::new();
    {
        let mut ctx = ExecutionContext::new();
        let mut writer = clean.raw_writer(clean.target());
        writer.open(&ctx).unwrap();
        for batch in batches() {
            writer.write(&batch).unwrap();
            writer.update(&mut ctx).unwrap();
        }
        writer.close().unwrap();
    }

    let crashed = Scratch::new();
    let mut store = JsonContextStore::open(crashed.state_dir()).unwrap();
    {
        let mut ctx = ExecutionContext::new();
        let mut writer = crashed.raw_writer(crashed.target());
        writer.open(&ctx).unwrap();
        for batch in &batches()[..2] {
            writer.write(batch).unwrap();
            writer.update(&mut ctx).unwrap();
            store.save("export", &ctx).unwrap();
        }
        // Flushed after the last checkpoint, then the process dies
        writer.write(&batches()[2]).unwrap();
    }

    let mut ctx = store.load("export").unwrap();
    let mut writer = crashed.raw_writer(crashed.target());
    writer.open(&ctx).unwrap();
    assert_eq!(crashed.contents(), "[1,2,3");
    for batch in &batches()[2..] {
        writer.write(batch).unwrap();
        writer.update(&mut ctx).unwrap();
    }
    writer.close().unwrap();

    assert_eq!(crashed.contents(), clean.contents());
    assert_eq!(crashed.contents(), "[1,2,3,4,5,6,7]");
}

#[test]
fn truncation_discards_uncommitted_bytes() {
    let scratch = Scratch::new();
    let mut ctx = ExecutionContext::new();
    let checkpoint = {
        let mut writer = scratch.raw_writer(scratch.target());
        writer.open(&ctx).unwrap();
        writer.write(&fragments(&[r#"{"id":1}"#])).unwrap();
        let checkpoint = writer.update(&mut ctx).unwrap();
        writer.write(&fragments(&[r#"{"id":2}"#])).unwrap();
        checkpoint
    };

    let mut writer = scratch.raw_writer(scratch.target());
    writer.open(&ctx).unwrap();

    let len = std::fs::metadata(&scratch.output).unwrap().len();
    assert_eq!(len, checkpoint.bytes_written);
    assert_eq!(scratch.contents(), r#"[{"id":1}"#);
}

#[test]
fn shrunken_file_is_corrupted_state() {
    let scratch = Scratch::new();
    std::fs::write(&scratch.output, vec![b' '; 40]).unwrap();
    let mut ctx = ExecutionContext::new();
    ctx.put(
        jaw_engine::DEFAULT_WRITER_NAME,
        &Checkpoint {
            has_elements: true,
            bytes_written: 50,
            records_written: 3,
        },
    )
    .unwrap();

    let err = scratch
        .raw_writer(scratch.target())
        .open(&ctx)
        .unwrap_err();

    assert!(matches!(
        err,
        WriterError::Output(OutputError::CorruptedState {
            expected: 50,
            actual: 40,
            ..
        })
    ));
    assert_eq!(std::fs::metadata(&scratch.output).unwrap().len(), 40);
}

#[test]
fn vanished_output_on_restart_is_reported() {
    let scratch = Scratch::new();
    let mut ctx = ExecutionContext::new();
    {
        let mut writer = scratch.raw_writer(scratch.target());
        writer.open(&ctx).unwrap();
        writer.write(&fragments(&["1"])).unwrap();
        writer.update(&mut ctx).unwrap();
    }
    std::fs::remove_file(&scratch.output).unwrap();

    let err = scratch
        .raw_writer(scratch.target())
        .open(&ctx)
        .unwrap_err();

    assert!(matches!(
        err,
        WriterError::Output(OutputError::OutputMissing(_))
    ));
}

#[test]
fn chunk_step_resumes_json_lines_input() {
    let scratch = Scratch::new();
    let input = "{\"n\":1}\n{\"n\":2}\n{\"n\":3}\n{\"n\":4}\n{\"n\":5}\n";
    let torn = "{\"n\":1}\n{\"n\":2}\n{\"n\":3}\n{\"n\":";
    let mut store = JsonContextStore::open(scratch.state_dir()).unwrap();
    let step = ChunkStep::new("export", 2).unwrap();

    {
        let mut reader = JsonLinesReader::new(Cursor::new(torn.to_string()));
        let mut writer =
            JsonArrayWriter::new(JsonEncoder::<Value>::new()).with_target(scratch.target());
        let err = step.run(&mut reader, &mut writer, &mut store).unwrap_err();
        assert!(matches!(err, jaw_engine::StepError::Read(_)));
    }
    assert_eq!(scratch.contents(), r#"[{"n":1},{"n":2}"#);

    let mut reader = JsonLinesReader::new(Cursor::new(input.to_string()));
    let mut writer =
        JsonArrayWriter::new(JsonEncoder::<Value>::new()).with_target(scratch.target());
    let outcome = step.run(&mut reader, &mut writer, &mut store).unwrap();

    assert_eq!(outcome, StepOutcome::Completed { records: 3, chunks: 2 });
    assert_eq!(
        scratch.contents(),
        r#"[{"n":1},{"n":2},{"n":3},{"n":4},{"n":5}]"#
    );
    assert!(store.load_stored("export").unwrap().is_none());
}
