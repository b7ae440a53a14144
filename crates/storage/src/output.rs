// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output file state with restart-safe truncation
//!
//! `OutputState` owns the file handle and the buffered text encoder for one
//! writer. Every write is flushed to the OS before returning, so the byte
//! offset reported by [`OutputState::checkpoint`] never covers unflushed
//! text. On restart the file is cut back to the last committed offset,
//! dropping whatever a crashed run appended after its final checkpoint.

use jaw_core::{Charset, CharsetError, Checkpoint, OutputTarget};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from output file operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output is not open")]
    NotOpen,
    #[error("bad encoding configuration for output file: {0}")]
    Encoding(#[from] CharsetError),
    #[error(
        "current file size {actual} is smaller than size at last commit {expected}: {}",
        path.display()
    )]
    CorruptedState {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },
    #[error("could not write data to {}; the file may be corrupt: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to close {}: {source}", path.display())]
    CloseFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("file already exists: {}", .0.display())]
    FileExists(PathBuf),
    #[error("output file was not found: {}", .0.display())]
    OutputMissing(PathBuf),
    #[error("file is not writable: {}", .0.display())]
    NotWritable(PathBuf),
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Buffered writer that encodes text into the target charset
struct TextSink {
    writer: BufWriter<File>,
    charset: Charset,
    force_sync: bool,
    scratch: Vec<u8>,
}

impl TextSink {
    fn new(file: File, charset: Charset, force_sync: bool) -> Self {
        Self {
            writer: BufWriter::new(file),
            charset,
            force_sync,
            scratch: Vec::new(),
        }
    }

    /// Encode the whole text before handing any byte to the buffer, so an
    /// unmappable character leaves the file untouched.
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.scratch.clear();
        self.charset
            .encode_into(text, &mut self.scratch)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.writer.write_all(&self.scratch)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        if self.force_sync {
            self.writer.get_ref().sync_data()?;
        }
        Ok(())
    }

    fn position(&mut self) -> io::Result<u64> {
        self.writer.stream_position()
    }

    fn file_mut(&mut self) -> &mut File {
        self.writer.get_mut()
    }
}

/// Open output file plus committed-offset bookkeeping
pub struct OutputState {
    target: OutputTarget,
    sink: Option<TextSink>,
    bytes_written: u64,
    records_written: u64,
    committed_records: u64,
    restarted: bool,
}

impl OutputState {
    /// Open the target file.
    ///
    /// `resume` is the checkpoint of a previous incomplete run; when present
    /// the file is truncated back to its committed offset.
    pub fn open(target: OutputTarget, resume: Option<&Checkpoint>) -> Result<Self, OutputError> {
        let charset: Charset = target.encoding.parse()?;
        let path = target.path.clone();
        let restarted = resume.is_some();

        prepare_file(&target, restarted)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(!restarted)
            .open(&path)
            .map_err(|source| io_error(&path, source))?;

        let (bytes_written, records_written) = match resume {
            Some(checkpoint) => {
                truncate_file(&mut file, &path, checkpoint.bytes_written)?;
                (checkpoint.bytes_written, checkpoint.records_written)
            }
            None => {
                let end = file
                    .seek(SeekFrom::End(0))
                    .map_err(|source| io_error(&path, source))?;
                (end, 0)
            }
        };

        tracing::info!(
            path = %path.display(),
            encoding = %charset,
            restarted,
            offset = bytes_written,
            "output opened"
        );

        Ok(Self {
            sink: Some(TextSink::new(file, charset, target.force_sync)),
            target,
            bytes_written,
            records_written,
            committed_records: records_written,
            restarted,
        })
    }

    /// Append text holding `records` complete records and flush it to the OS
    pub fn write(&mut self, text: &str, records: u64) -> Result<(), OutputError> {
        let path = &self.target.path;
        let sink = self.sink.as_mut().ok_or(OutputError::NotOpen)?;

        sink.write_str(text)
            .and_then(|()| sink.flush())
            .map_err(|source| OutputError::WriteFailed {
                path: path.clone(),
                source,
            })?;

        self.records_written += records;
        tracing::debug!(bytes = text.len(), records, "output written");
        Ok(())
    }

    /// Mark everything written so far as committed and return the offset
    pub fn checkpoint(&mut self) -> Result<u64, OutputError> {
        let path = &self.target.path;
        let sink = self.sink.as_mut().ok_or(OutputError::NotOpen)?;

        let position = sink
            .flush()
            .and_then(|()| sink.position())
            .map_err(|source| io_error(path, source))?;

        self.bytes_written = position;
        self.committed_records = self.records_written;
        Ok(position)
    }

    /// Discard everything written since the last checkpoint
    pub fn truncate(&mut self) -> Result<(), OutputError> {
        let path = &self.target.path;
        let sink = self.sink.as_mut().ok_or(OutputError::NotOpen)?;

        sink.flush().map_err(|source| io_error(path, source))?;
        truncate_file(sink.file_mut(), path, self.bytes_written)?;
        self.records_written = self.committed_records;
        Ok(())
    }

    /// Write closing text that is not a record (the array footer)
    pub fn write_footer(&mut self, text: &str) -> Result<(), OutputError> {
        let path = &self.target.path;
        let sink = self.sink.as_mut().ok_or(OutputError::NotOpen)?;

        sink.write_str(text)
            .and_then(|()| sink.flush())
            .map_err(|source| OutputError::CloseFailed {
                path: path.clone(),
                source,
            })
    }

    /// Flush and release the buffer and the file handle.
    ///
    /// Both are attempted even if the first fails; the first failure is
    /// returned. Closing a closed state is a no-op.
    pub fn close(&mut self) -> Result<(), OutputError> {
        let Some(sink) = self.sink.take() else {
            return Ok(());
        };
        self.restarted = false;

        let path = &self.target.path;
        let mut first_error: Option<io::Error> = None;

        let file = match sink.writer.into_inner() {
            Ok(file) => file,
            Err(e) => {
                let (error, writer) = e.into_parts();
                first_error = Some(error);
                // Unflushed bytes are dropped; the handle is still released
                let (file, _unwritten) = writer.into_parts();
                file
            }
        };

        if self.target.transactional || self.target.force_sync {
            if let Err(e) = file.sync_all() {
                first_error.get_or_insert(e);
            }
        }
        drop(file);

        match first_error {
            Some(source) => {
                tracing::error!(path = %path.display(), error = %source, "output close failed");
                Err(OutputError::CloseFailed {
                    path: path.clone(),
                    source,
                })
            }
            None => {
                tracing::debug!(path = %path.display(), "output closed");
                Ok(())
            }
        }
    }

    /// Release the handle without flushing; buffered bytes are dropped
    pub fn abandon(&mut self) {
        let Some(sink) = self.sink.take() else {
            return;
        };
        self.restarted = false;
        let (file, unflushed) = sink.writer.into_parts();
        drop(file);
        tracing::warn!(
            path = %self.target.path.display(),
            dropped = unflushed.map_or(0, |bytes| bytes.len()),
            "output abandoned"
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.sink.is_some()
    }

    pub fn is_restarted(&self) -> bool {
        self.restarted
    }

    /// Offset of the last checkpoint
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Records appended over the writer's lifetime, including prior runs
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    pub fn path(&self) -> &Path {
        &self.target.path
    }
}

/// Apply the delete-if-exists / append / restart policies before opening
fn prepare_file(target: &OutputTarget, restarted: bool) -> Result<(), OutputError> {
    let path = &target.path;
    let exists = path.exists();

    if restarted {
        if !exists {
            return Err(OutputError::OutputMissing(path.clone()));
        }
    } else if exists && !target.append_allowed {
        if !target.delete_if_exists {
            return Err(OutputError::FileExists(path.clone()));
        }
        fs::remove_file(path).map_err(|source| io_error(path, source))?;
        tracing::debug!(path = %path.display(), "deleted existing output");
    }

    if path.exists() {
        let metadata = fs::metadata(path).map_err(|source| io_error(path, source))?;
        if metadata.permissions().readonly() {
            return Err(OutputError::NotWritable(path.clone()));
        }
    } else if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }
    }

    Ok(())
}

/// Cut the file back to `offset` and move the cursor there
fn truncate_file(file: &mut File, path: &Path, offset: u64) -> Result<(), OutputError> {
    let size = file
        .metadata()
        .map_err(|source| io_error(path, source))?
        .len();

    if size < offset {
        return Err(OutputError::CorruptedState {
            path: path.to_path_buf(),
            expected: offset,
            actual: size,
        });
    }

    file.set_len(offset)
        .and_then(|()| file.seek(SeekFrom::Start(offset)))
        .map_err(|source| io_error(path, source))?;

    if size > offset {
        tracing::info!(
            path = %path.display(),
            offset,
            discarded = size - offset,
            "output truncated to last checkpoint"
        );
    }
    Ok(())
}

fn io_error(path: &Path, source: io::Error) -> OutputError {
    OutputError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
