// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restartable record sources for the chunk step
//!
//! Readers persist how many records they have handed out; on restart they
//! skip that many so the step picks up exactly where the last committed
//! chunk ended.

use crate::error::ReaderError;
use jaw_core::ExecutionContext;
use serde_json::Value;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Source of records for a chunk step
pub trait ItemReader {
    type Item;

    /// Prepare for reading, skipping what a previous run already consumed
    fn open(&mut self, ctx: &ExecutionContext) -> Result<(), ReaderError>;

    /// Next record, or `None` once the input is exhausted
    fn read(&mut self) -> Result<Option<Self::Item>, ReaderError>;

    /// Record the read position in `ctx`
    fn update(&mut self, ctx: &mut ExecutionContext) -> Result<(), ReaderError>;
}

/// Reads one JSON value per line; blank lines are skipped
pub struct JsonLinesReader<R> {
    name: String,
    source: R,
    line: u64,
    read_count: u64,
    buf: String,
}

impl JsonLinesReader<BufReader<File>> {
    pub fn from_path(path: &Path) -> Result<Self, ReaderError> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> JsonLinesReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            name: "json_lines_reader".to_string(),
            source,
            line: 0,
            read_count: 0,
            buf: String::new(),
        }
    }

    /// Prefix of this reader's context key
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    fn count_key(&self) -> String {
        format!("{}.read_count", self.name)
    }

    fn next_value(&mut self) -> Result<Option<Value>, ReaderError> {
        loop {
            self.buf.clear();
            if self.source.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }
            return serde_json::from_str(text)
                .map(Some)
                .map_err(|source| ReaderError::InvalidRecord {
                    line: self.line,
                    source,
                });
        }
    }
}

impl<R: BufRead> ItemReader for JsonLinesReader<R> {
    type Item = Value;

    fn open(&mut self, ctx: &ExecutionContext) -> Result<(), ReaderError> {
        let expected: u64 = ctx.get(&self.count_key())?.unwrap_or(0);
        while self.read_count < expected {
            if self.next_value()?.is_none() {
                return Err(ReaderError::InputTooShort {
                    read: self.read_count,
                    expected,
                });
            }
            self.read_count += 1;
        }
        if expected > 0 {
            tracing::info!(reader = %self.name, skipped = expected, "resumed input");
        }
        Ok(())
    }

    fn read(&mut self) -> Result<Option<Value>, ReaderError> {
        let value = self.next_value()?;
        if value.is_some() {
            self.read_count += 1;
        }
        Ok(value)
    }

    fn update(&mut self, ctx: &mut ExecutionContext) -> Result<(), ReaderError> {
        ctx.put(&self.count_key(), &self.read_count)?;
        Ok(())
    }
}

/// Serves records from memory
pub struct ListReader<T> {
    name: String,
    items: VecDeque<T>,
    read_count: u64,
}

impl<T> ListReader<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            name: "list_reader".to_string(),
            items: items.into_iter().collect(),
            read_count: 0,
        }
    }

    fn count_key(&self) -> String {
        format!("{}.read_count", self.name)
    }
}

impl<T> ItemReader for ListReader<T> {
    type Item = T;

    fn open(&mut self, ctx: &ExecutionContext) -> Result<(), ReaderError> {
        let expected: u64 = ctx.get(&self.count_key())?.unwrap_or(0);
        while self.read_count < expected {
            if self.items.pop_front().is_none() {
                return Err(ReaderError::InputTooShort {
                    read: self.read_count,
                    expected,
                });
            }
            self.read_count += 1;
        }
        Ok(())
    }

    fn read(&mut self) -> Result<Option<T>, ReaderError> {
        let item = self.items.pop_front();
        if item.is_some() {
            self.read_count += 1;
        }
        Ok(item)
    }

    fn update(&mut self, ctx: &mut ExecutionContext) -> Result<(), ReaderError> {
        ctx.put(&self.count_key(), &self.read_count)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
