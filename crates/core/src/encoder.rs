// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record to JSON fragment encoding

use serde::Serialize;
use std::marker::PhantomData;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("encoder produced an empty fragment")]
    EmptyFragment,
}

/// Converts one record into a self-contained JSON value text
pub trait RecordEncoder {
    type Record;

    fn encode(&self, record: &Self::Record) -> Result<String, EncodeError>;
}

/// `serde_json` encoder for any serializable record type
///
/// Produces compact output. Non-ASCII and HTML-significant characters are
/// written as-is.
pub struct JsonEncoder<T> {
    _record: PhantomData<fn(&T)>,
}

impl<T> JsonEncoder<T> {
    pub fn new() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<T> Default for JsonEncoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonEncoder<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: Serialize> RecordEncoder for JsonEncoder<T> {
    type Record = T;

    fn encode(&self, record: &T) -> Result<String, EncodeError> {
        Ok(serde_json::to_string(record)?)
    }
}

/// Encoder for records that already hold JSON text
///
/// The text is trimmed; it is not validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawJsonEncoder;

impl RecordEncoder for RawJsonEncoder {
    type Record = String;

    fn encode(&self, record: &String) -> Result<String, EncodeError> {
        let trimmed = record.trim();
        if trimmed.is_empty() {
            return Err(EncodeError::EmptyFragment);
        }
        Ok(trimmed.to_string())
    }
}

impl<E: RecordEncoder + ?Sized> RecordEncoder for &E {
    type Record = E::Record;

    fn encode(&self, record: &Self::Record) -> Result<String, EncodeError> {
        (**self).encode(record)
    }
}

#[cfg(test)]
#[path = "encoder_tests.rs"]
mod tests;
