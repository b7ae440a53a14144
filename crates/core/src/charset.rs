// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output character encodings
//!
//! Text handed to the output file is produced as Rust strings and converted
//! to the configured charset right before it reaches the buffered writer.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharsetError {
    #[error("unsupported character encoding: {0}")]
    UnsupportedCharset(String),
    #[error("character {ch:?} cannot be encoded as {charset}")]
    UnmappableCharacter { ch: char, charset: Charset },
}

/// Character encoding of the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Charset {
    #[default]
    Utf8,
    Utf16Be,
    Utf16Le,
    /// ISO-8859-1
    Latin1,
    /// US-ASCII
    Ascii,
}

impl Charset {
    /// Canonical label, as accepted by [`Charset::from_str`]
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Utf16Be => "UTF-16BE",
            Charset::Utf16Le => "UTF-16LE",
            Charset::Latin1 => "ISO-8859-1",
            Charset::Ascii => "US-ASCII",
        }
    }

    /// Append the encoded form of `text` to `out`.
    ///
    /// On error `out` may hold a partial encoding of `text`.
    pub fn encode_into(&self, text: &str, out: &mut Vec<u8>) -> Result<(), CharsetError> {
        match self {
            Charset::Utf8 => out.extend_from_slice(text.as_bytes()),
            Charset::Utf16Be => {
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
            }
            Charset::Utf16Le => {
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
            }
            Charset::Latin1 => self.encode_single_byte(text, 0xFF, out)?,
            Charset::Ascii => self.encode_single_byte(text, 0x7F, out)?,
        }
        Ok(())
    }

    /// Encode `text` into a fresh buffer
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, CharsetError> {
        let mut out = Vec::with_capacity(text.len());
        self.encode_into(text, &mut out)?;
        Ok(out)
    }

    fn encode_single_byte(
        &self,
        text: &str,
        max: u32,
        out: &mut Vec<u8>,
    ) -> Result<(), CharsetError> {
        for ch in text.chars() {
            let code = ch as u32;
            if code > max {
                return Err(CharsetError::UnmappableCharacter { ch, charset: *self });
            }
            out.push(code as u8);
        }
        Ok(())
    }
}

impl FromStr for Charset {
    type Err = CharsetError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let normalized: String = label
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "utf8" => Ok(Charset::Utf8),
            "utf16be" => Ok(Charset::Utf16Be),
            "utf16le" => Ok(Charset::Utf16Le),
            "iso88591" | "latin1" | "l1" => Ok(Charset::Latin1),
            "usascii" | "ascii" => Ok(Charset::Ascii),
            _ => Err(CharsetError::UnsupportedCharset(label.to_string())),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Charset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Charset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "charset_tests.rs"]
mod tests;
