// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental JSON array framing
//!
//! Emits the punctuation that turns a stream of encoded fragments into
//! `[e1,e2,...,en]`. The only state is whether an element has been emitted
//! yet, which must come back from the checkpoint on restart; otherwise a
//! resumed file would receive a second `[`.

pub const ARRAY_OPEN: &str = "[";
pub const ARRAY_SEPARATOR: &str = ",";
pub const ARRAY_CLOSE: &str = "]";

/// Decides the bracket/comma text around each fragment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArrayFramer {
    has_elements: bool,
}

impl ArrayFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume framing with the flag recovered from a checkpoint
    pub fn restore(has_elements: bool) -> Self {
        Self { has_elements }
    }

    /// Frame one fragment
    pub fn frame(&mut self, fragment: &str) -> String {
        let mut out = String::with_capacity(fragment.len() + 1);
        self.frame_into(fragment, &mut out);
        out
    }

    /// Frame one fragment, appending the result to `out`
    pub fn frame_into(&mut self, fragment: &str, out: &mut String) {
        if self.has_elements {
            out.push_str(ARRAY_SEPARATOR);
        } else {
            out.push_str(ARRAY_OPEN);
            self.has_elements = true;
        }
        out.push_str(fragment);
    }

    pub fn has_elements(&self) -> bool {
        self.has_elements
    }

    /// Text that closes the array, if one was opened
    pub fn footer(&self) -> Option<&'static str> {
        self.has_elements.then_some(ARRAY_CLOSE)
    }
}

#[cfg(test)]
#[path = "framer_tests.rs"]
mod tests;
