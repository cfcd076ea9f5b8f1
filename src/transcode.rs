// Copyright (c) 2026 MCU-Debug Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Per-line transcoding of objdump output.
//!
//! An instruction line from `objdump -d` looks like
//!
//! ```text
//!  804913c:	b8 10 90 04 08       	mov    $0x8049010,%eax
//! ```
//!
//! i.e. an address header ending in `:` and a tab, a byte column of up to
//! seven two-digit hex tokens, and (unless it is a continuation line) a second
//! tab followed by the mnemonic. The byte column is replaced by fixed-width
//! binary groups so that whatever follows stays aligned. Everything else in the
//! dump is a plain line and is echoed or dropped depending on the output mode.
//!
//! Lines are handled as raw bytes so a plain line is reproduced exactly, even
//! when it is not valid UTF-8.

use crate::config::{OutputMode, TranscodeConfig, NIBBLE_BITS, SLOT_STRIDE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Headers, blank lines and anything not shaped like `addr:\t...`
    Plain,
    /// Carries a byte column after `addr:\t`
    Instruction,
}

fn find_tab(bytes: &[u8]) -> Option<usize> {
    bytes.iter().position(|&b| b == b'\t')
}

/// A line is an instruction line when its first tab directly follows a colon.
pub fn classify(line: &[u8]) -> LineKind {
    match find_tab(line) {
        Some(pos) if pos > 0 && line[pos - 1] == b':' => LineKind::Instruction,
        _ => LineKind::Plain,
    }
}

/// The three parts of an instruction line. They borrow from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionFields<'a> {
    /// Address label, colon and the first tab
    pub header: &'a [u8],
    /// Hex tokens, up to and including the second tab if there is one
    pub byte_field: &'a [u8],
    /// Second tab and the mnemonic text; empty on continuation lines
    pub trailer: &'a [u8],
}

/// Split an instruction line into header, byte field and trailer.
/// Returns `None` for plain lines.
pub fn split_fields(line: &[u8]) -> Option<InstructionFields<'_>> {
    if classify(line) != LineKind::Instruction {
        return None;
    }
    let (header, rest) = line.split_at(find_tab(line)? + 1);
    let fields = match find_tab(rest) {
        Some(end) => InstructionFields {
            header,
            byte_field: &rest[..=end],
            trailer: &rest[end..],
        },
        // continuation line, the bytes run to end of line
        None => InstructionFields {
            header,
            byte_field: rest,
            trailer: &[],
        },
    };
    Some(fields)
}

/// A character in the byte column that is neither whitespace nor a hex digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MalformedDigit {
    /// Zero-based slot index within the byte column
    pub slot: usize,
    pub byte: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BinaryRendering {
    pub text: Vec<u8>,
    pub malformed: Vec<MalformedDigit>,
}

enum Digit {
    Hex(u32),
    Blank,
    Malformed(u8),
}

// Same set as C isspace(); `is_ascii_whitespace` leaves out vertical tab.
fn is_space(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0b
}

fn read_digit(byte: Option<u8>) -> Digit {
    match byte {
        None => Digit::Blank,
        Some(b) if is_space(b) => Digit::Blank,
        Some(b) => match char::from(b).to_digit(16) {
            Some(value) => Digit::Hex(value),
            None => Digit::Malformed(b),
        },
    }
}

fn push_nibble(out: &mut Vec<u8>, value: u32) {
    for shift in (0..NIBBLE_BITS).rev() {
        out.push(if (value >> shift) & 1 == 1 { b'1' } else { b'0' });
    }
}

fn push_blank(out: &mut Vec<u8>) {
    out.extend_from_slice(&[b' '; NIBBLE_BITS]);
}

/// Render a byte field as `slot_count` binary groups, each followed by a space.
///
/// The output is always `config.rendering_width()` bytes long. Slots past the
/// end of the field, whitespace and malformed characters all render as blanks.
pub fn render_binary(field: &[u8], config: &TranscodeConfig) -> BinaryRendering {
    let mut rendering = BinaryRendering {
        text: Vec::with_capacity(config.rendering_width()),
        malformed: Vec::new(),
    };
    for slot in 0..config.slot_count {
        let start = slot * SLOT_STRIDE;
        for offset in 0..config.digits.digits_per_slot() {
            match read_digit(field.get(start + offset).copied()) {
                Digit::Hex(value) => push_nibble(&mut rendering.text, value),
                Digit::Blank => push_blank(&mut rendering.text),
                Digit::Malformed(byte) => {
                    rendering.malformed.push(MalformedDigit { slot, byte });
                    push_blank(&mut rendering.text);
                }
            }
        }
        rendering.text.push(b' ');
    }
    rendering
}

/// Result of transcoding one line, without the line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutput<'a> {
    /// Plain line in full-output mode
    Verbatim(&'a [u8]),
    Rendered {
        bytes: Vec<u8>,
        malformed: Vec<MalformedDigit>,
    },
    /// Plain line in binary-only mode
    Dropped,
}

impl LineOutput<'_> {
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            LineOutput::Verbatim(line) => Some(*line),
            LineOutput::Rendered { bytes, .. } => Some(bytes.as_slice()),
            LineOutput::Dropped => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LineTranscoder {
    config: TranscodeConfig,
}

impl LineTranscoder {
    pub fn new(config: TranscodeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranscodeConfig {
        &self.config
    }

    pub fn transcode<'a>(&self, line: &'a [u8]) -> LineOutput<'a> {
        let Some(fields) = split_fields(line) else {
            return match self.config.mode {
                OutputMode::Full => LineOutput::Verbatim(line),
                OutputMode::BinaryOnly => LineOutput::Dropped,
            };
        };

        let rendering = render_binary(fields.byte_field, &self.config);
        let bytes = match self.config.mode {
            OutputMode::Full => {
                let mut out = Vec::with_capacity(
                    fields.header.len() + rendering.text.len() + fields.trailer.len(),
                );
                out.extend_from_slice(fields.header);
                out.extend_from_slice(&rendering.text);
                out.extend_from_slice(fields.trailer);
                out
            }
            OutputMode::BinaryOnly => rendering.text,
        };
        LineOutput::Rendered {
            bytes,
            malformed: rendering.malformed,
        }
    }
}
