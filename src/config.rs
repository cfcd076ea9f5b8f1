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

//! Transcoding settings shared by the command line and the line transcoder.

use clap::ValueEnum;

/// objdump lays out at most 7 byte tokens in the instruction column.
pub const DEFAULT_SLOT_COUNT: usize = 7;

/// Width of a byte token in the dump, e.g. `b8`.
pub const TOKEN_WIDTH: usize = 2;

/// Distance between the starts of two neighbouring tokens (token + separator).
pub const SLOT_STRIDE: usize = TOKEN_WIDTH + 1;

/// Binary digits produced for one hex character.
pub const NIBBLE_BITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Echo the whole dump with the byte column replaced
    #[default]
    Full,
    /// Only the binary column of instruction lines
    BinaryOnly,
}

/// Which characters of a byte token get converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DigitPolicy {
    /// Convert the first hex digit of each token into a 4-digit group
    #[default]
    LeadingNibble,
    /// Convert both hex digits of each token into an 8-digit group
    FullByte,
}

impl DigitPolicy {
    /// Number of token characters inspected per slot.
    pub fn digits_per_slot(self) -> usize {
        match self {
            DigitPolicy::LeadingNibble => 1,
            DigitPolicy::FullByte => TOKEN_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeConfig {
    pub mode: OutputMode,
    pub digits: DigitPolicy,
    pub slot_count: usize,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            digits: DigitPolicy::default(),
            slot_count: DEFAULT_SLOT_COUNT,
        }
    }
}

impl TranscodeConfig {
    pub fn binary_only() -> Self {
        Self {
            mode: OutputMode::BinaryOnly,
            ..Self::default()
        }
    }

    /// Characters in one binary group, not counting the separator.
    pub fn group_width(&self) -> usize {
        self.digits.digits_per_slot() * NIBBLE_BITS
    }

    /// Total width of a rendered byte column, separators included.
    pub fn rendering_width(&self) -> usize {
        self.slot_count * (self.group_width() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_35_columns() {
        let config = TranscodeConfig::default();
        assert_eq!(config.group_width(), 4);
        assert_eq!(config.rendering_width(), 35);
        assert_eq!(config.mode, OutputMode::Full);
    }

    #[test]
    fn full_byte_doubles_group_width() {
        let config = TranscodeConfig {
            digits: DigitPolicy::FullByte,
            ..TranscodeConfig::default()
        };
        assert_eq!(config.group_width(), 8);
        assert_eq!(config.rendering_width(), 63);
    }
}
