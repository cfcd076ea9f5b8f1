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

//! Streams an objdump listing through the line transcoder.

use crate::transcode::{LineOutput, LineTranscoder};
use anyhow::{Context, Result};
use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::OnceLock;

/// Counters for one pass over a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub lines: usize,
    pub instruction_lines: usize,
    pub plain_lines: usize,
    /// Plain lines not written because of binary-only mode
    pub dropped_lines: usize,
    /// `08049000 <start>:` style lines
    pub symbol_headers: usize,
    pub malformed_digits: usize,
}

fn symbol_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[0-9a-fA-F]+ <[^>]*>:\s*$").expect("valid regex"))
}

fn is_symbol_header(line: &[u8]) -> bool {
    symbol_header_re().is_match(&String::from_utf8_lossy(line))
}

/// Transcode every line of `reader` into `writer`.
///
/// Exactly one trailing `\n` is stripped from each line and one is written
/// back for every line that produces output; a missing newline on the last
/// line is not preserved.
pub fn process_stream<R: BufRead, W: Write>(
    mut reader: R,
    writer: &mut W,
    transcoder: &LineTranscoder,
) -> io::Result<Summary> {
    let mut summary = Summary::default();
    let mut buf: Vec<u8> = Vec::with_capacity(256);

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            break; // EOF
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        summary.lines += 1;

        let output = transcoder.transcode(&buf);
        match &output {
            LineOutput::Rendered { malformed, .. } => {
                summary.instruction_lines += 1;
                summary.malformed_digits += malformed.len();
                for digit in malformed {
                    log::warn!(
                        "line {}: slot {} has non-hex character {:?}, rendered as blank",
                        summary.lines,
                        digit.slot,
                        char::from(digit.byte)
                    );
                }
            }
            LineOutput::Verbatim(_) | LineOutput::Dropped => {
                summary.plain_lines += 1;
                if is_symbol_header(&buf) {
                    summary.symbol_headers += 1;
                }
            }
        }
        log::trace!("line {}: {:?}", summary.lines, output);

        match output.bytes() {
            Some(bytes) => {
                writer.write_all(bytes)?;
                writer.write_all(b"\n")?;
            }
            None => summary.dropped_lines += 1,
        }
    }

    writer.flush()?;
    Ok(summary)
}

/// Transcode the objdump output in `input`, writing to `output` or stdout.
pub fn process_objdump_file(
    input: &Path,
    output: Option<&Path>,
    transcoder: &LineTranscoder,
) -> Result<Summary> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open {} for input.", input.display()))?;
    let reader = BufReader::with_capacity(64 * 1024, file);
    log::debug!(
        "Transcoding {} with {:?}",
        input.display(),
        transcoder.config()
    );

    let summary = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to open {} for output.", path.display()))?;
            let mut writer = BufWriter::new(file);
            process_stream(reader, &mut writer, transcoder)
                .with_context(|| format!("Failed writing {}", path.display()))?
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            process_stream(reader, &mut writer, transcoder)
                .with_context(|| format!("Failed transcoding {}", input.display()))?
        }
    };

    log::debug!(
        "{}: {} lines, {} instruction lines, {} plain ({} dropped), {} symbols, {} malformed digits",
        input.display(),
        summary.lines,
        summary.instruction_lines,
        summary.plain_lines,
        summary.dropped_lines,
        summary.symbol_headers,
        summary.malformed_digits
    );
    Ok(summary)
}
