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

use objdump_bindump::cli::{self, ParseOutcome};
use objdump_bindump::{logging, process_objdump_file, LineTranscoder};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match cli::parse_args(std::env::args_os()) {
        ParseOutcome::Run(config) => config,
        ParseOutcome::Usage { message, exit_code } => {
            print!("{}", cli::usage_text(message.as_deref()));
            return ExitCode::from(exit_code);
        }
        ParseOutcome::Version(text) => {
            print!("{}", text);
            return ExitCode::SUCCESS;
        }
    };

    // A bad RUST_LOG spec only disables logging.
    let _logger = match logging::init(config.debug) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    let transcoder = LineTranscoder::new(config.transcode.clone());
    match process_objdump_file(&config.input, config.output.as_deref(), &transcoder) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
