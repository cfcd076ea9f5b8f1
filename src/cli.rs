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

//! Command line parsing. Nothing here prints or exits; `main` acts on the
//! returned [`ParseOutcome`].

use crate::config::{DigitPolicy, OutputMode, TranscodeConfig, DEFAULT_SLOT_COUNT};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

const NOTE: &str = "\
Note:
    Use with the `-b` flag to strip everything except the binary
    output. All other data from the original objdump_output_file
    is ignored.";

/// Convert the hex instruction bytes in `objdump -d` output into binary.
#[derive(Parser, Debug)]
#[command(name = "objdump-bindump", version, after_help = NOTE)]
pub struct CliArgs {
    /// Produce only the binary output (remove other information from the objdump output)
    #[arg(short = 'b', long = "binary-only", default_value_t = false)]
    pub binary_only: bool,

    /// Hex digits converted per byte token
    #[arg(long = "digits", value_enum, default_value_t = DigitPolicy::LeadingNibble)]
    pub digits: DigitPolicy,

    /// Byte tokens in the instruction column
    #[arg(
        long = "slots",
        default_value_t = DEFAULT_SLOT_COUNT as u8,
        value_parser = clap::value_parser!(u8).range(1..)
    )]
    pub slots: u8,

    /// Write to FILE instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable debug output
    #[arg(short = 'd', long = "debug", default_value_t = false)]
    pub debug: bool,

    /// Output of `objdump -d` (or similar)
    #[arg(value_name = "objdump_output_file")]
    pub objdump_output_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub transcode: TranscodeConfig,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Run(RunConfig),
    /// Print the usage text, preceded by `message` if any, and exit.
    Usage {
        message: Option<String>,
        exit_code: u8,
    },
    Version(String),
}

impl ParseOutcome {
    fn usage_error(message: impl Into<String>) -> Self {
        ParseOutcome::Usage {
            message: Some(message.into()),
            exit_code: 1,
        }
    }
}

/// First line of a clap error without the `error: ` prefix.
fn summarize(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.trim_start_matches("error: ").to_string()
}

impl From<clap::Error> for ParseOutcome {
    fn from(err: clap::Error) -> Self {
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                ParseOutcome::Usage {
                    message: None,
                    exit_code: 0,
                }
            }
            ErrorKind::DisplayVersion => ParseOutcome::Version(err.to_string()),
            ErrorKind::UnknownArgument => match err.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(arg)) => {
                    ParseOutcome::usage_error(format!("Unknown option: {}", arg))
                }
                _ => ParseOutcome::usage_error(summarize(&err)),
            },
            _ => ParseOutcome::usage_error(summarize(&err)),
        }
    }
}

impl CliArgs {
    pub fn into_outcome(self) -> ParseOutcome {
        let Some(input) = self.objdump_output_file else {
            return ParseOutcome::usage_error("Missing objdump_output_file.");
        };
        let mode = if self.binary_only {
            OutputMode::BinaryOnly
        } else {
            OutputMode::Full
        };
        ParseOutcome::Run(RunConfig {
            input,
            output: self.output,
            transcode: TranscodeConfig {
                mode,
                digits: self.digits,
                slot_count: usize::from(self.slots),
            },
            debug: self.debug,
        })
    }
}

fn is_binary_flag(arg: &str) -> bool {
    arg == "-b" || arg == "--binary-only"
}

/// `-b` is only accepted as the first argument, and a leading non-option
/// followed by more arguments is reported by name.
fn check_order(args: &[OsString]) -> Option<ParseOutcome> {
    let (first, rest) = args.split_first()?;
    let first = first.to_string_lossy();
    if !first.starts_with('-') && !rest.is_empty() {
        return Some(ParseOutcome::usage_error(format!("Unknown option: {}", first)));
    }
    rest.iter()
        .map(|arg| arg.to_string_lossy())
        .find(|arg| is_binary_flag(arg))
        .map(|arg| ParseOutcome::usage_error(format!("Option {} must come first.", arg)))
}

/// Parse the full argument list, program name included.
///
/// Running with no arguments at all is a request for the usage text and
/// succeeds; every other argument problem is a usage error with exit code 1.
pub fn parse_args<I, T>(args: I) -> ParseOutcome
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() < 2 {
        return ParseOutcome::Usage {
            message: None,
            exit_code: 0,
        };
    }
    if let Some(outcome) = check_order(&args[1..]) {
        return outcome;
    }
    match CliArgs::try_parse_from(args) {
        Ok(cli) => cli.into_outcome(),
        Err(err) => err.into(),
    }
}

pub fn usage_text(message: Option<&str>) -> String {
    let mut text = String::new();
    if let Some(message) = message.filter(|m| !m.is_empty()) {
        text.push_str(message);
        text.push_str("\n\n");
    }
    text.push_str(&CliArgs::command().render_long_help().to_string());
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> ParseOutcome {
        parse_args(std::iter::once("objdump-bindump").chain(args.iter().copied()))
    }

    fn run_config(outcome: ParseOutcome) -> RunConfig {
        match outcome {
            ParseOutcome::Run(config) => config,
            other => panic!("expected a run config, got {:?}", other),
        }
    }

    #[test]
    fn verify_command() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn no_arguments_shows_usage() {
        assert_eq!(
            parse(&[]),
            ParseOutcome::Usage {
                message: None,
                exit_code: 0
            }
        );
        assert_eq!(
            parse(&["--help"]),
            ParseOutcome::Usage {
                message: None,
                exit_code: 0
            }
        );
    }

    #[test]
    fn binary_flag_without_file() {
        assert_eq!(
            parse(&["-b"]),
            ParseOutcome::Usage {
                message: Some("Missing objdump_output_file.".to_string()),
                exit_code: 1
            }
        );
    }

    #[test]
    fn unknown_option() {
        assert_eq!(
            parse(&["-x", "dump.txt"]),
            ParseOutcome::Usage {
                message: Some("Unknown option: -x".to_string()),
                exit_code: 1
            }
        );
    }

    #[test]
    fn leading_non_option_is_named() {
        assert_eq!(
            parse(&["foo", "bar"]),
            ParseOutcome::Usage {
                message: Some("Unknown option: foo".to_string()),
                exit_code: 1
            }
        );
    }

    #[test]
    fn binary_flag_after_file() {
        assert_eq!(
            parse(&["dump.txt", "-b"]),
            ParseOutcome::Usage {
                message: Some("Unknown option: dump.txt".to_string()),
                exit_code: 1
            }
        );
    }

    #[test]
    fn binary_flag_after_other_options() {
        assert_eq!(
            parse(&["-d", "--binary-only", "dump.txt"]),
            ParseOutcome::Usage {
                message: Some("Option --binary-only must come first.".to_string()),
                exit_code: 1
            }
        );
        let config = run_config(parse(&["-b", "-d", "dump.txt"]));
        assert_eq!(config.transcode.mode, OutputMode::BinaryOnly);
        assert!(config.debug);
    }

    #[test]
    fn extra_file_after_binary_flag() {
        assert!(matches!(
            parse(&["-b", "dump.txt", "other.txt"]),
            ParseOutcome::Usage {
                message: Some(_),
                exit_code: 1
            }
        ));
    }

    #[test]
    fn zero_slots_rejected() {
        assert!(matches!(
            parse(&["--slots", "0", "dump.txt"]),
            ParseOutcome::Usage {
                message: Some(_),
                exit_code: 1
            }
        ));
    }

    #[test]
    fn file_only_is_full_output() {
        let config = run_config(parse(&["dump.txt"]));
        assert_eq!(config.input, PathBuf::from("dump.txt"));
        assert_eq!(config.output, None);
        assert_eq!(config.transcode, TranscodeConfig::default());
        assert!(!config.debug);
    }

    #[test]
    fn binary_only_mode() {
        let config = run_config(parse(&["-b", "dump.txt"]));
        assert_eq!(config.transcode, TranscodeConfig::binary_only());
    }

    #[test]
    fn extended_options() {
        let config = run_config(parse(&[
            "--digits",
            "full-byte",
            "--slots",
            "4",
            "-o",
            "out.txt",
            "-d",
            "dump.txt",
        ]));
        assert_eq!(
            config,
            RunConfig {
                input: PathBuf::from("dump.txt"),
                output: Some(PathBuf::from("out.txt")),
                transcode: TranscodeConfig {
                    mode: OutputMode::Full,
                    digits: DigitPolicy::FullByte,
                    slot_count: 4,
                },
                debug: true,
            }
        );
    }

    #[test]
    fn version_flag() {
        match parse(&["--version"]) {
            ParseOutcome::Version(text) => assert!(text.starts_with("objdump-bindump ")),
            other => panic!("expected version, got {:?}", other),
        }
    }

    #[test]
    fn usage_text_with_message() {
        let text = usage_text(Some("Unknown option: -x"));
        assert!(text.starts_with("Unknown option: -x\n\n"));
        assert!(text.contains("objdump_output_file"));
        assert!(text.contains("--binary-only"));
        assert!(!usage_text(None).starts_with('\n'));
    }
}
