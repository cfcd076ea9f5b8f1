// Crate root: declare modules and control visibility
pub mod cli;
pub mod config;
pub mod logging;
pub mod router;
pub mod transcode;

// Re-export commonly used API from the library for binaries/tests
pub use config::{DigitPolicy, OutputMode, TranscodeConfig};
pub use router::{process_objdump_file, process_stream, Summary};
pub use transcode::LineTranscoder;
