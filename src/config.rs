//! Runtime configuration for the pipeline CLI.
//!
//! All configuration arrives on the command line; tunable constants live
//! here so the library and the tests agree on them.

use clap::Parser;

/// The end-of-stream marker. Equality is exact: case-sensitive, no
/// surrounding whitespace tolerated.
pub const SENTINEL: &str = "<END>";

/// Maximum length of one input item in bytes. Longer input lines are
/// delivered as multiple items.
pub const MAX_LINE_LEN: usize = 1024;

/// Default `tracing` filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "linepipe=info";

const STAGE_HELP: &str = "\
Available stages:
  logger      - logs every line that passes through
  typewriter  - prints each line one character at a time
  uppercaser  - converts lines to uppercase
  rotator     - moves every character right; the last wraps to the front
  flipper     - reverses the characters of each line
  expander    - inserts a space between consecutive characters

Example:
  echo 'hello' | linepipe 20 uppercaser rotator logger";

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "linepipe",
    about = "Run text lines through a pipeline of processing stages",
    after_help = STAGE_HELP
)]
pub struct Cli {
    /// Maximum number of items queued in front of each stage
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub queue_capacity: u64,

    /// Names of the stages to run, in pipeline order
    #[arg(required = true)]
    pub stages: Vec<String>,
}
