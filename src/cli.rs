// Command-line interface definitions and early argument validation

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "logsift")]
#[command(about = "Concurrently extract matching lines from multiple log files into one output file")]
#[command(
    long_about = "Concurrently extract matching lines from multiple log files into one output file\n\nEach input file is scanned by its own thread; matches are funneled through a\nbounded buffer into a single writer, so memory use stays flat no matter how\nlarge the inputs are. Gzip and zstd compressed files are detected by content\nand decompressed on the fly.\n\nEXAMPLES:\n  logsift                              scan server1.log server2.log server3.log for ERROR\n  logsift -p WARN app.log db.log       custom token and sources\n  logsift --regex -p 'ERROR|FATAL' *.log.gz -o incidents.log"
)]
#[command(version)]
pub struct Cli {
    /// Input log files (the reference trio if not specified)
    #[arg(default_values = ["server1.log", "server2.log", "server3.log"])]
    pub files: Vec<PathBuf>,

    /// Output file, overwritten at start
    #[arg(
        short = 'o',
        long = "output",
        default_value = "errors.log",
        help_heading = "Output Options"
    )]
    pub output: PathBuf,

    /// Pattern a line must contain to be extracted
    #[arg(
        short = 'p',
        long = "pattern",
        default_value = "ERROR",
        help_heading = "Matching Options"
    )]
    pub pattern: String,

    /// Treat the pattern as a regular expression instead of a literal token
    #[arg(long = "regex", help_heading = "Matching Options")]
    pub regex: bool,

    /// Case-insensitive matching
    #[arg(short = 'i', long = "ignore-case", help_heading = "Matching Options")]
    pub ignore_case: bool,

    /// Capacity of the shared buffer between scanners and the writer
    #[arg(
        long = "buffer-size",
        default_value_t = crate::buffer::DEFAULT_BUFFER_CAPACITY,
        help_heading = "Performance Options"
    )]
    pub buffer_size: usize,

    /// Fail the run (non-zero exit) if any input file could not be read
    #[arg(long = "strict", help_heading = "Error Handling")]
    pub strict: bool,

    /// Suppress per-file warnings and the run summary on stderr
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

/// Validate CLI argument combinations before any work starts
pub fn validate_cli_args(cli: &Cli) -> Result<()> {
    if cli.buffer_size == 0 {
        return Err(anyhow::anyhow!("Buffer size must be greater than 0"));
    }

    if cli.pattern.is_empty() {
        return Err(anyhow::anyhow!("Pattern must not be empty"));
    }

    // Every file feeding the output would immediately be re-read by a
    // sibling producer
    if cli.files.contains(&cli.output) {
        return Err(anyhow::anyhow!(
            "Output file '{}' is also listed as an input",
            cli.output.display()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let cli = Cli::parse_from(["logsift"]);
        assert_eq!(
            cli.files,
            vec![
                PathBuf::from("server1.log"),
                PathBuf::from("server2.log"),
                PathBuf::from("server3.log")
            ]
        );
        assert_eq!(cli.output, PathBuf::from("errors.log"));
        assert_eq!(cli.pattern, "ERROR");
        assert_eq!(cli.buffer_size, 100);
        assert!(!cli.regex);
        assert!(!cli.strict);
    }

    #[test]
    fn test_rejects_zero_buffer_size() {
        let cli = Cli::parse_from(["logsift", "--buffer-size", "0"]);
        assert!(validate_cli_args(&cli).is_err());
    }

    #[test]
    fn test_rejects_output_listed_as_input() {
        let cli = Cli::parse_from(["logsift", "-o", "a.log", "a.log", "b.log"]);
        assert!(validate_cli_args(&cli).is_err());
    }

    #[test]
    fn test_explicit_files_replace_defaults() {
        let cli = Cli::parse_from(["logsift", "one.log"]);
        assert_eq!(cli.files, vec![PathBuf::from("one.log")]);
    }
}
