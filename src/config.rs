use std::path::PathBuf;

/// Main configuration struct for logsift
#[derive(Debug, Clone)]
pub struct SiftConfig {
    pub input: InputConfig,
    pub matching: MatchConfig,
    pub output: OutputConfig,
    pub processing: ProcessingConfig,
}

/// Input configuration
#[derive(Debug, Clone)]
pub struct InputConfig {
    pub files: Vec<PathBuf>,
}

/// Matching configuration
#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub pattern: String,
    pub use_regex: bool,
    pub ignore_case: bool,
}

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub file: PathBuf,
}

/// Processing configuration
#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub buffer_size: usize,
    pub strict: bool,
    pub quiet: bool,
}

impl SiftConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        Self {
            input: InputConfig {
                files: cli.files.clone(),
            },
            matching: MatchConfig {
                pattern: cli.pattern.clone(),
                use_regex: cli.regex,
                ignore_case: cli.ignore_case,
            },
            output: OutputConfig {
                file: cli.output.clone(),
            },
            processing: ProcessingConfig {
                buffer_size: cli.buffer_size,
                strict: cli.strict,
                quiet: cli.quiet,
            },
        }
    }
}

/// Prefix a message for stderr the way every logsift diagnostic is prefixed
pub fn format_message(message: &str) -> String {
    format!("logsift: {}", message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_from_cli_carries_all_sections() {
        let cli = crate::cli::Cli::parse_from([
            "logsift",
            "-p",
            "FATAL",
            "--regex",
            "--strict",
            "--buffer-size",
            "7",
            "-o",
            "out.log",
            "x.log",
        ]);
        let config = SiftConfig::from_cli(&cli);

        assert_eq!(config.input.files, vec![PathBuf::from("x.log")]);
        assert_eq!(config.matching.pattern, "FATAL");
        assert!(config.matching.use_regex);
        assert_eq!(config.output.file, PathBuf::from("out.log"));
        assert_eq!(config.processing.buffer_size, 7);
        assert!(config.processing.strict);
    }

    #[test]
    fn test_format_message_prefix() {
        assert_eq!(format_message("boom"), "logsift: boom");
    }
}
