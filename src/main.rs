use anyhow::Result;
use clap::Parser;
use crossbeam_channel::{unbounded, Receiver};
use std::sync::atomic::Ordering;

mod buffer;
mod cli;
mod config;
mod fanout;
mod matcher;
mod platform;
mod scanner;
mod sink;

use cli::{validate_cli_args, Cli};
use config::{format_message, MatchConfig, SiftConfig};
use fanout::{FanOutPipeline, PipelineSummary};
use matcher::{Matcher, RegexMatcher, SubstringMatcher};
use platform::{Ctrl, ExitCode, SafeStderr, SafeStdout, SignalHandler, TERMINATED_BY_SIGNAL};
use scanner::FileScanner;
use sink::FileSink;

/// Build the configured matcher; regex compilation failures are usage errors
fn build_matcher(config: &MatchConfig) -> Result<Box<dyn Matcher>> {
    if config.use_regex {
        Ok(Box::new(RegexMatcher::new(
            &config.pattern,
            config.ignore_case,
        )?))
    } else {
        Ok(Box::new(SubstringMatcher::new(
            &config.pattern,
            config.ignore_case,
        )))
    }
}

/// Run the extraction pipeline with the given configuration.
/// Per-source errors live inside the returned summary; an `Err` here means
/// the output side failed and nothing durable can be promised.
fn run_pipeline(
    config: &SiftConfig,
    matcher: Box<dyn Matcher>,
    ctrl_rx: &Receiver<Ctrl>,
) -> Result<PipelineSummary> {
    let sink = FileSink::create(&config.output.file)?;

    let summary = FanOutPipeline::new(config.processing.buffer_size).run(
        &config.input.files,
        FileScanner,
        matcher,
        sink,
        ctrl_rx.clone(),
    )?;

    Ok(summary)
}

fn main() {
    // Broadcast channel for shutdown requests from the signal handler
    let (ctrl_tx, ctrl_rx) = unbounded::<Ctrl>();

    let mut stderr = SafeStderr::new();

    let _signal_handler = match SignalHandler::new(ctrl_tx) {
        Ok(handler) => handler,
        Err(e) => {
            stderr.writeln(&format_message(&format!(
                "Failed to initialize signal handling: {}",
                e
            )));
            ExitCode::GeneralError.exit();
        }
    };

    let cli = Cli::parse();

    if let Err(e) = validate_cli_args(&cli) {
        stderr.writeln(&format_message(&format!("Error: {}", e)));
        ExitCode::InvalidUsage.exit();
    }

    let config = SiftConfig::from_cli(&cli);

    let matcher = match build_matcher(&config.matching) {
        Ok(matcher) => matcher,
        Err(e) => {
            stderr.writeln(&format_message(&format!("Error: {}", e)));
            ExitCode::InvalidUsage.exit();
        }
    };

    let summary = match run_pipeline(&config, matcher, &ctrl_rx) {
        Ok(summary) => summary,
        Err(e) => {
            stderr.writeln(&format_message(&format!("Fatal: {}", e)));
            ExitCode::GeneralError.exit();
        }
    };

    // Per-source failures are reported but do not fail the run by default
    if !config.processing.quiet {
        for error in &summary.source_errors {
            stderr.writeln(&format_message(&format!("error processing source: {}", error)));
        }
        stderr.writeln(&format_message(&format!(
            "{} matching line(s) written to '{}'",
            summary.matches_written,
            config.output.file.display()
        )));
    }

    if TERMINATED_BY_SIGNAL.load(Ordering::Relaxed) {
        ExitCode::SignalInt.exit();
    }

    if config.processing.strict && !summary.source_errors.is_empty() {
        stderr.writeln(&format_message(&format!(
            "{} source(s) failed and --strict is set",
            summary.source_errors.len()
        )));
        ExitCode::GeneralError.exit();
    }

    let mut stdout = SafeStdout::new();
    if stdout.writeln("Matches extracted successfully.").is_err() {
        ExitCode::GeneralError.exit();
    }

    ExitCode::Success.exit();
}
