//! Process-level plumbing: exit codes, signal handling, safe terminal I/O
#![allow(dead_code)]

use anyhow::Result;
use crossbeam_channel::Sender;
use std::io::{self, Write};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[cfg(unix)]
use signal_hook::{consts::SIGINT, consts::SIGPIPE, consts::SIGTERM, iterator::Signals};

#[cfg(windows)]
use signal_hook::{consts::SIGINT, flag};

/// Standard Unix exit codes
#[derive(Debug, Clone, Copy)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidUsage = 2,
    SignalInt = 130,  // 128 + SIGINT (2)
    SignalPipe = 141, // 128 + SIGPIPE (13)
    SignalTerm = 143, // 128 + SIGTERM (15)
}

impl ExitCode {
    pub fn exit(self) -> ! {
        process::exit(self as i32)
    }
}

/// Global termination flags for graceful shutdown
pub static SHOULD_TERMINATE: AtomicBool = AtomicBool::new(false);
pub static TERMINATED_BY_SIGNAL: AtomicBool = AtomicBool::new(false);

/// Control messages broadcast to pipeline threads
#[derive(Debug, Clone)]
pub enum Ctrl {
    Shutdown { immediate: bool },
}

/// Signal handler for graceful shutdown
pub struct SignalHandler {
    _handle: thread::JoinHandle<()>,
}

impl SignalHandler {
    pub fn new(ctrl_sender: Sender<Ctrl>) -> Result<Self> {
        #[cfg(unix)]
        {
            let mut signals = Signals::new([SIGINT, SIGPIPE, SIGTERM])?;

            let sender = ctrl_sender;
            let handle = thread::spawn(move || {
                let mut shutdown_count = 0;
                for sig in signals.forever() {
                    match sig {
                        SIGINT | SIGTERM => {
                            SHOULD_TERMINATE.store(true, Ordering::Relaxed);
                            TERMINATED_BY_SIGNAL.store(true, Ordering::Relaxed);
                            shutdown_count += 1;
                            let immediate = shutdown_count > 1;
                            let _ = sender.send(Ctrl::Shutdown { immediate });
                            if immediate {
                                if sig == SIGINT {
                                    ExitCode::SignalInt.exit();
                                } else {
                                    ExitCode::SignalTerm.exit();
                                }
                            }
                        }
                        SIGPIPE => {
                            // Broken pipe is normal in Unix pipelines
                            SHOULD_TERMINATE.store(true, Ordering::Relaxed);
                            TERMINATED_BY_SIGNAL.store(true, Ordering::Relaxed);
                            ExitCode::SignalPipe.exit();
                        }
                        _ => {}
                    }
                }
            });

            Ok(SignalHandler { _handle: handle })
        }

        #[cfg(windows)]
        {
            let term_flag = std::sync::Arc::new(AtomicBool::new(false));
            flag::register(SIGINT, std::sync::Arc::clone(&term_flag))?;

            let sender = ctrl_sender;
            let handle = thread::spawn(move || {
                let mut shutdown_count = 0;
                loop {
                    thread::sleep(std::time::Duration::from_millis(100));
                    if term_flag.swap(false, Ordering::Relaxed) {
                        SHOULD_TERMINATE.store(true, Ordering::Relaxed);
                        TERMINATED_BY_SIGNAL.store(true, Ordering::Relaxed);
                        shutdown_count += 1;
                        let immediate = shutdown_count > 1;
                        let _ = sender.send(Ctrl::Shutdown { immediate });
                        if immediate {
                            ExitCode::SignalInt.exit();
                        }
                    }
                }
            });

            Ok(SignalHandler { _handle: handle })
        }
    }

    pub fn should_terminate() -> bool {
        SHOULD_TERMINATE.load(Ordering::Relaxed)
    }
}

/// Stdout wrapper that treats a broken pipe as a clean exit
pub struct SafeStdout {
    stdout: io::Stdout,
}

impl SafeStdout {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }

    pub fn writeln(&mut self, data: &str) -> Result<()> {
        match writeln!(self.stdout, "{}", data) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                ExitCode::SignalPipe.exit();
            }
            Err(e) => Err(anyhow::anyhow!("Failed to write to stdout: {}", e)),
        }
    }
}

/// Stderr wrapper; if even stderr is unwritable there is nothing left to do
pub struct SafeStderr {
    stderr: io::Stderr,
}

impl SafeStderr {
    pub fn new() -> Self {
        Self {
            stderr: io::stderr(),
        }
    }

    pub fn writeln(&mut self, data: &str) {
        if writeln!(self.stderr, "{}", data).is_err() {
            ExitCode::GeneralError.exit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::Success as i32, 0);
        assert_eq!(ExitCode::GeneralError as i32, 1);
        assert_eq!(ExitCode::InvalidUsage as i32, 2);
        assert_eq!(ExitCode::SignalInt as i32, 130);
        assert_eq!(ExitCode::SignalPipe as i32, 141);
        assert_eq!(ExitCode::SignalTerm as i32, 143);
    }
}
