//! Progress events emitted by the install pipeline.
//!
//! The pipeline publishes through an optional callback; emitting with no
//! subscriber is a legal no-op. The [`InstallReporter`] trait offers the
//! same four channels with per-channel methods for consumers that prefer
//! not to match on the event enum.

use std::io::{self, Write};
use std::sync::Arc;

use serde::Serialize;

/// Callback handle the pipeline publishes events through.
pub type InstallCallback = Arc<dyn Fn(InstallEvent) + Send + Sync>;

/// Events emitted over a run, in emission order.
#[derive(Debug, Clone, Serialize)]
pub enum InstallEvent {
    /// Queue built, run starting; carries the fixed step total
    Initializing {
        action: String,
        step: usize,
        step_total: usize,
    },
    /// Byte- or entry-level progress for the current package
    Progress(ProgressUpdate),
    /// A pipeline step began (two per package: download, extract)
    StepUpdate { step: usize },
    /// The whole run finished, artifacts included
    Complete,
}

/// Phase-specific progress payload.
#[derive(Debug, Clone, Serialize)]
pub enum ProgressUpdate {
    Downloading { package: String, percent: u8 },
    Extracting {
        package: String,
        current_entry: usize,
        total_entries: usize,
    },
}

/// Per-channel observer for install progress.
///
/// Every method has a no-op default, so consumers implement only the
/// channels they render.
pub trait InstallReporter: Send + Sync {
    fn on_initializing(&self, _action: &str, _step: usize, _step_total: usize) {}
    fn on_progress(&self, _update: &ProgressUpdate) {}
    fn on_step_update(&self, _step: usize) {}
    fn on_complete(&self) {}
}

/// Adapter from an [`InstallReporter`] to the pipeline's callback type.
pub trait IntoInstallCallback {
    fn into_callback(self) -> InstallCallback;
}

impl<T: InstallReporter + 'static> IntoInstallCallback for T {
    fn into_callback(self) -> InstallCallback {
        Arc::new(move |event| match event {
            InstallEvent::Initializing {
                action,
                step,
                step_total,
            } => self.on_initializing(&action, step, step_total),
            InstallEvent::Progress(update) => self.on_progress(&update),
            InstallEvent::StepUpdate { step } => self.on_step_update(step),
            InstallEvent::Complete => self.on_complete(),
        })
    }
}

/// Reporter that ignores everything.
#[derive(Debug, Default)]
pub struct NullReporter;

impl InstallReporter for NullReporter {}

/// Simple line-oriented console reporter.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl InstallReporter for ConsoleReporter {
    fn on_initializing(&self, action: &str, _step: usize, step_total: usize) {
        println!("{action} ({step_total} steps)");
    }

    fn on_progress(&self, update: &ProgressUpdate) {
        if !self.verbose {
            return;
        }
        match update {
            ProgressUpdate::Downloading { package, percent } => {
                print!("\r  downloading {package}: {percent:>3}%");
                let _ = io::stdout().flush();
            }
            ProgressUpdate::Extracting {
                package,
                current_entry,
                total_entries,
            } => {
                if *total_entries > 0 {
                    print!("\r  extracting {package}: {current_entry}/{total_entries}");
                    let _ = io::stdout().flush();
                }
            }
        }
    }

    fn on_step_update(&self, step: usize) {
        if self.verbose {
            println!("\nstep {step}");
        }
    }

    fn on_complete(&self) {
        println!("\ninstall complete");
    }
}

/// Forwards every event to multiple reporters.
pub struct CompositeReporter {
    reporters: Vec<Box<dyn InstallReporter>>,
}

impl CompositeReporter {
    pub fn new() -> Self {
        Self {
            reporters: Vec::new(),
        }
    }

    pub fn add_reporter<R: InstallReporter + 'static>(mut self, reporter: R) -> Self {
        self.reporters.push(Box::new(reporter));
        self
    }
}

impl Default for CompositeReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl InstallReporter for CompositeReporter {
    fn on_initializing(&self, action: &str, step: usize, step_total: usize) {
        for reporter in &self.reporters {
            reporter.on_initializing(action, step, step_total);
        }
    }

    fn on_progress(&self, update: &ProgressUpdate) {
        for reporter in &self.reporters {
            reporter.on_progress(update);
        }
    }

    fn on_step_update(&self, step: usize) {
        for reporter in &self.reporters {
            reporter.on_step_update(step);
        }
    }

    fn on_complete(&self) {
        for reporter in &self.reporters {
            reporter.on_complete();
        }
    }
}
