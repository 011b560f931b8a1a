//! Progress reporting abstraction
//!
//! Keeps indicatif out of the scan engine. The scanner ticks once per
//! finished branch and names the branch that just completed.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// A handle to an active progress bar
pub trait ProgressHandle: Send + Sync {
    /// One more branch finished
    fn branch_done(&self, branch: &str);
    fn finish(&self);
}

/// Factory for creating progress handles
pub trait ProgressReporter: Send + Sync {
    fn start(&self, label: &str, branches: u64) -> Box<dyn ProgressHandle>;
}

/// Indicatif bar on stderr
pub struct IndicatifProgress;

impl ProgressReporter for IndicatifProgress {
    fn start(&self, label: &str, branches: u64) -> Box<dyn ProgressHandle> {
        let pb = ProgressBar::with_draw_target(Some(branches), ProgressDrawTarget::stderr());
        pb.set_style(
            ProgressStyle::default_bar()
                .template(&format!(
                    "{{spinner:.green}} {}: [{{bar:40.cyan/blue}}] {{pos}}/{{len}} branches {{wide_msg}}",
                    label
                ))
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Box::new(IndicatifHandle(pb))
    }
}

struct IndicatifHandle(ProgressBar);

impl ProgressHandle for IndicatifHandle {
    fn branch_done(&self, branch: &str) {
        self.0.set_message(branch.to_string());
        self.0.inc(1);
    }

    fn finish(&self) {
        self.0.finish_and_clear();
    }
}

/// No-op progress reporter for library use, tests and benchmarks
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn start(&self, _label: &str, _branches: u64) -> Box<dyn ProgressHandle> {
        Box::new(NoopHandle)
    }
}

struct NoopHandle;

impl ProgressHandle for NoopHandle {
    fn branch_done(&self, _branch: &str) {}
    fn finish(&self) {}
}

/// Shows a bar only when not quiet
pub struct VerboseProgress {
    verbose: bool,
}

impl VerboseProgress {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for VerboseProgress {
    fn start(&self, label: &str, branches: u64) -> Box<dyn ProgressHandle> {
        if self.verbose {
            IndicatifProgress.start(label, branches)
        } else {
            NoopProgress.start(label, branches)
        }
    }
}
