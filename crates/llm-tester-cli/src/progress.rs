//! Terminal progress for test runs

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use llm_tester_core::{ProgressEvent, ProgressObserver};

use crate::output::OutputStyle;

/// Create a spinner for connection and listing calls
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Progress bar driven by run events
pub struct ProgressReporter {
    bar: ProgressBar,
    style: OutputStyle,
}

impl ProgressReporter {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        Self {
            bar,
            style: OutputStyle::default(),
        }
    }

    /// Reporter that draws nothing, for `--quiet`
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            style: OutputStyle::plain(),
        }
    }
}

impl ProgressObserver for ProgressReporter {
    fn on_event(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::RunStarted { suite, .. } => {
                self.bar.set_message(format!("Running {}", suite));
            }
            ProgressEvent::TestStarted { model, test_name } => {
                self.bar.set_message(format!("{}: {}", model, test_name));
            }
            ProgressEvent::TestFailed {
                model,
                test_name,
                error,
            } => {
                self.bar.println(
                    self.style
                        .error(&format!("{} / {}: {}", model, test_name, error)),
                );
            }
            ProgressEvent::Progress { done, .. } => {
                self.bar.set_position(*done as u64);
            }
            ProgressEvent::RunCompleted { failed, .. } => {
                if *failed == 0 {
                    self.bar.finish_with_message("All tests finished");
                } else {
                    self.bar
                        .finish_with_message(format!("Finished with {} errors", failed));
                }
            }
            ProgressEvent::TestCompleted { .. } => {}
        }
    }
}
