//! Progress reporting for run cycles

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use sentinel_application::ports::progress::{CyclePhase, CycleProgressNotifier};
use std::sync::Mutex;

/// Reports progress during a cycle with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        if let Ok(mut bar) = self.phase_bar.lock() {
            f(&mut bar);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: CyclePhase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(phase.display_name());
        pb.set_message("Starting...");

        self.with_bar(|bar| *bar = Some(pb));
    }

    fn on_agent_complete(&self, _phase: CyclePhase, agent_id: &str, success: bool) {
        self.with_bar(|bar| {
            if let Some(pb) = bar.as_ref() {
                let status = if success {
                    format!("{} {}", "v".green(), agent_id)
                } else {
                    format!("{} {}", "x".red(), agent_id)
                };
                pb.set_message(status);
                pb.inc(1);
            }
        });
    }

    fn on_phase_complete(&self, phase: CyclePhase) {
        self.with_bar(|bar| {
            if let Some(pb) = bar.take() {
                pb.finish_with_message(format!("{} complete!", phase.to_string().green()));
            }
        });
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl CycleProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: CyclePhase, total_tasks: usize) {
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            phase.display_name().bold(),
            total_tasks
        );
    }

    fn on_agent_complete(&self, _phase: CyclePhase, agent_id: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), agent_id);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), agent_id);
        }
    }

    fn on_phase_complete(&self, _phase: CyclePhase) {
        eprintln!();
    }
}
