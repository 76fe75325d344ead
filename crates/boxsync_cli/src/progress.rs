//! Progress reporting for sync flows.
//!
//! Two modes, selected by TTY detection:
//! - Interactive mode (TTY): animated bars using indicatif
//! - Logging mode (non-TTY): structured logging using tracing

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use boxsync::sync::{ProgressCallback, SyncProgress};
use console::Term;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress reporter that handles both interactive and logging modes.
pub enum ProgressReporter {
    /// Interactive progress bars for TTY.
    Interactive(InteractiveReporter),
    /// Structured logging for non-TTY (CI, pipes).
    Logging(LoggingReporter),
}

impl ProgressReporter {
    /// Create a new progress reporter, auto-detecting TTY mode.
    pub fn new() -> Self {
        if Term::stdout().is_term() {
            Self::Interactive(InteractiveReporter::new())
        } else {
            Self::Logging(LoggingReporter)
        }
    }

    /// Handle a progress event.
    pub fn handle(&self, event: SyncProgress) {
        match self {
            Self::Interactive(r) => r.handle(event),
            Self::Logging(r) => r.handle(event),
        }
    }

    /// Convert to a ProgressCallback for the library.
    pub fn as_callback(self: &Arc<Self>) -> ProgressCallback {
        let reporter = Arc::clone(self);
        Box::new(move |event| {
            reporter.handle(event);
        })
    }

    /// Finish all progress bars (interactive mode only).
    pub fn finish(&self) {
        if let Self::Interactive(r) = self {
            r.finish();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable bar state, grouped under a single lock.
#[derive(Default)]
struct ProgressState {
    /// Fetch spinners by category label.
    fetch_bars: HashMap<String, ProgressBar>,
    /// Bar for the current creation flow.
    create_bar: Option<ProgressBar>,
    /// Bar for the reconciliation pass.
    update_bar: Option<ProgressBar>,
}

/// Interactive progress reporter using indicatif.
pub struct InteractiveReporter {
    multi: MultiProgress,
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            state: Mutex::new(ProgressState::default()),
        }
    }

    /// Handle a progress event.
    pub fn handle(&self, event: SyncProgress) {
        let mut state = self.state.lock().unwrap();

        match event {
            SyncProgress::FetchingMachines { category } => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::spinner_style());
                pb.enable_steady_tick(std::time::Duration::from_millis(100));
                pb.set_prefix(format!("{:12}", category.clone()));
                pb.set_message("Fetching machines...");
                state.fetch_bars.insert(category, pb);
            }

            SyncProgress::FetchComplete { category, total } => {
                if let Some(pb) = state.fetch_bars.get(&category) {
                    pb.finish_with_message(format!("✓ {} machines", total));
                }
            }

            SyncProgress::CreatingRows {
                category,
                fresh,
                skipped,
            } => {
                // A new creation flow replaces any finished one.
                if let Some(old) = state.create_bar.take()
                    && !old.is_finished()
                {
                    old.finish();
                }

                let pb = self.multi.add(ProgressBar::new(fresh as u64));
                pb.set_style(Self::bar_style());
                pb.set_prefix(format!("{:12}", "Creating"));
                if fresh == 0 {
                    pb.finish_with_message(format!(
                        "✓ nothing new ({} already tracked)",
                        skipped
                    ));
                } else {
                    pb.set_message(format!("{} {} ({} already tracked)", fresh, category, skipped));
                }
                state.create_bar = Some(pb);
            }

            SyncProgress::RowCreated {
                name, index, total, ..
            } => {
                if let Some(ref pb) = state.create_bar {
                    pb.inc(1);
                    if index == total {
                        pb.finish_with_message(format!("✓ {} created", total));
                    } else {
                        pb.set_message(name);
                    }
                }
            }

            SyncProgress::Reconciling { total } => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::bar_style());
                pb.set_prefix(format!("{:12}", "Updating"));
                pb.set_message("Refreshing tracked rows...");
                state.update_bar = Some(pb);
            }

            SyncProgress::RowReconciled {
                name,
                status,
                index,
                total,
                ..
            } => {
                if let Some(ref pb) = state.update_bar {
                    pb.inc(1);
                    if index == total {
                        pb.finish_with_message(format!("✓ {} rows refreshed", total));
                    } else {
                        pb.set_message(format!("{} → {}", name, status));
                    }
                }
            }

            SyncProgress::RetiringDatePatched { id, target_id } => {
                if let Some(ref pb) = state.update_bar {
                    pb.set_message(format!("retiring date: {} replaces {}", id, target_id));
                }
            }

            SyncProgress::RetiringTargetMissing { id, target_id } => {
                drop(state);
                self.multi
                    .println(format!(
                        "⚠ machine {} retires untracked machine {}, date patch skipped",
                        id, target_id
                    ))
                    .ok();
            }

            SyncProgress::Warning { message } => {
                drop(state);
                self.multi.println(format!("⚠ {}", message)).ok();
            }

            _ => {}
        }
    }

    /// Finish all progress bars.
    pub fn finish(&self) {
        let state = self.state.lock().unwrap();
        for pb in state.fetch_bars.values() {
            if !pb.is_finished() {
                pb.finish();
            }
        }
        if let Some(ref pb) = state.create_bar
            && !pb.is_finished()
        {
            pb.finish();
        }
        if let Some(ref pb) = state.update_bar
            && !pb.is_finished()
        {
            pb.finish();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .expect("Invalid template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos:>3}/{len:3} {msg}")
            .expect("Invalid template")
            .progress_chars("█▓░")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    /// Handle a progress event.
    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::FetchingMachines { category } => {
                tracing::info!(category = %category, "Fetching machines");
            }

            SyncProgress::FetchComplete { category, total } => {
                tracing::info!(category = %category, total, "Fetch complete");
            }

            SyncProgress::CreatingRows {
                category,
                fresh,
                skipped,
            } => {
                tracing::info!(category = %category, fresh, skipped, "Creating rows");
            }

            SyncProgress::RowCreated {
                id,
                name,
                index,
                total,
            } => {
                tracing::info!(id, machine = %name, index, total, "Created row");
            }

            SyncProgress::Reconciling { total } => {
                tracing::info!(total, "Reconciling tracked rows");
            }

            SyncProgress::RowReconciled {
                id,
                name,
                status,
                index,
                total,
            } => {
                tracing::info!(id, machine = %name, status = %status, index, total, "Reconciled row");
            }

            SyncProgress::RetiringDatePatched { id, target_id } => {
                tracing::info!(id, target_id, "Patched retiring date");
            }

            SyncProgress::RetiringTargetMissing { id, target_id } => {
                tracing::warn!(
                    id,
                    target_id,
                    "Retiring target has no tracked row, date patch skipped"
                );
            }

            SyncProgress::Warning { message } => {
                tracing::warn!(message = %message, "Warning");
            }

            _ => {}
        }
    }
}
