use cygnus::engine::progress::{Progress, ProgressCallback, ProgressReporter, phase};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// What one bar step stands for in a given engine phase.
fn step_unit(phase_name: &str) -> &'static str {
    if phase_name == phase::PAIRWISE_RMSD {
        "pairs"
    } else {
        "frames"
    }
}

struct BarState {
    pb: ProgressBar,
    phase: Option<&'static str>,
}

/// Renders engine progress events on stderr.
///
/// Each phase (distance sampling, alignment, pairwise RMSD) starts as a spinner, switches to
/// a bar labelled with the phase and its step unit once the task size is known, and ends
/// with a completion line naming the phase.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BarState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0).with_style(Self::spinner_style());
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(BarState { pb, phase: None })),
        }
    }

    /// A reporter wired to this handler.
    pub fn reporter(&self) -> ProgressReporter<'static> {
        ProgressReporter::with_callback(self.get_callback())
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = Arc::clone(&self.state);

        Box::new(move |progress: Progress| {
            let Ok(mut guard) = state.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };
            let BarState { pb, phase: current } = &mut *guard;

            match progress {
                Progress::PhaseStart { name } => {
                    *current = Some(name);
                    pb.reset();
                    pb.set_length(0);
                    pb.set_style(Self::spinner_style());
                    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb.set_message(name);
                }
                Progress::PhaseFinish => {
                    pb.disable_steady_tick();
                    match current.take() {
                        Some(name) => pb.finish_with_message(format!("✓ {} complete", name)),
                        None => pb.finish_with_message("✓ Done"),
                    }
                }
                Progress::TaskStart { total_steps } => {
                    let name = current.unwrap_or("Working");
                    pb.disable_steady_tick();
                    pb.reset();
                    pb.set_length(total_steps);
                    pb.set_position(0);
                    pb.set_style(Self::bar_style(step_unit(name)));
                    pb.set_message(name);
                }
                Progress::TaskIncrement => {
                    pb.inc(1);
                }
                Progress::TaskFinish => {
                    let length = pb.length().unwrap_or(0);
                    if pb.position() < length {
                        pb.set_position(length);
                    }
                    pb.finish();
                }
                Progress::Message(msg) => {
                    if !pb.is_finished() {
                        pb.println(format!("  {}", msg));
                    } else {
                        pb.set_message(msg);
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style(unit: &str) -> ProgressStyle {
        let template =
            format!("{{msg:<18}} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {unit} ({{eta}})");
        ProgressStyle::with_template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::new();
        let state = handler.state.lock().unwrap();
        assert_eq!(state.pb.length(), Some(0));
        assert!(state.pb.is_finished());
        assert!(state.phase.is_none());
    }

    #[test]
    fn pairwise_phase_counts_pairs_and_others_count_frames() {
        assert_eq!(step_unit(phase::PAIRWISE_RMSD), "pairs");
        assert_eq!(step_unit(phase::ALIGNMENT), "frames");
        assert_eq!(step_unit(phase::DISTANCE_SAMPLING), "frames");
    }

    #[test]
    fn distance_sampling_runs_through_a_full_task() {
        let handler = CliProgressHandler::new();
        let reporter = handler.reporter();

        reporter.start_task(phase::DISTANCE_SAMPLING, 3);
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.pb.length(), Some(3));
            assert_eq!(state.pb.position(), 0);
            assert_eq!(state.pb.message(), phase::DISTANCE_SAMPLING);
            assert_eq!(state.phase, Some(phase::DISTANCE_SAMPLING));
        }

        reporter.report(Progress::TaskIncrement);
        assert_eq!(handler.state.lock().unwrap().pb.position(), 1);

        reporter.finish_task();
        let state = handler.state.lock().unwrap();
        assert!(state.pb.is_finished());
        assert_eq!(state.pb.position(), 3);
        assert_eq!(state.pb.message(), "✓ Distance sampling complete");
        assert!(state.phase.is_none());
    }

    #[test]
    fn alignment_phase_start_shows_a_spinner_message() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();
        callback(Progress::PhaseStart {
            name: phase::ALIGNMENT,
        });
        let state = handler.state.lock().unwrap();
        assert_eq!(state.pb.message(), "Alignment");
        assert!(!state.pb.is_finished());
    }

    #[test]
    fn stray_phase_finish_falls_back_to_a_generic_message() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();
        callback(Progress::PhaseFinish);
        assert_eq!(handler.state.lock().unwrap().pb.message(), "✓ Done");
    }

    #[test]
    fn pairwise_rmsd_can_report_from_another_thread() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: phase::PAIRWISE_RMSD,
            });
            callback(Progress::TaskStart { total_steps: 3 });
            for _ in 0..3 {
                callback(Progress::TaskIncrement);
            }
            callback(Progress::TaskFinish);
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let state = handler.state.lock().unwrap();
        assert!(state.pb.is_finished());
        assert_eq!(state.pb.position(), 3);
        assert_eq!(state.pb.message(), "✓ Pairwise RMSD complete");
    }
}
