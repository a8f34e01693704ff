/// Events emitted by long-running engine loops.
#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

/// Names of the phases the engine reports.
pub mod phase {
    pub const DISTANCE_SAMPLING: &str = "Distance sampling";
    pub const ALIGNMENT: &str = "Alignment";
    /// Counts frame pairs rather than frames.
    pub const PAIRWISE_RMSD: &str = "Pairwise RMSD";
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional callback; without one, reporting is a no-op.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Opens a named phase containing one task of `total_steps` increments.
    pub fn start_task(&self, phase: &'static str, total_steps: usize) {
        self.report(Progress::PhaseStart { name: phase });
        self.report(Progress::TaskStart {
            total_steps: total_steps as u64,
        });
    }

    /// Closes the task and phase opened by [`ProgressReporter::start_task`].
    pub fn finish_task(&self) {
        self.report(Progress::TaskFinish);
        self.report(Progress::PhaseFinish);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// A reporter that records every event it receives.
    pub(crate) fn recording_reporter() -> (ProgressReporter<'static>, Arc<Mutex<Vec<Progress>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));
        (reporter, events)
    }

    #[test]
    fn reporter_without_callback_is_silent() {
        let reporter = ProgressReporter::new();
        reporter.start_task("nothing", 3);
        reporter.report(Progress::TaskIncrement);
        reporter.finish_task();
    }

    #[test]
    fn task_helpers_bracket_increments() {
        let (reporter, events) = recording_reporter();
        reporter.start_task("sampling", 2);
        reporter.report(Progress::TaskIncrement);
        reporter.report(Progress::TaskIncrement);
        reporter.finish_task();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 6);
        assert!(matches!(events[0], Progress::PhaseStart { name: "sampling" }));
        assert!(matches!(events[1], Progress::TaskStart { total_steps: 2 }));
        assert!(matches!(events[5], Progress::PhaseFinish));
    }
}
