use crate::core::models::ids::GroupId;

/// Progress events emitted by an assignment run.
///
/// A run reports one phase per responsibility (pool, history, assignment). Inside the
/// assignment phase it announces the total number of reviews to create, then one
/// [`Progress::PassStart`] per outer pass and one [`Progress::Assigned`] per committed review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    PassStart { pass: usize, eligible: usize },
    Assigned { reviewer: GroupId, reviewee: GroupId },
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

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

    /// Runs `phase` between a `PhaseStart`/`PhaseFinish` pair.
    ///
    /// `PhaseFinish` is only reported when `phase` succeeds.
    pub fn phase<T, E>(
        &self,
        name: &'static str,
        phase: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        self.report(Progress::PhaseStart { name });
        let value = phase()?;
        self.report(Progress::PhaseFinish);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording_reporter() -> (ProgressReporter<'static>, Arc<Mutex<Vec<Progress>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));
        (reporter, events)
    }

    #[test]
    fn reporter_without_callback_is_silent() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::PhaseFinish);
    }

    #[test]
    fn successful_phase_is_bracketed() {
        let (reporter, events) = recording_reporter();
        let value: Result<u8, ()> = reporter.phase("Loading History", || Ok(7));

        assert_eq!(value, Ok(7));
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                Progress::PhaseStart {
                    name: "Loading History"
                },
                Progress::PhaseFinish
            ]
        );
    }

    #[test]
    fn failed_phase_does_not_report_finish() {
        let (reporter, events) = recording_reporter();
        let value: Result<(), &str> = reporter.phase("Building Pool", || Err("boom"));

        assert_eq!(value, Err("boom"));
        assert_eq!(events.lock().unwrap().len(), 1);
    }
}
